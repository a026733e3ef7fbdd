use std::process::Command;
use vergen::EmitBuilder;

fn main() {
    let is_git_available = Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false);

    let mut builder = EmitBuilder::builder();
    builder.build_timestamp();
    if is_git_available {
        builder.git_sha(true);
    }

    // Missing metadata falls back to "unknown" in build_info
    if let Err(e) = builder.emit() {
        println!("cargo:warning=build metadata unavailable: {e}");
    }
}
