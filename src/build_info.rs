//! Build metadata emitted by `build.rs`.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

pub const BUILD_TIMESTAMP: &str = match option_env!("VERGEN_BUILD_TIMESTAMP") {
    Some(ts) => ts,
    None => "unknown",
};
