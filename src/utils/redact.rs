//! Redaction of secrets before payloads reach the logs.

use regex::Regex;
use std::sync::OnceLock;

static SENSITIVE_PATTERNS: &[&str] = &[
    r#"(?i)"(password|confirm_password)":\s*"[^"]*""#,
    r#"(?i)"(token|signature|razorpay_signature)":\s*"[^"]*""#,
    r#"(?i)"(secret|key_secret|authorization)":\s*"[^"]*""#,
];

fn patterns() -> &'static [Regex] {
    static COMPILED: OnceLock<Vec<Regex>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        SENSITIVE_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    })
}

/// Replace the values of sensitive JSON fields with `[REDACTED]`
pub fn redact_sensitive_data(input: &str) -> String {
    patterns().iter().fold(input.to_string(), |acc, re| {
        re.replace_all(&acc, r#""$1": "[REDACTED]""#).into_owned()
    })
}
