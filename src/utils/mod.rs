//! Utility functions and helper modules.

pub mod hmac;
pub mod http;
pub mod redact;
pub mod route;
pub mod validate;

pub use http::*;
pub use redact::*;
pub use route::*;
