//! Input format checks shared by signup, reports and fleet administration.

use regex::Regex;
use std::sync::OnceLock;

fn regex(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// 10 to 15 digits, nothing else
pub fn is_valid_contact_number(value: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    regex(&RE, r"^\d{10,15}$").is_some_and(|re| re.is_match(value))
}

/// Letters, digits and `@.+-_`, up to 150 characters
pub fn is_valid_username(value: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    regex(&RE, r"^[A-Za-z0-9@.+_-]{1,150}$").is_some_and(|re| re.is_match(value))
}

pub fn is_valid_email(value: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    regex(&RE, r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_some_and(|re| re.is_match(value))
}

pub fn is_valid_latitude(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

pub fn is_valid_longitude(lng: f64) -> bool {
    lng.is_finite() && (-180.0..=180.0).contains(&lng)
}
