//! Email and mobile-phone format validation
//!
//! The same rules back both DTO validation at the API boundary and schema
//! validation inside the document store, so a record can never be persisted
//! in a shape the API would have rejected.

use once_cell::sync::Lazy;
use regex::Regex;

/// Basic RFC-style email shape: local part, @, domain with at least one dot
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// International mobile format: optional +, 8 to 15 digits
static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9]\d{7,14}$").expect("valid mobile regex"));

/// Check whether a string is a syntactically valid email address
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check whether a string is a plausible mobile phone number
pub fn is_valid_mobile(phone: &str) -> bool {
    MOBILE_RE.is_match(phone)
}

/// Case-fold and trim an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
