use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // something@something.something, no whitespace, no second "@"
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Returns true when the candidate looks like a deliverable address.
/// Always returns a boolean; empty and malformed input are simply false.
pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_REGEX.is_match(candidate)
}
