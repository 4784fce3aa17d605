//! Route handlers.

pub mod dashboard;
pub mod health;
pub mod login;
pub mod login_page;
pub mod logout;

use regex::Regex;

/// Basic email shape check applied to login payloads.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}
