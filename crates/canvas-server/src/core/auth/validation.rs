//! Registration input rules: email syntax and password strength.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::error::{Error, Result};

pub const PASSWORD_MIN_LEN: usize = 8;
const EMAIL_MAX_LEN: usize = 254;
const EMAIL_LOCAL_MAX_LEN: usize = 64;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Dot-atom local part, hostname labels, alphabetic TLD of 2+ chars.
        Regex::new(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
        )
        .expect("email regex literal is valid")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    if email.len() > EMAIL_MAX_LEN {
        return false;
    }
    match email.split_once('@') {
        Some((local, _)) if local.len() <= EMAIL_LOCAL_MAX_LEN => email_regex().is_match(email),
        _ => false,
    }
}

pub fn validate_email(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(Error::Validation(
            "Please enter a valid email address".to_string(),
        ))
    }
}

/// Password must have at least [`PASSWORD_MIN_LEN`] characters and one each
/// of ASCII lowercase, ASCII uppercase, digit and symbol. Non-ASCII letters
/// count toward the length only.
pub fn is_strong_password(password: &str) -> bool {
    let mut len = 0;
    let (mut lower, mut upper, mut digit, mut symbol) = (false, false, false, false);

    for c in password.chars() {
        len += 1;
        if c.is_ascii_lowercase() {
            lower = true;
        } else if c.is_ascii_uppercase() {
            upper = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else if !c.is_alphanumeric() && !c.is_control() {
            symbol = true;
        }
    }

    len >= PASSWORD_MIN_LEN && lower && upper && digit && symbol
}

pub fn validate_password(password: &str) -> Result<()> {
    if is_strong_password(password) {
        Ok(())
    } else {
        Err(Error::Validation(
            "Password is not strong enough".to_string(),
        ))
    }
}
