//! Registration and login input checks.
//!
//! Error messages are shown to end users as-is.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("valid username regex"));

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_username(username: &str) -> Result<(), String> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(format!(
            "O nome de usuário deve ter pelo menos {} caracteres",
            MIN_USERNAME_LEN
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Use apenas letras, números e underscore".to_string());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "A senha deve ter pelo menos {} caracteres",
            MIN_PASSWORD_LEN
        ));
    }
    Ok(())
}
