use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::FieldError;
use crate::models::user::UserPublic;

fn username_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.-]{1,150}$").expect("valid username regex"))
}

#[derive(Debug, Deserialize)]
pub struct SignupIn {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupIn {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if !username_re().is_match(self.username.trim()) {
            errors.push(FieldError::new(
                "username",
                "username must be 1-150 letters, digits, '_', '.' or '-'",
            ));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            errors.push(FieldError::new("email", "a valid email address is required"));
        }
        if self.password.len() < 8 {
            errors.push(FieldError::new(
                "password",
                "password must be at least 8 characters",
            ));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginIn {
    pub username: String,
    pub password: String,
}

/// Issued on successful login.
#[derive(Debug, Serialize)]
pub struct SessionOut {
    pub token: String,
    pub user: UserPublic,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, email: &str, password: &str) -> SignupIn {
        SignupIn {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn valid_signup_passes() {
        assert!(signup("NoName", "noname@example.com", "s3cret-pass").validate().is_ok());
    }

    #[test]
    fn username_with_spaces_is_rejected() {
        let errors = signup("no name", "a@b.c", "s3cret-pass").validate().unwrap_err();
        assert_eq!(errors[0].field, "username");
    }

    #[test]
    fn short_password_is_rejected() {
        let errors = signup("auth", "a@b.c", "short").validate().unwrap_err();
        assert_eq!(errors[0].field, "password");
    }

    #[test]
    fn bad_email_is_rejected() {
        let errors = signup("auth", "not-an-email", "s3cret-pass").validate().unwrap_err();
        assert_eq!(errors[0].field, "email");
    }
}
