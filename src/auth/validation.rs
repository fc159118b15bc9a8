//! Input rules for each request shape. Runs before the store is touched.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;

pub const EMAIL_MAX: usize = 255;
pub const NAME_MAX: usize = 100;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 255;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registration input after validation.
#[derive(Debug)]
pub struct ValidRegistration {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: String,
}

/// Login input after validation.
#[derive(Debug)]
pub struct ValidLogin {
    pub email: String,
    pub password: String,
}

/// Missing or empty only; whitespace is left to the later rules.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Names are stored as sent, including `""`; only the length is checked.
fn optional_name(value: Option<String>, label: &str) -> Result<Option<String>, AppError> {
    if let Some(v) = &value {
        if v.chars().count() > NAME_MAX {
            return Err(AppError::Validation(format!(
                "{label} must be less than {NAME_MAX} characters"
            )));
        }
    }
    Ok(value)
}

pub fn validate_registration(
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    password: Option<String>,
) -> Result<ValidRegistration, AppError> {
    let (Some(email), Some(password)) = (required(email), required(password)) else {
        return Err(AppError::Validation("Email and password are required".into()));
    };

    let email = normalize_email(&email);
    if email.chars().count() > EMAIL_MAX || !is_valid_email(&email) {
        return Err(AppError::Validation("Please provide a valid email address".into()));
    }

    let len = password.chars().count();
    if len < PASSWORD_MIN {
        return Err(AppError::Validation(format!(
            "Password must be at least {PASSWORD_MIN} characters long"
        )));
    }
    if len > PASSWORD_MAX {
        return Err(AppError::Validation(format!(
            "Password must be at most {PASSWORD_MAX} characters long"
        )));
    }

    Ok(ValidRegistration {
        email,
        first_name: optional_name(first_name, "First name")?,
        last_name: optional_name(last_name, "Last name")?,
        password,
    })
}

pub fn validate_login(
    email: Option<String>,
    password: Option<String>,
) -> Result<ValidLogin, AppError> {
    let (Some(email), Some(password)) = (required(email), required(password)) else {
        return Err(AppError::Validation("Email and password are required".into()));
    };
    Ok(ValidLogin {
        email: normalize_email(&email),
        password,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(m) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn email_regex() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
    }

    #[test]
    fn registration_requires_email_and_password() {
        let err = validate_registration(None, None, None, s("secret1")).unwrap_err();
        assert_eq!(message(err), "Email and password are required");
        let err = validate_registration(s("a@b.com"), None, None, s("")).unwrap_err();
        assert_eq!(message(err), "Email and password are required");
    }

    #[test]
    fn blank_password_goes_through_length_rules() {
        let err = validate_registration(s("a@b.com"), None, None, s("   ")).unwrap_err();
        assert!(message(err).contains("at least 6"));
        let ok = validate_registration(s("a@b.com"), None, None, s("      ")).unwrap();
        assert_eq!(ok.password, "      ");
        assert_eq!(validate_login(s("a@b.com"), s("  ")).unwrap().password, "  ");
    }

    #[test]
    fn blank_email_is_invalid_not_missing() {
        let err = validate_registration(s("   "), None, None, s("secret1")).unwrap_err();
        assert_eq!(message(err), "Please provide a valid email address");
    }

    #[test]
    fn registration_normalizes_email() {
        let ok = validate_registration(s("  A@B.Com "), None, None, s("secret1")).unwrap();
        assert_eq!(ok.email, "a@b.com");
    }

    #[test]
    fn registration_enforces_password_bounds() {
        let err = validate_registration(s("a@b.com"), None, None, s("12345")).unwrap_err();
        assert!(message(err).contains("at least 6"));
        let long = "x".repeat(PASSWORD_MAX + 1);
        let err = validate_registration(s("a@b.com"), None, None, Some(long)).unwrap_err();
        assert!(message(err).contains("at most"));
        assert!(validate_registration(s("a@b.com"), None, None, s("123456")).is_ok());
    }

    #[test]
    fn registration_enforces_name_length() {
        let long = "n".repeat(NAME_MAX + 1);
        let err = validate_registration(s("a@b.com"), Some(long), None, s("secret1")).unwrap_err();
        assert!(message(err).starts_with("First name"));
        let ok = validate_registration(s("a@b.com"), s(""), s(" Doe "), s("secret1")).unwrap();
        assert_eq!(ok.first_name.as_deref(), Some(""));
        assert_eq!(ok.last_name.as_deref(), Some(" Doe "));
        let ok = validate_registration(s("a@b.com"), None, None, s("secret1")).unwrap();
        assert_eq!(ok.first_name, None);
    }

    #[test]
    fn registration_rejects_bad_email() {
        let err = validate_registration(s("nope"), None, None, s("secret1")).unwrap_err();
        assert_eq!(message(err), "Please provide a valid email address");
    }

    #[test]
    fn login_requires_both_fields() {
        assert!(validate_login(s("a@b.com"), None).is_err());
        assert!(validate_login(None, s("secret1")).is_err());
        assert_eq!(validate_login(s("A@b.com"), s("x")).unwrap().email, "a@b.com");
    }
}
