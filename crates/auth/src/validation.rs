//! Input validation for account fields.

use regex::Regex;

use crate::AuthError;

pub const MIN_PASSWORD_LENGTH: usize = 5;
const MAX_FIELD_LENGTH: usize = 255;

pub fn validate_email(email: &str) -> Result<(), AuthError> {
    let email_regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .map_err(|_| AuthError::Validation("invalid email regex".to_string()))?;

    if email.trim().is_empty() {
        return Err(AuthError::Validation("email may not be blank".to_string()));
    }

    if !email_regex.is_match(email.trim()) {
        return Err(AuthError::Validation("enter a valid email address".to_string()));
    }

    if email.len() > MAX_FIELD_LENGTH {
        return Err(AuthError::Validation("email is too long".to_string()));
    }

    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), AuthError> {
    if username.trim().is_empty() {
        return Err(AuthError::Validation("username may not be blank".to_string()));
    }

    if username.chars().count() > MAX_FIELD_LENGTH {
        return Err(AuthError::Validation("username is too long".to_string()));
    }

    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), AuthError> {
    if name.chars().count() > MAX_FIELD_LENGTH {
        return Err(AuthError::Validation("name is too long".to_string()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}
