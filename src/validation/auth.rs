use crate::error::{AppError, Result};

/// Validates an email address.
///
/// # Arguments
///
/// * `email` - The email address to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the email is plausible.
pub fn validate_email(email: &str) -> Result<()> {
    if email.len() < 3 || email.len() > 255 {
        return Err(AppError::Validation(
            "Email must be between 3 and 255 characters".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(AppError::Validation("Invalid email address".to_string()));
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    Ok(())
}

/// Validates a password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

/// Checks that the password and its repetition agree, before anything is
/// sent to the backend.
pub fn validate_password_match(password: &str, repeat_password: &str) -> Result<()> {
    if password != repeat_password {
        return Err(AppError::Validation("Passwords do not match".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_email() {
        assert!(validate_email("user@example.com").is_ok());
    }

    #[test]
    fn rejects_email_without_at() {
        assert!(validate_email("user.example.com").is_err());
    }

    #[test]
    fn rejects_email_without_domain_dot() {
        assert!(validate_email("user@localhost").is_err());
    }

    #[test]
    fn rejects_short_password() {
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn accepts_reasonable_password() {
        assert!(validate_password("correct horse battery").is_ok());
    }

    #[test]
    fn rejects_mismatched_passwords() {
        let err = validate_password_match("password-one", "password-two").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Passwords do not match"));
    }

    #[test]
    fn accepts_matching_passwords() {
        assert!(validate_password_match("same-password", "same-password").is_ok());
    }
}
