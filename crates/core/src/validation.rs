//! Local form validation. Everything here runs before any network call.

use validator::ValidationErrors;

use crate::error::CoreError;

/// Minimum password length accepted by the API.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validate a new password and its confirmation.
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), CoreError> {
    if password != confirm {
        return Err(CoreError::Validation("Passwords do not match".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Collapse `validator` output into one deterministic user-facing message.
pub fn describe_errors(errors: &ValidationErrors) -> CoreError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages.dedup();
    CoreError::Validation(messages.join("; "))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn mismatched_passwords_are_rejected() {
        let err = validate_new_password("secret1", "secret2").unwrap_err();
        assert_eq!(err.message(), "Passwords do not match");
    }

    #[test]
    fn short_password_is_rejected() {
        let err = validate_new_password("abc", "abc").unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("at least 6"));
    }

    #[test]
    fn password_at_minimum_passes() {
        assert!(validate_new_password("sixsix", "sixsix").is_ok());
    }
}
