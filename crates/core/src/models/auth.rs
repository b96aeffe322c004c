//! Authentication payloads: registration, login, email verification and
//! password reset.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::validation::{describe_errors, validate_new_password};

/// Role a new account may request. Admin accounts cannot self-register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegistrationRole {
    #[default]
    User,
    Trainer,
}

/// The registration form as the user fills it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct RegistrationDetails {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: RegistrationRole,
}

impl RegistrationDetails {
    /// Validate the form and build the request body (the confirmation field
    /// is never sent).
    pub fn to_request(&self) -> Result<RegisterRequest, CoreError> {
        validate_new_password(&self.password, &self.confirm_password)?;
        self.validate().map_err(|e| describe_errors(&e))?;

        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            full_name: self.full_name.trim().to_string(),
            role: self.role,
        })
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: RegistrationRole,
}

/// Body of `POST /auth/login`. `username` may also be an email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username_or_email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username_or_email.into(),
            password: password.into(),
        }
    }

    pub fn validate_fields(&self) -> Result<(), CoreError> {
        if self.username.trim().is_empty() {
            return Err(CoreError::Validation(
                "Username or email is required".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(CoreError::Validation("Password is required".to_string()));
        }
        Ok(())
    }
}

/// Body of `POST /auth/verify-email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub otp: String,
}

/// Body of `POST /auth/resend-otp` (verification codes) and
/// `POST /auth/forgot-password` (reset codes, both first send and resend).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

impl EmailRequest {
    pub fn new(email: &str) -> Result<Self, CoreError> {
        let request = Self {
            email: email.trim().to_string(),
        };
        request.validate().map_err(|e| describe_errors(&e))?;
        Ok(request)
    }
}

/// Body of `POST /auth/reset-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}
