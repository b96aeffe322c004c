//! Client error types.
//!
//! [`ApiError`] is what every remote call returns. The Session Store narrows
//! it into one error enum per operation ([`AuthError`],
//! [`RegistrationError`], [`VerificationError`]) so callers can branch on
//! the failure kinds that matter for that screen.

use wellnest_core::error::CoreError;

use crate::storage::StorageError;

/// Coarse failure class used when turning errors into notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected locally or by the server's input validation.
    Validation,
    /// Credentials missing, wrong, or not yet usable.
    Auth,
    /// Duplicate username / email and similar.
    Conflict,
    NotFound,
    Permission,
    /// Transport failure, server fault, or an unstructured error body.
    Network,
    /// The local session file could not be read or written.
    Storage,
}

/// Error returned by a call to the WellNest API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a structured `{success: false, message}`
    /// body. `message` is meant for the user.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// A non-2xx response without a structured body.
    #[error("WellNest API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// A 2xx response whose body could not be understood.
    #[error("Malformed API response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Local validation failed; no request was sent.
    #[error("{}", .0.message())]
    Core(#[from] CoreError),
}

/// Convenience alias for API call results.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The server reported the bearer credential as invalid.
    pub fn is_credential_invalid(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Request(_) | Self::Api { .. } | Self::Malformed(_) => ErrorCategory::Network,
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Core(core) => match core {
                CoreError::NotFound(_) => ErrorCategory::NotFound,
                CoreError::Conflict(_) => ErrorCategory::Conflict,
                CoreError::Unauthorized(_) => ErrorCategory::Auth,
                CoreError::Forbidden(_) => ErrorCategory::Permission,
                CoreError::Validation(_) => ErrorCategory::Validation,
                CoreError::Internal(_) => ErrorCategory::Network,
            },
            Self::Rejected { status, .. } => match status {
                401 => ErrorCategory::Auth,
                403 => ErrorCategory::Permission,
                404 => ErrorCategory::NotFound,
                409 => ErrorCategory::Conflict,
                s if *s >= 500 => ErrorCategory::Network,
                _ => ErrorCategory::Validation,
            },
        }
    }

    /// Server-supplied message for structured rejections.
    fn rejection_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let haystack = haystack.to_ascii_lowercase();
    needles.iter().any(|n| haystack.contains(n))
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidCredentials(String),

    /// The server re-sent a verification code; the user should check email.
    #[error("{0}")]
    EmailNotVerified(String),

    /// Admin login succeeded for an account without the admin role.
    #[error("Access denied. Admin credentials required.")]
    NotAdmin,

    #[error("{0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Storage(e) => Self::Storage(e),
            ApiError::Core(e) => Self::Validation(e.message().to_string()),
            ApiError::Rejected { status, message } if status < 500 => {
                if contains_any(&message, &["not verified"]) {
                    Self::EmailNotVerified(message)
                } else {
                    Self::InvalidCredentials(message)
                }
            }
            other => Self::Network(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("{0}")]
    DuplicateUsername(String),

    #[error("{0}")]
    DuplicateEmail(String),

    #[error("{0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl From<ApiError> for RegistrationError {
    fn from(err: ApiError) -> Self {
        const DUPLICATE: &[&str] = &["taken", "already", "exists"];

        match err {
            ApiError::Core(e) => Self::Validation(e.message().to_string()),
            ApiError::Rejected { status, message } if status < 500 => {
                let duplicate = contains_any(&message, DUPLICATE);
                if duplicate && contains_any(&message, &["username"]) {
                    Self::DuplicateUsername(message)
                } else if duplicate && contains_any(&message, &["email"]) {
                    Self::DuplicateEmail(message)
                } else {
                    Self::Validation(message)
                }
            }
            other => Self::Network(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Email verification
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("{0}")]
    InvalidOtp(String),

    #[error("{0}")]
    ExpiredOtp(String),

    #[error("{0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ApiError> for VerificationError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Storage(e) => Self::Storage(e),
            ApiError::Core(e) => Self::Validation(e.message().to_string()),
            ApiError::Rejected { status, message } if status < 500 => {
                // "Invalid or expired OTP" is ambiguous and reported as invalid.
                if contains_any(&message, &["expired"]) && !contains_any(&message, &["invalid"]) {
                    Self::ExpiredOtp(message)
                } else {
                    Self::InvalidOtp(message)
                }
            }
            other => Self::Network(other.to_string()),
        }
    }
}

/// The message to show the user for any API error.
pub fn user_message(err: &ApiError) -> String {
    match err.rejection_message() {
        Some(message) => message.to_string(),
        None => err.to_string(),
    }
}
