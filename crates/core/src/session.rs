//! The authenticated session record and the observable auth state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::{Role, Viewer};
use crate::types::EntityId;

/// Identity fields persisted next to the bearer token.
///
/// The API calls the id `id`; it is stored as `userId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(alias = "id")]
    pub user_id: EntityId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

/// An authenticated identity plus its bearer credential.
///
/// Deserializes directly from the `data` object of a successful login or
/// email-verification response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(alias = "id")]
    pub user_id: EntityId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

impl Session {
    pub fn from_parts(identity: Identity, token: String) -> Self {
        Self {
            user_id: identity.user_id,
            username: identity.username,
            full_name: identity.full_name,
            email: identity.email,
            role: identity.role,
            token,
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }

    /// Reject sessions with any empty field.
    pub fn validate(&self) -> Result<(), CoreError> {
        let fields = [
            ("userId", &self.user_id),
            ("username", &self.username),
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("token", &self.token),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "Session field '{name}' must not be empty"
                )));
            }
        }
        Ok(())
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// The token is a credential; keep it out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Everything a consumer needs to know about "who is logged in".
///
/// `loading` is true until the stored session has been restored at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub loading: bool,
    pub session: Option<Session>,
}

impl AuthState {
    pub fn loading() -> Self {
        Self {
            loading: true,
            session: None,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            loading: false,
            session: None,
        }
    }

    pub fn signed_in(session: Session) -> Self {
        Self {
            loading: false,
            session: Some(session),
        }
    }

    pub fn viewer(&self) -> Viewer {
        Viewer::of(self.session.as_ref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}
