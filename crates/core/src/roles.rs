//! Account roles and the role-or-anonymous view used for route gating.
//!
//! The API serializes roles with a `ROLE_` prefix (`ROLE_ADMIN`); older
//! payloads and registration forms use the bare name (`ADMIN`). Both are
//! accepted on input, the prefixed form is always written.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::session::Session;

/// The role attached to an authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_USER", alias = "USER")]
    User,
    #[serde(rename = "ROLE_TRAINER", alias = "TRAINER")]
    Trainer,
    #[serde(rename = "ROLE_ADMIN", alias = "ADMIN")]
    Admin,
}

impl Role {
    /// Parse a role string as sent by the API (prefixed or bare).
    pub fn from_str_wire(s: &str) -> Result<Self, CoreError> {
        match s.strip_prefix("ROLE_").unwrap_or(s) {
            "USER" => Ok(Self::User),
            "TRAINER" => Ok(Self::Trainer),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(CoreError::Validation(format!(
                "Invalid role '{s}'. Must be one of: USER, TRAINER, ADMIN"
            ))),
        }
    }

    /// Wire representation, e.g. `ROLE_ADMIN`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "ROLE_USER",
            Self::Trainer => "ROLE_TRAINER",
            Self::Admin => "ROLE_ADMIN",
        }
    }

    /// Short display name, e.g. `ADMIN`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Trainer => "TRAINER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who is looking at the application right now.
///
/// The route guard branches on this closed set so every case is handled
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User,
    Trainer,
    Admin,
}

impl Viewer {
    pub fn of(session: Option<&Session>) -> Self {
        match session.map(|s| s.role) {
            None => Self::Anonymous,
            Some(Role::User) => Self::User,
            Some(Role::Trainer) => Self::Trainer,
            Some(Role::Admin) => Self::Admin,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }
}
