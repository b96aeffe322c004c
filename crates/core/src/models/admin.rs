use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::types::{EntityId, Timestamp};

/// Response of `GET /admin/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub total_trainers: u64,
    pub pending_reports: u64,
    pub total_reports: u64,
    pub active_assignments: u64,
}

/// One row of the admin customer / trainer listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub email_verified: bool,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    /// Only set for trainers.
    pub assigned_clients: Option<u32>,
}
