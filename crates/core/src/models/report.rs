//! Trainer-misconduct reports.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

/// Review state of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn from_str_wire(s: &str) -> Result<Self, CoreError> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "REVIEWED" => Ok(Self::Reviewed),
            "RESOLVED" => Ok(Self::Resolved),
            "DISMISSED" => Ok(Self::Dismissed),
            _ => Err(CoreError::Validation(format!(
                "Invalid report status '{s}'. Must be one of: PENDING, REVIEWED, RESOLVED, DISMISSED"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Reviewed => "REVIEWED",
            Self::Resolved => "RESOLVED",
            Self::Dismissed => "DISMISSED",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report filed by a customer against a trainer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: EntityId,
    pub customer_id: EntityId,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub trainer_id: EntityId,
    pub trainer_name: Option<String>,
    pub trainer_email: Option<String>,
    pub message: String,
    pub status: ReportStatus,
    pub created_at: Option<Timestamp>,
    pub resolved_at: Option<Timestamp>,
    pub resolved_by: Option<EntityId>,
}

/// Body of `POST /reports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub trainer_id: EntityId,
    pub message: String,
}

impl CreateReportRequest {
    pub fn new(trainer_id: &str, message: &str) -> Result<Self, CoreError> {
        if trainer_id.trim().is_empty() {
            return Err(CoreError::Validation("Trainer ID is required".to_string()));
        }
        if message.trim().is_empty() {
            return Err(CoreError::Validation("Message is required".to_string()));
        }
        Ok(Self {
            trainer_id: trainer_id.trim().to_string(),
            message: message.trim().to_string(),
        })
    }
}
