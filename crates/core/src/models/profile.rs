use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::EntityId;

/// Fitness details attached to a user's profile.
///
/// Used both as the body of `POST /profile/fitness` and inside
/// [`UserProfile`]; `id` is only present on records returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub age: Option<u32>,
    /// Kilograms.
    pub weight: Option<f64>,
    /// Centimetres.
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub fitness_goal: Option<String>,
    pub activity_level: Option<String>,
    pub medical_notes: Option<String>,
}

impl FitnessProfile {
    /// Reject physically meaningless measurements before submitting.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(age) = self.age {
            if !(1..=120).contains(&age) {
                return Err(CoreError::Validation(format!(
                    "Age must be between 1 and 120, got {age}"
                )));
            }
        }
        for (name, value) in [("Weight", self.weight), ("Height", self.height)] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(CoreError::Validation(format!(
                        "{name} must be a positive number"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Response of `GET /profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub fitness_profile: Option<FitnessProfile>,
}
