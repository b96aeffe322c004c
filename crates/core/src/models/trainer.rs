use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// A trainer available for selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    pub id: EntityId,
    pub full_name: String,
    pub username: String,
    /// Trainees currently assigned to this trainer.
    #[serde(default)]
    pub active_trainee_count: u32,
}

/// One trainee as shown on a trainer's dashboard, with the fitness profile
/// summary inlined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraineeCard {
    pub id: EntityId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub assignment_date: Option<String>,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub fitness_goal: Option<String>,
    pub activity_level: Option<String>,
    pub medical_notes: Option<String>,
    #[serde(default)]
    pub has_profile: bool,
}

/// Body of `POST /trainers/select`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectTrainerRequest {
    pub trainer_id: EntityId,
}
