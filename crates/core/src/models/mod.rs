//! Request and response records exchanged with the WellNest API.
//!
//! Field names follow the API's camelCase JSON. These are transport shapes;
//! the client caches them only for display.

pub mod admin;
pub mod auth;
pub mod profile;
pub mod report;
pub mod trainer;

pub use admin::{AdminStats, UserSummary};
pub use auth::{
    EmailRequest, LoginRequest, RegisterRequest, RegistrationDetails, RegistrationRole,
    ResetPasswordRequest, VerifyEmailRequest,
};
pub use profile::{FitnessProfile, UserProfile};
pub use report::{CreateReportRequest, Report, ReportStatus};
pub use trainer::{SelectTrainerRequest, TraineeCard, Trainer};
