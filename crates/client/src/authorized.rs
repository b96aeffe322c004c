//! Bearer-authenticated endpoints: trainers, profile, reports, admin.
//!
//! Obtain an [`AuthorizedApi`] from [`WellnestApi::authorized`] with the
//! current session. A 401 from any of these means the stored credential is
//! no longer valid; pass the error to
//! [`SessionStore::handle_api_error`](crate::store::SessionStore::handle_api_error).

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wellnest_core::models::admin::{AdminStats, UserSummary};
use wellnest_core::models::profile::{FitnessProfile, UserProfile};
use wellnest_core::models::report::{CreateReportRequest, Report, ReportStatus};
use wellnest_core::models::trainer::{SelectTrainerRequest, TraineeCard, Trainer};
use wellnest_core::session::Session;

use crate::api::{path_id, Envelope, WellnestApi};
use crate::error::ApiResult;

/// A view of [`WellnestApi`] that attaches the session's bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizedApi<'a> {
    api: &'a WellnestApi,
    token: &'a str,
}

impl WellnestApi {
    pub fn authorized<'a>(&'a self, session: &'a Session) -> AuthorizedApi<'a> {
        AuthorizedApi {
            api: self,
            token: &session.token,
        }
    }
}

impl<'a> AuthorizedApi<'a> {
    async fn call(&self, method: Method, path: &str) -> ApiResult<Envelope> {
        tracing::debug!(%method, path, "Authorized request");
        self.api
            .send(self.api.request(method, path, Some(self.token)))
            .await
    }

    async fn call_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResult<Envelope> {
        tracing::debug!(%method, path, "Authorized request");
        self.api
            .send(self.api.request(method, path, Some(self.token)).json(body))
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.call(Method::GET, path).await?.into_data()
    }

    // ---- trainers ----

    /// `GET /trainers`
    pub async fn list_trainers(&self) -> ApiResult<Vec<Trainer>> {
        self.get("/trainers").await
    }

    /// `POST /trainers/select`: choose today's trainer.
    pub async fn select_trainer(&self, trainer_id: &str) -> ApiResult<String> {
        let body = SelectTrainerRequest {
            trainer_id: path_id(trainer_id)?.to_string(),
        };
        let envelope = self
            .call_json(Method::POST, "/trainers/select", &body)
            .await?;
        Ok(envelope.message_or("Trainer selected"))
    }

    /// `GET /trainers/my-trainees` (trainers only).
    pub async fn my_trainees(&self) -> ApiResult<Vec<TraineeCard>> {
        self.get("/trainers/my-trainees").await
    }

    /// `GET /trainers/my-trainer-today`; `None` when no trainer is chosen yet.
    pub async fn my_trainer_today(&self) -> ApiResult<Option<Trainer>> {
        self.get("/trainers/my-trainer-today").await
    }

    // ---- profile ----

    /// `GET /profile`
    pub async fn profile(&self) -> ApiResult<UserProfile> {
        self.get("/profile").await
    }

    /// `POST /profile/fitness`: create or replace the fitness profile.
    pub async fn save_fitness_profile(&self, profile: &FitnessProfile) -> ApiResult<FitnessProfile> {
        profile.validate()?;
        self.call_json(Method::POST, "/profile/fitness", profile)
            .await?
            .into_data()
    }

    // ---- reports ----

    /// `POST /reports`: file a report against a trainer.
    pub async fn create_report(&self, request: &CreateReportRequest) -> ApiResult<Report> {
        self.call_json(Method::POST, "/reports", request)
            .await?
            .into_data()
    }

    /// `GET /reports/my-reports`
    pub async fn my_reports(&self) -> ApiResult<Vec<Report>> {
        self.get("/reports/my-reports").await
    }

    /// `GET /reports` (admin).
    pub async fn all_reports(&self) -> ApiResult<Vec<Report>> {
        self.get("/reports").await
    }

    /// `GET /reports/pending` (admin).
    pub async fn pending_reports(&self) -> ApiResult<Vec<Report>> {
        self.get("/reports/pending").await
    }

    /// `GET /reports/trainer/{trainerId}` (admin).
    pub async fn reports_by_trainer(&self, trainer_id: &str) -> ApiResult<Vec<Report>> {
        self.get(&format!("/reports/trainer/{}", path_id(trainer_id)?))
            .await
    }

    /// `PATCH /reports/{id}/status?status=...` (admin).
    pub async fn update_report_status(
        &self,
        report_id: &str,
        status: ReportStatus,
    ) -> ApiResult<Report> {
        let path = format!("/reports/{}/status", path_id(report_id)?);
        tracing::debug!(path = %path, %status, "Authorized request");
        self.api
            .send(
                self.api
                    .request(Method::PATCH, &path, Some(self.token))
                    .query(&[("status", status.as_str())]),
            )
            .await?
            .into_data()
    }

    /// `DELETE /reports/{id}` (admin).
    pub async fn delete_report(&self, report_id: &str) -> ApiResult<String> {
        let path = format!("/reports/{}", path_id(report_id)?);
        let envelope = self.call(Method::DELETE, &path).await?;
        Ok(envelope.message_or("Report deleted"))
    }

    // ---- admin ----

    /// `GET /admin/stats`
    pub async fn admin_stats(&self) -> ApiResult<AdminStats> {
        self.get("/admin/stats").await
    }

    /// `GET /admin/customers`
    pub async fn customers(&self) -> ApiResult<Vec<UserSummary>> {
        self.get("/admin/customers").await
    }

    /// `GET /admin/trainers`
    pub async fn trainer_accounts(&self) -> ApiResult<Vec<UserSummary>> {
        self.get("/admin/trainers").await
    }

    /// `DELETE /admin/users/{id}`
    pub async fn delete_user(&self, user_id: &str) -> ApiResult<String> {
        let path = format!("/admin/users/{}", path_id(user_id)?);
        let envelope = self.call(Method::DELETE, &path).await?;
        Ok(envelope.message_or("User deleted"))
    }
}
