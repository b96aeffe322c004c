//! REST client for the WellNest API.
//!
//! Every endpoint answers with a `{ success, message, data }` envelope.
//! A response only counts as a success when the HTTP status is 2xx *and*
//! `success` is true; anything else becomes an [`ApiError`].

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wellnest_core::error::CoreError;
use wellnest_core::models::auth::{
    EmailRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, VerifyEmailRequest,
};
use wellnest_core::session::Session;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::transport::AuthApi;

/// HTTP client for one WellNest API deployment.
#[derive(Debug, Clone)]
pub struct WellnestApi {
    client: reqwest::Client,
    base_url: String,
}

/// Decoded success envelope.
#[derive(Debug)]
pub struct Envelope {
    pub message: Option<String>,
    pub data: serde_json::Value,
}

impl Envelope {
    /// Deserialize `data` into the expected type.
    pub fn into_data<T: DeserializeOwned>(self) -> ApiResult<T> {
        serde_json::from_value(self.data)
            .map_err(|e| ApiError::Malformed(format!("unexpected data payload: {e}")))
    }

    pub fn message_or(&self, default: &str) -> String {
        self.message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: serde_json::Value,
}

impl WellnestApi {
    /// Create a client with default settings.
    ///
    /// * `base_url` - API root including its path prefix, e.g.
    ///   `http://host:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build a client honouring the configured request timeout.
    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode the envelope.
    pub(crate) async fn send(&self, builder: reqwest::RequestBuilder) -> ApiResult<Envelope> {
        let response = builder.send().await?;
        Self::read_envelope(response).await
    }

    async fn post_public<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Envelope> {
        tracing::debug!(path, "POST");
        self.send(self.request(reqwest::Method::POST, path, None).json(body))
            .await
    }

    async fn read_envelope(response: reqwest::Response) -> ApiResult<Envelope> {
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<RawEnvelope>(&body) {
            Ok(raw) if status.is_success() && raw.success => Ok(Envelope {
                message: raw.message,
                data: raw.data,
            }),
            Ok(RawEnvelope {
                message: Some(message),
                ..
            }) if !message.trim().is_empty() => Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            }),
            Ok(_) if status.is_success() => Err(ApiError::Rejected {
                status: status.as_u16(),
                message: "Request failed".to_string(),
            }),
            Err(e) if status.is_success() => Err(ApiError::Malformed(e.to_string())),
            _ => Err(ApiError::Api {
                status: status.as_u16(),
                body,
            }),
        }
    }

    fn session_from(envelope: Envelope) -> ApiResult<Session> {
        let session: Session = envelope.into_data()?;
        session
            .validate()
            .map_err(|e| ApiError::Malformed(e.message().to_string()))?;
        Ok(session)
    }
}

/// Reject ids that would change the shape of a request path.
pub(crate) fn path_id(id: &str) -> ApiResult<&str> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ApiError::Core(CoreError::Validation(format!(
            "Invalid id '{id}'"
        ))));
    }
    Ok(id)
}

#[async_trait]
impl AuthApi for WellnestApi {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<String> {
        let envelope = self.post_public("/auth/register", request).await?;
        Ok(envelope.message_or("OTP sent to your email"))
    }

    async fn verify_email(&self, request: &VerifyEmailRequest) -> ApiResult<Session> {
        let envelope = self.post_public("/auth/verify-email", request).await?;
        Self::session_from(envelope)
    }

    async fn resend_otp(&self, request: &EmailRequest) -> ApiResult<String> {
        let envelope = self.post_public("/auth/resend-otp", request).await?;
        Ok(envelope.message_or("New OTP sent"))
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<Session> {
        let envelope = self.post_public("/auth/login", request).await?;
        Self::session_from(envelope)
    }

    async fn forgot_password(&self, request: &EmailRequest) -> ApiResult<String> {
        let envelope = self.post_public("/auth/forgot-password", request).await?;
        Ok(envelope.message_or("OTP sent to your email"))
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<String> {
        let envelope = self.post_public("/auth/reset-password", request).await?;
        Ok(envelope.message_or("Password reset successful"))
    }
}
