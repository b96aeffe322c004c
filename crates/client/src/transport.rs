//! The seam between flows and the remote authentication endpoints.
//!
//! [`SessionStore`](crate::store::SessionStore) and the flow controllers
//! only talk to the API through [`AuthApi`], so tests can substitute a
//! scripted implementation without a network.

use async_trait::async_trait;
use wellnest_core::models::auth::{
    EmailRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, VerifyEmailRequest,
};
use wellnest_core::session::Session;

use crate::error::ApiResult;

/// Unauthenticated `/auth/*` operations.
///
/// Operations without a payload return the server's confirmation message.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/register`: emails a verification code, issues no token.
    async fn register(&self, request: &RegisterRequest) -> ApiResult<String>;

    /// `POST /auth/verify-email`: redeems the code and issues a session.
    async fn verify_email(&self, request: &VerifyEmailRequest) -> ApiResult<Session>;

    /// `POST /auth/resend-otp`.
    async fn resend_otp(&self, request: &EmailRequest) -> ApiResult<String>;

    /// `POST /auth/login`.
    async fn login(&self, request: &LoginRequest) -> ApiResult<Session>;

    /// `POST /auth/forgot-password`: emails a reset code.
    async fn forgot_password(&self, request: &EmailRequest) -> ApiResult<String>;

    /// `POST /auth/reset-password`: redeems the code and sets the password.
    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<String>;
}
