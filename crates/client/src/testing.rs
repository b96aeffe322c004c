//! Scripted [`AuthApi`] used by the unit tests in this crate.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use wellnest_core::models::auth::{
    EmailRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, VerifyEmailRequest,
};
use wellnest_core::roles::Role;
use wellnest_core::session::Session;

use crate::error::{ApiError, ApiResult};
use crate::transport::AuthApi;

pub(crate) fn session(role: Role) -> Session {
    Session {
        user_id: "u-1".into(),
        username: "alice".into(),
        full_name: "Alice Liddell".into(),
        email: "alice@example.com".into(),
        role,
        token: "jwt-abc".into(),
    }
}

/// Answers every call with `session` (or a canned message), unless a
/// rejection is scripted. Records the name of each call that actually ran.
pub(crate) struct FakeApi {
    session: Session,
    reject: Mutex<Option<(u16, &'static str)>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub(crate) fn accepting(session: Session) -> Arc<Self> {
        Arc::new(Self {
            session,
            reject: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn rejecting(status: u16, message: &'static str) -> Arc<Self> {
        let api = Self::accepting(session(Role::User));
        api.reject_with(Some((status, message)));
        api
    }

    pub(crate) fn reject_with(&self, rejection: Option<(u16, &'static str)>) {
        *self.reject.lock().unwrap() = rejection;
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn answer<T>(&self, call: impl Into<String>, value: T) -> ApiResult<T> {
        self.calls.lock().unwrap().push(call.into());
        match *self.reject.lock().unwrap() {
            Some((status, message)) => Err(ApiError::Rejected {
                status,
                message: message.to_string(),
            }),
            None => Ok(value),
        }
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<String> {
        self.answer(
            format!("register {}", request.username),
            "OTP sent to your email".to_string(),
        )
    }

    async fn verify_email(&self, request: &VerifyEmailRequest) -> ApiResult<Session> {
        self.answer(
            format!("verify {} {}", request.email, request.otp),
            self.session.clone(),
        )
    }

    async fn resend_otp(&self, request: &EmailRequest) -> ApiResult<String> {
        self.answer(format!("resend {}", request.email), "New OTP sent".to_string())
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<Session> {
        self.answer(format!("login {}", request.username), self.session.clone())
    }

    async fn forgot_password(&self, request: &EmailRequest) -> ApiResult<String> {
        self.answer(
            format!("forgot {}", request.email),
            "OTP sent to your email".to_string(),
        )
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<String> {
        self.answer(
            format!("reset {} {}", request.email, request.otp),
            "Password reset successful".to_string(),
        )
    }
}
