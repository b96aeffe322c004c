//! Drivers for the two OTP flows: registration and password reset.
//!
//! A controller owns its state machine, the one-second timer that drives the
//! resend cooldown, and a [`CancellationToken`]. Dropping the controller
//! drops the timer; cancelling the token abandons any call in flight, and
//! the abandoned call's result is never applied.
//!
//! Every submission takes `&mut self`, so a flow cannot have two requests
//! in flight at once.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use wellnest_core::cooldown::ResendCooldown;
use wellnest_core::error::CoreError;
use wellnest_core::password_reset::PasswordResetFlow;
use wellnest_core::registration::RegistrationFlow;
use wellnest_core::session::Session;

use crate::error::{ApiError, RegistrationError, VerificationError};
use crate::store::{OtpSent, SessionStore};
use crate::transport::AuthApi;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Rejected locally; nothing was sent.
    #[error("{}", .0.message())]
    Invalid(#[from] CoreError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Request cancelled")]
    Cancelled,
}

/// Await `call` unless `cancel` fires first.
async fn race<T, E>(
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T, E>>,
) -> Result<T, FlowError>
where
    E: Into<FlowError>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!("Request cancelled before completion");
            Err(FlowError::Cancelled)
        }
        result = call => result.map_err(Into::into),
    }
}

/// One-second ticker that only exists while a cooldown is running.
#[derive(Debug, Default)]
struct CooldownTimer {
    interval: Option<Interval>,
}

impl CooldownTimer {
    fn restart(&mut self) {
        let mut interval = interval_at(Instant::now() + TICK, TICK);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn stop(&mut self) {
        self.interval = None;
    }

    /// Wait for the next second, or forever when stopped.
    async fn wait(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

/// Wait for one cooldown second and apply it via `tick`.
async fn next_cooldown_tick(
    timer: &mut CooldownTimer,
    cooldown_ready: bool,
    tick: impl FnOnce() -> u32,
) -> u32 {
    if cooldown_ready {
        timer.stop();
    }
    timer.wait().await;
    let remaining = tick();
    if remaining == 0 {
        timer.stop();
    }
    remaining
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Details form → emailed code → verified account with a session.
pub struct RegistrationController {
    flow: RegistrationFlow,
    store: Arc<SessionStore>,
    timer: CooldownTimer,
    cancel: CancellationToken,
}

impl RegistrationController {
    pub fn new(store: Arc<SessionStore>, cooldown_secs: u32) -> Self {
        Self {
            flow: RegistrationFlow::new(ResendCooldown::new(cooldown_secs)),
            store,
            timer: CooldownTimer::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn flow(&self) -> &RegistrationFlow {
        &self.flow
    }

    /// Edit the form or the code boxes.
    pub fn flow_mut(&mut self) -> &mut RegistrationFlow {
        &mut self.flow
    }

    /// Token that abandons whatever call is in flight when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Validate the details and ask the server to email a code.
    pub async fn submit_details(&mut self) -> Result<OtpSent, FlowError> {
        let request = self.flow.prepare_registration()?;
        let sent = race(&self.cancel, self.store.register(&request)).await?;
        self.flow.code_sent()?;
        self.timer.restart();
        Ok(sent)
    }

    /// Go back to the details form; the code boxes are emptied.
    pub fn edit_details(&mut self) -> Result<(), FlowError> {
        self.flow.edit_details()?;
        self.timer.stop();
        Ok(())
    }

    /// Submit the six-digit code. Success signs the user in.
    pub async fn verify(&mut self) -> Result<Session, FlowError> {
        let request = self.flow.prepare_verification()?;
        match race(&self.cancel, self.store.verify_email(&request)).await {
            Ok(session) => {
                self.flow.verified()?;
                self.timer.stop();
                Ok(session)
            }
            Err(e) => {
                self.flow.verification_failed()?;
                Err(e)
            }
        }
    }

    /// Ask for a fresh code once the cooldown has run out.
    pub async fn resend(&mut self) -> Result<String, FlowError> {
        let request = self.flow.prepare_resend()?;
        let api = self.store.api();
        let message = race(&self.cancel, api.resend_otp(&request)).await?;
        self.flow.resent()?;
        self.timer.restart();
        Ok(message)
    }

    /// Wait one second of resend cooldown and return the seconds left.
    /// Never completes while no cooldown is running. Cancel-safe.
    pub async fn next_tick(&mut self) -> u32 {
        let ready = self.flow.cooldown().is_ready();
        next_cooldown_tick(&mut self.timer, ready, || self.flow.tick()).await
    }
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

/// Email → emailed code → new password.
pub struct PasswordResetController {
    flow: PasswordResetFlow,
    api: Arc<dyn AuthApi>,
    timer: CooldownTimer,
    cancel: CancellationToken,
}

impl PasswordResetController {
    pub fn new(api: Arc<dyn AuthApi>, cooldown_secs: u32) -> Self {
        Self {
            flow: PasswordResetFlow::new(ResendCooldown::new(cooldown_secs)),
            api,
            timer: CooldownTimer::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn flow(&self) -> &PasswordResetFlow {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut PasswordResetFlow {
        &mut self.flow
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn send_code(&mut self) -> Result<String, FlowError> {
        let request = self.flow.prepare_send_code()?;
        let message = race(&self.cancel, self.api.forgot_password(&request)).await?;
        self.flow.code_sent()?;
        self.timer.restart();
        Ok(message)
    }

    /// Accept the code locally; the server only checks it at the final step.
    pub fn confirm_otp(&mut self) -> Result<(), FlowError> {
        self.flow.confirm_otp()?;
        Ok(())
    }

    pub async fn reset_password(&mut self) -> Result<String, FlowError> {
        let request = self.flow.prepare_reset()?;
        let message = race(&self.cancel, self.api.reset_password(&request)).await?;
        self.flow.password_reset()?;
        self.timer.stop();
        tracing::info!("Password reset completed");
        Ok(message)
    }

    /// Request a fresh password-reset code. This goes through
    /// `forgot-password` again; `resend-otp` only issues verification codes.
    pub async fn resend(&mut self) -> Result<String, FlowError> {
        let request = self.flow.prepare_resend()?;
        let message = race(&self.cancel, self.api.forgot_password(&request)).await?;
        self.flow.resent()?;
        self.timer.restart();
        Ok(message)
    }

    /// See [`RegistrationController::next_tick`].
    pub async fn next_tick(&mut self) -> u32 {
        let ready = self.flow.cooldown().is_ready();
        next_cooldown_tick(&mut self.timer, ready, || self.flow.tick()).await
    }
}
