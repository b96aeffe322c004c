//! Password reset flow: email → emailed code → new password → done.
//!
//! The code is only checked for completeness when the user moves to the
//! password step; the server redeems it together with the new password in
//! the final request.

use crate::cooldown::ResendCooldown;
use crate::error::CoreError;
use crate::models::auth::{EmailRequest, ResetPasswordRequest};
use crate::otp::OtpInput;
use crate::validation::validate_new_password;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    EmailEntry,
    OtpEntry,
    PasswordEntry,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetEvent {
    CodeSent,
    Resent,
    OtpConfirmed,
    PasswordReset,
}

impl ResetStep {
    /// Transition table. `None` means the event is not valid in this step.
    pub fn next(self, event: ResetEvent) -> Option<Self> {
        use ResetEvent as E;
        use ResetStep as S;

        match (self, event) {
            (S::EmailEntry, E::CodeSent) => Some(S::OtpEntry),
            (S::OtpEntry, E::Resent) => Some(S::OtpEntry),
            (S::OtpEntry, E::OtpConfirmed) => Some(S::PasswordEntry),
            (S::PasswordEntry, E::PasswordReset) => Some(S::Done),
            _ => None,
        }
    }
}

/// State of one password reset attempt.
#[derive(Debug, Clone)]
pub struct PasswordResetFlow {
    step: ResetStep,
    email: String,
    otp: OtpInput,
    new_password: String,
    confirm_password: String,
    cooldown: ResendCooldown,
}

impl PasswordResetFlow {
    pub fn new(cooldown: ResendCooldown) -> Self {
        Self {
            step: ResetStep::EmailEntry,
            email: String::new(),
            otp: OtpInput::new(),
            new_password: String::new(),
            confirm_password: String::new(),
            cooldown,
        }
    }

    pub fn step(&self) -> ResetStep {
        self.step
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_passwords(&mut self, new_password: impl Into<String>, confirm: impl Into<String>) {
        self.new_password = new_password.into();
        self.confirm_password = confirm.into();
    }

    pub fn otp(&self) -> &OtpInput {
        &self.otp
    }

    pub fn otp_mut(&mut self) -> &mut OtpInput {
        &mut self.otp
    }

    pub fn cooldown(&self) -> &ResendCooldown {
        &self.cooldown
    }

    pub fn tick(&mut self) -> u32 {
        self.cooldown.tick()
    }

    pub fn prepare_send_code(&self) -> Result<EmailRequest, CoreError> {
        self.expect_step(ResetStep::EmailEntry)?;
        EmailRequest::new(&self.email)
    }

    pub fn code_sent(&mut self) -> Result<(), CoreError> {
        self.apply(ResetEvent::CodeSent)?;
        self.cooldown.start();
        Ok(())
    }

    /// Accept the entered code locally and move on to the password step.
    pub fn confirm_otp(&mut self) -> Result<(), CoreError> {
        self.expect_step(ResetStep::OtpEntry)?;
        self.otp.require_code()?;
        self.apply(ResetEvent::OtpConfirmed)
    }

    /// Validate the new password pair and build the final request, which
    /// carries the code confirmed earlier.
    pub fn prepare_reset(&self) -> Result<ResetPasswordRequest, CoreError> {
        self.expect_step(ResetStep::PasswordEntry)?;
        validate_new_password(&self.new_password, &self.confirm_password)?;
        Ok(ResetPasswordRequest {
            email: self.email.trim().to_string(),
            otp: self.otp.require_code()?,
            new_password: self.new_password.clone(),
        })
    }

    pub fn password_reset(&mut self) -> Result<(), CoreError> {
        self.apply(ResetEvent::PasswordReset)
    }

    pub fn prepare_resend(&self) -> Result<EmailRequest, CoreError> {
        self.expect_step(ResetStep::OtpEntry)?;
        if !self.cooldown.is_ready() {
            return Err(CoreError::Validation(format!(
                "Resend OTP in {}s",
                self.cooldown.remaining()
            )));
        }
        EmailRequest::new(&self.email)
    }

    pub fn resent(&mut self) -> Result<(), CoreError> {
        self.apply(ResetEvent::Resent)?;
        self.cooldown.start();
        self.otp.clear();
        Ok(())
    }

    fn expect_step(&self, expected: ResetStep) -> Result<(), CoreError> {
        if self.step != expected {
            return Err(CoreError::Validation(format!(
                "Password reset is in step {:?}, expected {expected:?}",
                self.step
            )));
        }
        Ok(())
    }

    fn apply(&mut self, event: ResetEvent) -> Result<(), CoreError> {
        self.step = self.step.next(event).ok_or_else(|| {
            CoreError::Validation(format!(
                "Cannot apply {event:?} during password reset step {:?}",
                self.step
            ))
        })?;
        Ok(())
    }
}

impl Default for PasswordResetFlow {
    fn default() -> Self {
        Self::new(ResendCooldown::default())
    }
}
