//! Registration flow: details form → emailed code → verification.
//!
//! ```text
//! CollectingDetails --CodeSent--> OtpSent --SubmitOtp--> Verifying --Verified--> Complete
//!        ^                         |  ^  \                   |
//!        +-------EditDetails-------+  |   +--Resent--+       |
//!                                     +----Rejected----------+
//! ```
//!
//! The flow never touches the network. A controller asks it for a request
//! (`prepare_*`), performs the call, and reports the outcome back. No session
//! exists until the verification call succeeds.

use crate::cooldown::ResendCooldown;
use crate::error::CoreError;
use crate::models::auth::{EmailRequest, RegisterRequest, RegistrationDetails, VerifyEmailRequest};
use crate::otp::OtpInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    CollectingDetails,
    OtpSent,
    Verifying,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationEvent {
    /// The server accepted the details and emailed a code.
    CodeSent,
    /// The user went back to change the details.
    EditDetails,
    /// A full code was submitted for verification.
    SubmitOtp,
    /// The server rejected the code.
    Rejected,
    /// The server verified the code and issued a session.
    Verified,
    /// A fresh code was emailed.
    Resent,
}

impl RegistrationStep {
    /// Transition table. `None` means the event is not valid in this step.
    pub fn next(self, event: RegistrationEvent) -> Option<Self> {
        use RegistrationEvent as E;
        use RegistrationStep as S;

        match (self, event) {
            (S::CollectingDetails, E::CodeSent) => Some(S::OtpSent),
            (S::OtpSent, E::EditDetails) => Some(S::CollectingDetails),
            (S::OtpSent, E::SubmitOtp) => Some(S::Verifying),
            (S::OtpSent, E::Resent) => Some(S::OtpSent),
            (S::Verifying, E::Rejected) => Some(S::OtpSent),
            (S::Verifying, E::Verified) => Some(S::Complete),
            _ => None,
        }
    }
}

/// State of one registration attempt.
#[derive(Debug, Clone)]
pub struct RegistrationFlow {
    step: RegistrationStep,
    details: RegistrationDetails,
    otp: OtpInput,
    cooldown: ResendCooldown,
}

impl RegistrationFlow {
    pub fn new(cooldown: ResendCooldown) -> Self {
        Self {
            step: RegistrationStep::CollectingDetails,
            details: RegistrationDetails::default(),
            otp: OtpInput::new(),
            cooldown,
        }
    }

    pub fn step(&self) -> RegistrationStep {
        self.step
    }

    pub fn details(&self) -> &RegistrationDetails {
        &self.details
    }

    /// The form stays editable in every step so failed submissions keep
    /// what the user typed.
    pub fn details_mut(&mut self) -> &mut RegistrationDetails {
        &mut self.details
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

    /// Advance the resend cooldown by one second.
    pub fn tick(&mut self) -> u32 {
        self.cooldown.tick()
    }

    /// Validate the details form and build the registration request.
    pub fn prepare_registration(&self) -> Result<RegisterRequest, CoreError> {
        self.expect_step(RegistrationStep::CollectingDetails)?;
        self.details.to_request()
    }

    pub fn code_sent(&mut self) -> Result<(), CoreError> {
        self.apply(RegistrationEvent::CodeSent)?;
        self.cooldown.start();
        Ok(())
    }

    pub fn edit_details(&mut self) -> Result<(), CoreError> {
        self.apply(RegistrationEvent::EditDetails)?;
        self.otp.clear();
        Ok(())
    }

    /// Build the verification request and move to `Verifying`.
    ///
    /// Fails locally, without changing state, unless all six digits are in.
    pub fn prepare_verification(&mut self) -> Result<VerifyEmailRequest, CoreError> {
        self.expect_step(RegistrationStep::OtpSent)?;
        let otp = self.otp.require_code()?;
        self.apply(RegistrationEvent::SubmitOtp)?;
        Ok(VerifyEmailRequest {
            email: self.details.email.trim().to_string(),
            otp,
        })
    }

    pub fn verification_failed(&mut self) -> Result<(), CoreError> {
        self.apply(RegistrationEvent::Rejected)
    }

    pub fn verified(&mut self) -> Result<(), CoreError> {
        self.apply(RegistrationEvent::Verified)
    }

    /// Build the resend request if the cooldown has run out.
    pub fn prepare_resend(&self) -> Result<EmailRequest, CoreError> {
        self.expect_step(RegistrationStep::OtpSent)?;
        if !self.cooldown.is_ready() {
            return Err(CoreError::Validation(format!(
                "Resend OTP in {}s",
                self.cooldown.remaining()
            )));
        }
        EmailRequest::new(&self.details.email)
    }

    /// A new code was sent: restart the cooldown and empty the code boxes.
    pub fn resent(&mut self) -> Result<(), CoreError> {
        self.apply(RegistrationEvent::Resent)?;
        self.cooldown.start();
        self.otp.clear();
        Ok(())
    }

    fn expect_step(&self, expected: RegistrationStep) -> Result<(), CoreError> {
        if self.step != expected {
            return Err(CoreError::Validation(format!(
                "Registration is in step {:?}, expected {expected:?}",
                self.step
            )));
        }
        Ok(())
    }

    fn apply(&mut self, event: RegistrationEvent) -> Result<(), CoreError> {
        self.step = self.step.next(event).ok_or_else(|| {
            CoreError::Validation(format!(
                "Cannot apply {event:?} during registration step {:?}",
                self.step
            ))
        })?;
        Ok(())
    }
}

impl Default for RegistrationFlow {
    fn default() -> Self {
        Self::new(ResendCooldown::default())
    }
}
