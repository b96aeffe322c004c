//! Resend cooldown counter for one-time codes.

/// Seconds a user must wait before requesting another code.
pub const DEFAULT_RESEND_COOLDOWN_SECS: u32 = 60;

/// Whole-second countdown that gates the "resend code" action.
///
/// The counter does not own a clock; whoever drives the flow calls
/// [`tick`](Self::tick) once per elapsed second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResendCooldown {
    period: u32,
    remaining: u32,
}

impl ResendCooldown {
    /// An idle cooldown (resend allowed) that restarts at `period` seconds.
    pub fn new(period: u32) -> Self {
        Self {
            period,
            remaining: 0,
        }
    }

    pub fn start(&mut self) {
        self.remaining = self.period;
    }

    /// Advance by one second. Returns the seconds left.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn is_ready(&self) -> bool {
        self.remaining == 0
    }
}

impl Default for ResendCooldown {
    fn default() -> Self {
        Self::new(DEFAULT_RESEND_COOLDOWN_SECS)
    }
}
