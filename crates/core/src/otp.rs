//! Six-slot one-time-code input.
//!
//! Models the row of single-digit boxes used by the email-verification and
//! password-reset screens: per-slot entry with automatic focus movement,
//! backspace navigation, and clipboard paste.

use crate::error::CoreError;

/// Number of digits in a one-time code.
pub const OTP_LENGTH: usize = 6;

/// Index of the last slot.
const LAST_SLOT: usize = OTP_LENGTH - 1;

/// A fixed-width buffer of optional digits plus the focused slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpInput {
    slots: [Option<char>; OTP_LENGTH],
    focus: usize,
}

impl OtpInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[Option<char>; OTP_LENGTH] {
        &self.slots
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Handle the new value of slot `index`.
    ///
    /// `value` is what the slot's text box would now contain: it may be
    /// empty (the slot is cleared) or hold more than one digit when the user
    /// typed over an existing digit, in which case the last one wins.
    /// Anything containing a non-digit is rejected and the buffer is left
    /// untouched.
    pub fn enter(&mut self, index: usize, value: &str) -> Result<(), CoreError> {
        check_index(index)?;
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::Validation(
                "One-time code accepts digits only".to_string(),
            ));
        }

        self.slots[index] = value.chars().last();
        if self.slots[index].is_some() && index < LAST_SLOT {
            self.focus = index + 1;
        } else {
            self.focus = index;
        }
        Ok(())
    }

    /// Handle a backspace key press in slot `index`.
    ///
    /// A filled slot is cleared in place; on an empty slot focus moves one
    /// slot to the left.
    pub fn backspace(&mut self, index: usize) -> Result<(), CoreError> {
        check_index(index)?;
        if self.slots[index].is_some() {
            self.slots[index] = None;
            self.focus = index;
        } else {
            self.focus = index.saturating_sub(1);
        }
        Ok(())
    }

    /// Paste clipboard text: digits are kept, everything else is dropped,
    /// and at most [`OTP_LENGTH`] digits fill the buffer from the first slot.
    ///
    /// Returns the number of digits placed.
    pub fn paste(&mut self, text: &str) -> usize {
        let digits: Vec<char> = text
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(OTP_LENGTH)
            .collect();

        for (slot, digit) in self.slots.iter_mut().zip(&digits) {
            *slot = Some(*digit);
        }
        self.focus = digits.len().min(LAST_SLOT);
        digits.len()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The full code, or `None` until every slot is filled.
    pub fn code(&self) -> Option<String> {
        self.slots.iter().copied().collect()
    }

    /// Like [`code`](Self::code), but as the user-facing validation error
    /// raised before any network call.
    pub fn require_code(&self) -> Result<String, CoreError> {
        self.code().ok_or_else(|| {
            CoreError::Validation(format!("Please enter the {OTP_LENGTH}-digit OTP"))
        })
    }
}

fn check_index(index: usize) -> Result<(), CoreError> {
    if index >= OTP_LENGTH {
        return Err(CoreError::Validation(format!(
            "OTP slot {index} out of range (0..{OTP_LENGTH})"
        )));
    }
    Ok(())
}
