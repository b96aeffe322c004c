//! Domain types and pure logic for the WellNest client.
//!
//! Nothing in this crate performs I/O. The session record, route guard,
//! OTP input buffer, and the registration / password-reset state machines
//! live here so they can be tested without a network or a UI.

pub mod cooldown;
pub mod error;
pub mod models;
pub mod otp;
pub mod password_reset;
pub mod registration;
pub mod roles;
pub mod routes;
pub mod session;
pub mod types;
pub mod validation;
