//! Networked half of the WellNest client.
//!
//! * [`api::WellnestApi`] speaks the REST API; [`authorized::AuthorizedApi`]
//!   adds the bearer token for the trainer, profile, report and admin
//!   endpoints.
//! * [`store::SessionStore`] owns the signed-in session, persists it through
//!   [`storage::SessionStorage`], and publishes changes to subscribers.
//! * [`flows`] drives registration and password reset, including the resend
//!   cooldown timer.

pub mod api;
pub mod authorized;
pub mod config;
pub mod error;
pub mod flows;
pub mod storage;
pub mod store;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use api::WellnestApi;
pub use config::ClientConfig;
pub use store::SessionStore;
