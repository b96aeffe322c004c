//! The Session Store: single owner of "who is logged in".
//!
//! Screens never write the session themselves. They call the operations
//! here, which talk to the API through [`AuthApi`], persist the result through
//! [`SessionStorage`], and publish the new [`AuthState`] to every subscriber.
//!
//! Successful mutations persist first and publish second: if the write to
//! storage fails, subscribers keep seeing the previous state.

use std::sync::Arc;

use tokio::sync::watch;
use wellnest_core::models::auth::{LoginRequest, RegisterRequest, VerifyEmailRequest};
use wellnest_core::session::{AuthState, Session};

use crate::error::{ApiError, AuthError, RegistrationError, VerificationError};
use crate::storage::{clear_session, read_session, write_session, SessionStorage, StorageError};
use crate::transport::AuthApi;

/// Acknowledgement that the server emailed a verification code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpSent {
    /// Server confirmation, e.g. "OTP sent to your email".
    pub message: String,
}

pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    storage: Box<dyn SessionStorage>,
    state: watch::Sender<AuthState>,
}

impl SessionStore {
    /// Create a store in the `loading` state. Call
    /// [`restore_from_storage`](Self::restore_from_storage) once at start-up.
    pub fn new(api: Arc<dyn AuthApi>, storage: Box<dyn SessionStorage>) -> Self {
        let (state, _) = watch::channel(AuthState::loading());
        Self {
            api,
            storage,
            state,
        }
    }

    /// Observe every state change. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    /// The API the store signs in through.
    pub fn api(&self) -> Arc<dyn AuthApi> {
        Arc::clone(&self.api)
    }

    // ---- start-up ----

    /// Load the persisted session, if any, and leave the loading state.
    ///
    /// Never touches the network. Unreadable or malformed storage counts as
    /// "no session".
    pub fn restore_from_storage(&self) -> Option<Session> {
        let session = match read_session(self.storage.as_ref()) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored session");
                None
            }
        };

        match &session {
            Some(s) => tracing::info!(user_id = %s.user_id, role = %s.role, "Restored session"),
            None => tracing::debug!("No stored session"),
        }

        self.publish(AuthState {
            loading: false,
            session: session.clone(),
        });
        session
    }

    // ---- authentication ----

    /// Exchange credentials for a session.
    ///
    /// On failure the previous state is left exactly as it was.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, AuthError> {
        request
            .validate_fields()
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;

        let session = self.api.login(request).await.map_err(|e| {
            tracing::info!(error = %e, "Login rejected");
            AuthError::from(e)
        })?;
        self.establish(session.clone())?;
        Ok(session)
    }

    /// Log in through the admin portal.
    ///
    /// A valid login for a non-admin account is not kept: the session is
    /// cleared and [`AuthError::NotAdmin`] returned.
    pub async fn admin_login(&self, request: &LoginRequest) -> Result<Session, AuthError> {
        request
            .validate_fields()
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;

        let session = self.api.login(request).await?;
        if !session.is_admin() {
            tracing::warn!(user_id = %session.user_id, role = %session.role, "Admin login by non-admin account");
            self.logout();
            return Err(AuthError::NotAdmin);
        }
        self.establish(session.clone())?;
        Ok(session)
    }

    /// Create an account. The server emails a verification code; no session
    /// exists until [`verify_email`](Self::verify_email) succeeds.
    pub async fn register(&self, request: &RegisterRequest) -> Result<OtpSent, RegistrationError> {
        let message = self.api.register(request).await.map_err(|e| {
            tracing::info!(username = %request.username, error = %e, "Registration rejected");
            RegistrationError::from(e)
        })?;
        tracing::info!(username = %request.username, role = ?request.role, "Registration code sent");
        Ok(OtpSent { message })
    }

    /// Redeem the emailed code. Success signs the user in exactly like
    /// [`login`](Self::login).
    pub async fn verify_email(
        &self,
        request: &VerifyEmailRequest,
    ) -> Result<Session, VerificationError> {
        let session = self
            .api
            .verify_email(request)
            .await
            .map_err(VerificationError::from)?;
        self.establish(session.clone())?;
        Ok(session)
    }

    /// Forget the session in memory and on disk. Safe to call repeatedly.
    pub fn logout(&self) {
        if let Err(e) = clear_session(self.storage.as_ref()) {
            tracing::error!(error = %e, "Failed to clear stored session");
        }
        let previous = self.publish(AuthState::anonymous());
        if let Some(s) = previous.session {
            tracing::info!(user_id = %s.user_id, "Logged out");
        }
    }

    /// React to an error from an authorized call. A 401 means the stored
    /// credential is no longer accepted, so the session is dropped.
    ///
    /// Returns true when the session was cleared.
    pub fn handle_api_error(&self, err: &ApiError) -> bool {
        if !err.is_credential_invalid() || self.session().is_none() {
            return false;
        }
        tracing::warn!("Credential rejected by the server, signing out");
        self.logout();
        true
    }

    fn establish(&self, session: Session) -> Result<(), StorageError> {
        write_session(self.storage.as_ref(), &session).map_err(|e| {
            tracing::error!(user_id = %session.user_id, error = %e, "Failed to persist session");
            e
        })?;
        tracing::info!(user_id = %session.user_id, role = %session.role, "Signed in");
        self.publish(AuthState::signed_in(session));
        Ok(())
    }

    fn publish(&self, state: AuthState) -> AuthState {
        self.state.send_replace(state)
    }
}
