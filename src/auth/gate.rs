/// Session gate: the single authority over authentication state
///
/// The gate starts in Loading, asks the identity provider exactly once for
/// a surviving session, and settles into Authenticated or Unauthenticated.
/// Every later transition goes through the gate so observers subscribed to
/// its channel always see a consistent history.

use std::sync::Arc;
use tokio::sync::watch;

use crate::auth::provider::{IdentityProvider, Session};
use crate::auth::AuthError;

/// Authentication state as seen by the rest of the app
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Initial session check has not finished yet
    #[default]
    Loading,
    /// A user is signed in
    Authenticated(Session),
    /// No user is signed in
    Unauthenticated,
}

impl SessionState {
    /// User id of the signed-in user, if any
    pub fn user_id(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated(session) => Some(session.user_id.as_str()),
            _ => None,
        }
    }
}

/// Gate in front of the identity provider
pub struct SessionGate {
    provider: Arc<dyn IdentityProvider>,
    state: watch::Sender<SessionState>,
}

impl SessionGate {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            state: watch::Sender::new(SessionState::Loading),
        }
    }

    /// Run the startup session check
    ///
    /// Resolves Loading into Authenticated or Unauthenticated. A provider
    /// failure counts as "no session": the user lands on the sign-in screen
    /// instead of a spinner that never ends. Calling this again after the
    /// state has settled is a no-op.
    pub async fn resolve(&self) {
        if !self.is_loading() {
            return;
        }

        match self.provider.current_session().await {
            Ok(Some(session)) => {
                tracing::info!("Restored session for {}", session.email);
                self.state.send_replace(SessionState::Authenticated(session));
            }
            Ok(None) => {
                self.state.send_replace(SessionState::Unauthenticated);
            }
            Err(e) => {
                tracing::warn!("Initial session check failed: {}", e);
                self.state.send_replace(SessionState::Unauthenticated);
            }
        }
    }

    /// Sign in with email and password, returning the resolved session
    ///
    /// On failure the state is left untouched and the provider's error is
    /// returned as-is for the caller to display.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self.provider.sign_in(email, password).await?;
        tracing::info!("Signed in {}", session.email);
        self.state
            .send_replace(SessionState::Authenticated(session.clone()));
        Ok(session)
    }

    /// Create an account and sign it in
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self.provider.create_account(email, password).await?;
        tracing::info!("Created account for {}", session.email);
        self.state
            .send_replace(SessionState::Authenticated(session.clone()));
        Ok(session)
    }

    /// End the active session
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await?;
        self.state.send_replace(SessionState::Unauthenticated);
        Ok(())
    }

    /// Drop an authenticated session that the provider reports expired
    ///
    /// Only valid from Authenticated; in any other state this is a no-op so
    /// a late expiry signal cannot clobber Loading.
    pub fn expire(&self) {
        let expired = {
            let current = self.state.borrow();
            matches!(*current, SessionState::Authenticated(_))
        };
        if expired {
            tracing::info!("Session expired");
            self.state.send_replace(SessionState::Unauthenticated);
        }
    }

    /// Current state, cloned
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribe to state transitions
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// User id of the signed-in user, if any
    pub fn user_id(&self) -> Option<String> {
        self.state.borrow().user_id().map(str::to_string)
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.state.borrow(), SessionState::Loading)
    }
}
