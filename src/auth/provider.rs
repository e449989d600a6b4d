/// Identity provider seam and the bundled in-memory provider
///
/// The real identity service lives outside this crate and is consumed
/// through the IdentityProvider trait. The in-memory provider backs tests
/// and local runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::AuthError;

/// An authenticated session handed out by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque user identifier minted by the provider
    pub user_id: String,
    /// Email the session was established for
    pub email: String,
}

/// External identity service
///
/// Mirrors the consumed contract: password sign-in, account creation,
/// sign-out, and the initial session check the provider answers once at
/// startup. Every call may fail with a provider-defined error.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate an email/password pair
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Create a new identity and sign it in
    async fn create_account(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// End the active session
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// The session surviving from a previous run, if any
    async fn current_session(&self) -> Result<Option<Session>, AuthError>;
}

const MIN_PASSWORD_LEN: usize = 6;

/// In-memory identity provider for tests and local runs
///
/// Accounts live in a map; user ids are minted v4 UUIDs, shaped like the
/// opaque uids a hosted provider returns. The offline toggle makes every
/// call fail with a network error so callers can exercise that path.
#[derive(Debug, Default)]
pub struct MemoryIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    current: Mutex<Option<Session>>,
    offline: AtomicBool,
}

#[derive(Debug, Clone)]
struct Account {
    user_id: String,
    password: String,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register an account, builder style
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.accounts_guard().insert(
            email.to_string(),
            Account {
                user_id: Uuid::new_v4().to_string(),
                password: password.to_string(),
            },
        );
        self
    }

    /// Pre-register an account and leave its session active, as if the
    /// previous run never signed out
    pub fn with_active_session(self, email: &str, password: &str) -> Self {
        let provider = self.with_account(email, password);
        let session = provider
            .accounts_guard()
            .get(email)
            .map(|account| Session {
                user_id: account.user_id.clone(),
                email: email.to_string(),
            });
        *provider.current_guard() = session;
        provider
    }

    /// Cut or restore connectivity; while offline every call fails
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), AuthError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AuthError::Network(
                "identity provider is unreachable".to_string(),
            ));
        }
        Ok(())
    }

    fn accounts_guard(&self) -> MutexGuard<'_, HashMap<String, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_guard(&self) -> MutexGuard<'_, Option<Session>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.check_online()?;

        let session = {
            let accounts = self.accounts_guard();
            match accounts.get(email) {
                Some(account) if account.password == password => Session {
                    user_id: account.user_id.clone(),
                    email: email.to_string(),
                },
                _ => return Err(AuthError::InvalidCredentials),
            }
        };

        *self.current_guard() = Some(session.clone());
        tracing::debug!("Signed in {}", email);
        Ok(session)
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.check_online()?;

        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let session = {
            let mut accounts = self.accounts_guard();
            if accounts.contains_key(email) {
                return Err(AuthError::AccountExists {
                    email: email.to_string(),
                });
            }

            let account = Account {
                user_id: Uuid::new_v4().to_string(),
                password: password.to_string(),
            };
            let session = Session {
                user_id: account.user_id.clone(),
                email: email.to_string(),
            };
            accounts.insert(email.to_string(), account);
            session
        };

        *self.current_guard() = Some(session.clone());
        tracing::debug!("Created account for {}", email);
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.check_online()?;
        *self.current_guard() = None;
        tracing::debug!("Signed out");
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        self.check_online()?;
        Ok(self.current_guard().clone())
    }
}
