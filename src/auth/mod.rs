/// Authentication layer: the session state machine and the identity seam
///
/// Sign-in, sign-up and sign-out are delegated to an external identity
/// provider; this layer only tracks which side of the gate the user is on.

pub mod gate;
pub mod provider;

// Re-export the session types for easy access
pub use gate::*;
pub use provider::*;

use thiserror::Error;

/// Errors surfaced by the identity provider
///
/// These reach the caller verbatim; the session state machine never absorbs
/// them and never retries.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account already exists for {email}")]
    AccountExists { email: String },

    #[error("Password should be at least 6 characters")]
    WeakPassword,

    #[error("Network error: {0}")]
    Network(String),
}
