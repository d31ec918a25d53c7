//! Authentication error types.
//!
//! A rejected login is not an error: authenticators report it through the
//! flow context as a challenge. [`AuthError`] covers the cases where the
//! attempt cannot be processed at all.

use kc_storage::StorageError;
use thiserror::Error;

/// Authentication operation errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The flow context was mutated after its terminal transition.
    #[error("invalid authentication state: {0}")]
    InvalidState(&'static str),

    /// A credential validator reported success without binding a user.
    #[error("credential validation succeeded without a bound user")]
    MissingUser,

    /// The user or group store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Internal error.
    #[error("internal authentication error: {0}")]
    Internal(String),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
