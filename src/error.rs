//! Error types for authentication throttling.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::store::StoreError;

/// Terminal verdicts of a throttled authentication attempt.
///
/// All three named variants cross the component boundary for the caller to
/// render or act on; the engine performs no local retries.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No stable client origin could be resolved from the request metadata.
    /// Fatal for the request; no store state has been touched.
    #[error("client origin could not be determined")]
    UnknownOrigin,

    /// A block is active for this origin. No counters were mutated by this
    /// call; the caller should back off until `retry_at`.
    #[error("too many failed attempts, retry after {retry_at}")]
    Throttled {
        /// Timestamp at which the next attempt is permitted.
        retry_at: DateTime<Utc>,
    },

    /// The account does not exist or the secret did not match. Deliberately
    /// indistinguishable between the two cases; counters and the block have
    /// been updated as a side effect.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The counter store was unreachable and the configured policy is
    /// fail-closed.
    #[error("counter store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for throttled authentication.
pub type Result<T> = std::result::Result<T, AuthError>;
