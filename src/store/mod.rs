//! Counter store abstraction and implementations.
//!
//! The store is the only shared mutable resource in the system. Every
//! operation must be atomic with respect to concurrent callers across
//! processes and hosts; `try_create` in particular is the sole primitive the
//! engine uses as a distributed mutex.

mod intercept;
mod memory;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use intercept::{InterceptedStore, RecordingInterceptor, StoreInterceptor, StoreOp};
pub use memory::MemoryStore;

/// Infrastructure failure of the counter store.
///
/// Implementations must surface unreachable-store conditions as this error
/// rather than reporting "key absent" - an implicit absent-on-error policy
/// would let an attacker bypass throttling by inducing store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached or the operation timed out.
    #[error("counter store unavailable: {0}")]
    Unavailable(String),

    /// The store returned a value the client could not interpret.
    #[error("counter store returned malformed data for key {key}: {detail}")]
    Malformed {
        /// Key whose value could not be decoded.
        key: String,
        /// What went wrong decoding it.
        detail: String,
    },
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Trait for counter store implementations.
///
/// Values are signed 64-bit integers: failure counters hold counts, block
/// records hold unix-second timestamps. Every key carries a TTL after which
/// it expires to absent.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Create `key` with `value` and `ttl` only if it does not already exist.
    ///
    /// Returns `true` if the key was created, `false` (with no mutation) if
    /// it already existed. The create-if-absent check and the write are a
    /// single atomic step.
    async fn try_create(&self, key: &str, value: i64, ttl: Duration) -> StoreResult<bool>;

    /// Atomically add one to the value at `key` and return the new value.
    ///
    /// Callers are expected to `try_create` first; incrementing a missing
    /// key recreates it, matching the usual cache-server semantics.
    async fn increment(&self, key: &str) -> StoreResult<i64>;

    /// Read the value at `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> StoreResult<Option<i64>>;

    /// Unconditionally overwrite `key` with `value` and a fresh `ttl`.
    async fn set(&self, key: &str, value: i64, ttl: Duration) -> StoreResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;
}
