//! Account lookup and secret verification.
//!
//! The engine delegates the actual credential check to an external verifier
//! (typically backed by an account database and a password hash comparison).
//! It only needs two answers: does this identifier resolve to an account,
//! and does the supplied secret match.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A resolved account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable account id, used in the per-account failure counter key.
    pub id: Uuid,
    /// The credential identifier this account was looked up by (e.g. email).
    pub identifier: String,
}

/// Trait for credential verifier implementations.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Look up an account by its credential identifier.
    ///
    /// Returns `None` when no account exists for the identifier. The engine
    /// never surfaces that distinction to the caller.
    async fn find_account(&self, identifier: &str) -> Option<Account>;

    /// Check a secret against an account.
    async fn check_secret(&self, account: &Account, secret: &str) -> bool;
}
