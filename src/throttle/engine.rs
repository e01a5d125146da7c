//! Throttle decision engine.
//!
//! Sequences origin resolution, the block-slot claim, credential
//! verification, and counter maintenance into a single allow/deny/throttled
//! verdict. The engine keeps no state between invocations; everything lives
//! in the counter store, so any number of engine instances across processes
//! and hosts can share one throttle.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, warn};

use crate::account::{Account, CredentialVerifier};
use crate::clock::Clock;
use crate::config::{StoreFailurePolicy, ThrottleConfig};
use crate::error::{AuthError, Result};
use crate::origin::{ClientMeta, OriginResolver};
use crate::store::{CounterStore, StoreError};

use super::keys::{block_key, origin_account_key, origin_key};
use super::policy::{delay, MAX_DELAY, MIN_DELAY};

/// The throttle decision engine.
///
/// All collaborators are injected, so tests can substitute in-memory fakes
/// and deployments can share or isolate stores as they see fit.
pub struct ThrottleEngine {
    store: Arc<dyn CounterStore>,
    verifier: Arc<dyn CredentialVerifier>,
    resolver: Arc<dyn OriginResolver>,
    clock: Arc<dyn Clock>,
    config: ThrottleConfig,
}

impl ThrottleEngine {
    /// Create a new engine from its collaborators.
    pub fn new(
        store: Arc<dyn CounterStore>,
        verifier: Arc<dyn CredentialVerifier>,
        resolver: Arc<dyn OriginResolver>,
        clock: Arc<dyn Clock>,
        config: ThrottleConfig,
    ) -> Self {
        Self {
            store,
            verifier,
            resolver,
            clock,
            config,
        }
    }

    /// Run one throttled authentication attempt.
    ///
    /// Returns the account on success. Otherwise returns
    /// [`AuthError::UnknownOrigin`] (no store state touched),
    /// [`AuthError::Throttled`] (an active block, no counters mutated), or
    /// [`AuthError::InvalidCredentials`] (counters and block updated).
    pub async fn authenticate(
        &self,
        meta: &ClientMeta,
        identifier: &str,
        secret: &str,
    ) -> Result<Account> {
        // Step 1: resolve the client origin. Unidentifiable clients are too
        // risky to process; reject before touching the store.
        let Some(origin) = self.resolver.resolve(meta) else {
            warn!("rejecting authentication attempt with unresolvable client origin");
            return Err(AuthError::UnknownOrigin);
        };

        let now = self.clock.now();
        let block = block_key(&self.config.key_prefix, &origin);
        let claim_until = now + TimeDelta::seconds(MIN_DELAY as i64);

        // Step 2: claim the block slot. The atomic create-if-absent is the
        // only mutex in the system: of any number of concurrent attempts
        // from one origin, exactly one reaches the verifier.
        let claimed = match self
            .store
            .try_create(&block, claim_until.timestamp(), Duration::from_secs(MIN_DELAY))
            .await
        {
            Ok(claimed) => claimed,
            Err(e) => {
                self.on_store_failure(e)?;
                true
            }
        };

        if !claimed {
            let retry_at = self.read_block(&block, claim_until).await?;
            debug!(origin = %origin, retry_at = %retry_at, "origin is blocked");
            return Err(AuthError::Throttled { retry_at });
        }

        // Step 3: verify the credentials.
        let account = self.verifier.find_account(identifier).await;
        if let Some(account) = &account {
            if self.verifier.check_secret(account, secret).await {
                self.clear_failure_state(&origin, account, &block).await?;
                debug!(origin = %origin, account = %account.id, "authentication succeeded");
                return Ok(account.clone());
            }
        }

        self.record_failure(&origin, account.as_ref(), &block, now).await?;
        Err(AuthError::InvalidCredentials)
    }

    /// Read the next-allowed timestamp from an existing block.
    ///
    /// The block can expire between the lost claim and this read; the
    /// claim-based timestamp is the correct answer in that case.
    async fn read_block(
        &self,
        block: &str,
        claim_until: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        let value = match self.store.get(block).await {
            Ok(value) => value,
            Err(e) => {
                self.on_store_failure(e)?;
                None
            }
        };

        Ok(value
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or(claim_until))
    }

    /// Success path: wipe all failure state for this origin. The claim is
    /// deleted too; its short TTL would expire it anyway, but deletion is
    /// immediate.
    async fn clear_failure_state(
        &self,
        origin: &str,
        account: &Account,
        block: &str,
    ) -> Result<()> {
        let prefix = &self.config.key_prefix;
        for key in [
            origin_key(prefix, origin),
            origin_account_key(prefix, origin, account.id),
            block.to_string(),
        ] {
            if let Err(e) = self.store.delete(&key).await {
                self.on_store_failure(e)?;
            }
        }
        Ok(())
    }

    /// Failure path: bump the counters, recompute the delay, and replace the
    /// claim with the real block.
    async fn record_failure(
        &self,
        origin: &str,
        account: Option<&Account>,
        block: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let prefix = &self.config.key_prefix;

        // The per-account counter only ever moves for real accounts, so a
        // probe for a nonexistent account leaves no per-account trace.
        let account_count = match account {
            Some(account) => {
                self.bump_counter(&origin_account_key(prefix, origin, account.id))
                    .await?
            }
            None => 0,
        };
        let origin_count = self.bump_counter(&origin_key(prefix, origin)).await?;

        let d = delay(origin_count, account_count);
        if d == MAX_DELAY {
            warn!(
                origin = %origin,
                origin_count = origin_count,
                account_count = account_count,
                "block delay reached its maximum, sustained attack signal"
            );
        }

        let retry_at = now + TimeDelta::seconds(d as i64);
        if let Err(e) = self
            .store
            .set(block, retry_at.timestamp(), Duration::from_secs(d))
            .await
        {
            self.on_store_failure(e)?;
        }

        debug!(
            origin = %origin,
            origin_count = origin_count,
            account_count = account_count,
            delay_secs = d,
            "recorded failed attempt"
        );
        Ok(())
    }

    /// Create-then-increment bump of a failure counter, returning the new
    /// count. Under fail-open a store error counts as zero.
    async fn bump_counter(&self, key: &str) -> Result<i64> {
        let result = match self.store.try_create(key, 1, self.attempt_window()).await {
            Ok(true) => Ok(1),
            Ok(false) => self.store.increment(key).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(count) => Ok(count),
            Err(e) => {
                self.on_store_failure(e)?;
                Ok(0)
            }
        }
    }

    /// Apply the configured store-failure policy: propagate under
    /// fail-closed, log and continue under fail-open.
    fn on_store_failure(&self, error: StoreError) -> Result<()> {
        match self.config.store_failure {
            StoreFailurePolicy::FailClosed => Err(error.into()),
            StoreFailurePolicy::FailOpen => {
                warn!(error = %error, "counter store unavailable, continuing fail-open");
                Ok(())
            }
        }
    }

    fn attempt_window(&self) -> Duration {
        Duration::from_secs(self.config.attempt_window_secs)
    }
}
