//! In-memory counter store.
//!
//! Reference implementation of [`CounterStore`] for single-process
//! deployments and tests. Atomicity comes from the dashmap entry API, which
//! holds the shard lock across each read-modify-write; expiry is lazy, so an
//! expired entry behaves exactly like an absent one.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::trace;

use super::{CounterStore, StoreResult};

/// A stored value with its expiry deadline.
#[derive(Debug, Clone, Copy)]
struct Slot {
    value: i64,
    /// `None` means the entry never expires (only reachable through
    /// `increment` on a missing key).
    expires_at: Option<Instant>,
}

impl Slot {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if deadline <= now)
    }
}

/// An in-memory, TTL-aware counter store.
///
/// Thread-safe and cheap to share behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: DashMap<String, Slot>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) keys. Primarily useful for tests.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.slots.iter().filter(|s| !s.is_expired(now)).count()
    }

    /// Whether the store holds no live keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn try_create(&self, key: &str, value: i64, ttl: Duration) -> StoreResult<bool> {
        let now = Instant::now();
        let slot = Slot {
            value,
            expires_at: Some(now + ttl),
        };

        let created = match self.slots.entry(key.to_string()) {
            Entry::Occupied(mut occupied) if occupied.get().is_expired(now) => {
                occupied.insert(slot);
                true
            }
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(slot);
                true
            }
        };

        trace!(key = %key, created = created, "try_create");
        Ok(created)
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        let now = Instant::now();

        let new_value = match self.slots.entry(key.to_string()) {
            Entry::Occupied(mut occupied) if !occupied.get().is_expired(now) => {
                let slot = occupied.get_mut();
                slot.value += 1;
                slot.value
            }
            // Missing or expired: recreate at 1, like a cache-server INCR.
            Entry::Occupied(mut occupied) => {
                occupied.insert(Slot {
                    value: 1,
                    expires_at: None,
                });
                1
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Slot {
                    value: 1,
                    expires_at: None,
                });
                1
            }
        };

        trace!(key = %key, value = new_value, "increment");
        Ok(new_value)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<i64>> {
        let now = Instant::now();
        Ok(self
            .slots
            .get(key)
            .filter(|slot| !slot.is_expired(now))
            .map(|slot| slot.value))
    }

    async fn set(&self, key: &str, value: i64, ttl: Duration) -> StoreResult<()> {
        self.slots.insert(
            key.to_string(),
            Slot {
                value,
                expires_at: Some(Instant::now() + ttl),
            },
        );
        trace!(key = %key, value = value, "set");
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.slots.remove(key);
        trace!(key = %key, "delete");
        Ok(())
    }
}
