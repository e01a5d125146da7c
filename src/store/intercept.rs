//! Store call interception.
//!
//! [`InterceptedStore`] wraps any [`CounterStore`] and invokes an interceptor
//! before and after each operation. Tests use it to pause a caller between
//! two store calls (deterministic race reproduction) or to record exactly
//! which operations a code path performed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CounterStore, StoreResult};

/// A named store operation, as seen by an interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    TryCreate,
    Increment,
    Get,
    Set,
    Delete,
}

/// Hooks invoked around each store operation.
///
/// The default implementations do nothing, so an interceptor only overrides
/// the extension points it cares about.
#[async_trait]
pub trait StoreInterceptor: Send + Sync {
    /// Called before the operation reaches the inner store.
    async fn before(&self, _op: StoreOp, _key: &str) {}

    /// Called after the inner store returned.
    async fn after(&self, _op: StoreOp, _key: &str) {}
}

/// A store decorator that routes every call through a [`StoreInterceptor`].
pub struct InterceptedStore {
    inner: Arc<dyn CounterStore>,
    interceptor: Arc<dyn StoreInterceptor>,
}

impl InterceptedStore {
    /// Wrap `inner` with `interceptor`.
    pub fn new(inner: Arc<dyn CounterStore>, interceptor: Arc<dyn StoreInterceptor>) -> Self {
        Self { inner, interceptor }
    }
}

#[async_trait]
impl CounterStore for InterceptedStore {
    async fn try_create(&self, key: &str, value: i64, ttl: Duration) -> StoreResult<bool> {
        self.interceptor.before(StoreOp::TryCreate, key).await;
        let result = self.inner.try_create(key, value, ttl).await;
        self.interceptor.after(StoreOp::TryCreate, key).await;
        result
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        self.interceptor.before(StoreOp::Increment, key).await;
        let result = self.inner.increment(key).await;
        self.interceptor.after(StoreOp::Increment, key).await;
        result
    }

    async fn get(&self, key: &str) -> StoreResult<Option<i64>> {
        self.interceptor.before(StoreOp::Get, key).await;
        let result = self.inner.get(key).await;
        self.interceptor.after(StoreOp::Get, key).await;
        result
    }

    async fn set(&self, key: &str, value: i64, ttl: Duration) -> StoreResult<()> {
        self.interceptor.before(StoreOp::Set, key).await;
        let result = self.inner.set(key, value, ttl).await;
        self.interceptor.after(StoreOp::Set, key).await;
        result
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.interceptor.before(StoreOp::Delete, key).await;
        let result = self.inner.delete(key).await;
        self.interceptor.after(StoreOp::Delete, key).await;
        result
    }
}

/// Interceptor that records every `(op, key)` pair it sees.
///
/// Serves as a store spy: wrap a store with it and assert on
/// [`RecordingInterceptor::calls`] afterwards.
#[derive(Default)]
pub struct RecordingInterceptor {
    calls: Mutex<Vec<(StoreOp, String)>>,
}

impl RecordingInterceptor {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<(StoreOp, String)> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl StoreInterceptor for RecordingInterceptor {
    async fn before(&self, op: StoreOp, key: &str) {
        self.calls.lock().push((op, key.to_string()));
    }
}
