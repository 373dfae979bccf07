//! Request-scoped response cache with in-flight de-duplication.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::data_source::{FetchFailure, FetchKey};

type Outcome<V> = Result<Arc<V>, FetchFailure>;
type Slot<V> = Arc<OnceCell<Outcome<V>>>;

/// Per-key memo of fetch outcomes.
///
/// The first caller for a key runs the fetch; concurrent callers for the same
/// key await that same operation, and later callers get the stored outcome.
/// Failures are stored too, so a key is fetched upstream at most once for the
/// lifetime of the cache. There is no eviction: the cache lives as long as the
/// view that owns it.
pub struct RequestCache<V> {
    slots: Arc<Mutex<HashMap<FetchKey, Slot<V>>>>,
}

impl<V> RequestCache<V>
where
    V: Send + Sync,
{
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Return the outcome for `key`, running `fetch` only if no caller has
    /// started it yet.
    pub async fn get_or_fetch<F, Fut>(&self, key: FetchKey, fetch: F) -> Outcome<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, FetchFailure>>,
    {
        let slot = {
            let mut slots = self.slots.lock().await;
            slots
                .entry(key)
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        slot.get_or_init(|| async move { fetch().await.map(Arc::new) })
            .await
            .clone()
    }

    /// Resolved outcome for `key`, or `None` when it was never requested or
    /// is still in flight.
    pub async fn peek(&self, key: &FetchKey) -> Option<Outcome<V>> {
        let slots = self.slots.lock().await;
        slots.get(key).and_then(|slot| slot.get().cloned())
    }

    /// Number of keys that have been requested, resolved or not.
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.lock().await.is_empty()
    }
}

impl<V> Clone for RequestCache<V> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<V> Default for RequestCache<V>
where
    V: Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for RequestCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCache").finish_non_exhaustive()
    }
}
