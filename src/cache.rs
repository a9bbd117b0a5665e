//! Client-side query cache.
//!
//! Holds the last successful result per [`QueryKey`]. A successful
//! [`QueryCache::mutate`] marks its key stale and publishes the key on a
//! broadcast channel so views can refetch. Reads through [`QueryCache::get`]
//! keep returning stale data until a refetch replaces it.

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::broadcast;

const EVENT_BUFFER: usize = 64;

/// Closed set of cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Emails,
}

impl QueryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Emails => "emails",
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    stale: bool,
    fetched_at: DateTime<Utc>,
}

pub struct QueryCache<V> {
    entries: Mutex<HashMap<QueryKey, Entry<V>>>,
    events: broadcast::Sender<QueryKey>,
}

impl<V: Clone> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            entries: Mutex::new(HashMap::new()),
            events,
        }
    }

    /// Returns the cached value when present and fresh, otherwise awaits
    /// `loader` and stores its result. A failed load leaves the previous
    /// entry untouched.
    pub async fn fetch<F, Fut, E>(&self, key: QueryKey, loader: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(entry) = self.entries.lock().get(&key)
            && !entry.stale
        {
            return Ok(entry.value.clone());
        }

        log::debug!("Loading query '{}'", key.as_str());
        let value = loader().await?;
        self.set(key, value.clone());
        Ok(value)
    }

    /// Last stored value, stale or not.
    pub fn get(&self, key: QueryKey) -> Option<V> {
        self.entries.lock().get(&key).map(|e| e.value.clone())
    }

    pub fn set(&self, key: QueryKey, value: V) {
        self.entries.lock().insert(
            key,
            Entry {
                value,
                stale: false,
                fetched_at: Utc::now(),
            },
        );
    }

    /// Marks `key` stale and notifies subscribers. Repeated calls are harmless.
    pub fn invalidate(&self, key: QueryKey) {
        if let Some(entry) = self.entries.lock().get_mut(&key) {
            entry.stale = true;
        }

        log::debug!("Invalidated query '{}'", key.as_str());
        // No subscribers is fine: the next fetch sees the stale flag anyway.
        let _ = self.events.send(key);
    }

    /// Awaits `action`; on success invalidates `key`. Failures propagate and
    /// leave the cache as it was.
    pub async fn mutate<Fut, T, E>(&self, key: QueryKey, action: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        let output = action.await?;
        self.invalidate(key);
        Ok(output)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueryKey> {
        self.events.subscribe()
    }

    /// `true` for missing entries as well.
    pub fn is_stale(&self, key: QueryKey) -> bool {
        self.entries.lock().get(&key).is_none_or(|e| e.stale)
    }

    pub fn fetched_at(&self, key: QueryKey) -> Option<DateTime<Utc>> {
        self.entries.lock().get(&key).map(|e| e.fetched_at)
    }
}
