//! Bounded, time-expiring key/value store.
//!
//! Capacity is enforced by least-recently-used eviction on insert, expiry is lazy
//! (an expired entry is dropped the next time it is read) with an optional
//! maintenance pass via [`CacheStore::purge_expired`].

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use parking_lot::Mutex;
use tokio::time::Instant;

use super::CacheError;

/// A cached value with its insertion time and time-to-live.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            ttl,
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn inserted_at(&self) -> Instant {
        self.inserted_at
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// An entry is stale once its age reaches the TTL, so a zero TTL is always stale.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= self.ttl
    }
}

pub struct CacheStore<K: Hash + Eq, V> {
    entries: Mutex<LruCache<K, CacheEntry<V>>>,
    capacity: NonZeroUsize,
    ttl: Duration,
}

impl<K: Hash + Eq, V: Clone> CacheStore<K, V> {
    /// Create a store holding at most `capacity` entries, each living for `ttl`.
    ///
    /// # Errors
    /// Returns [`CacheError::ZeroCapacity`] when `capacity` is 0.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self, CacheError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(CacheError::ZeroCapacity)?;
        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity,
            ttl,
        })
    }

    /// Return the value for `key` if present and fresh, marking it most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let expired = entries.peek(key)?.is_expired(now);
        if expired {
            entries.pop(key);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or overwrite `key`, resetting its age.
    ///
    /// When the store is full and `key` is new, the least-recently-used entry is
    /// evicted under the same lock, so capacity is never observably exceeded.
    pub fn set(&self, key: K, value: V) {
        let entry = CacheEntry::new(value, self.ttl);
        self.entries.lock().push(key, entry);
    }

    /// Presence check equivalent to a successful [`get`](Self::get), without
    /// touching recency.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        self.entries
            .lock()
            .peek(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.lock().pop(key).map(|entry| entry.value)
    }

    /// Drop every expired entry and return how many were removed.
    pub fn purge_expired(&self) -> usize
    where
        K: Clone,
    {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let expired: Vec<K> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        expired.len()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<K: Hash + Eq, V> std::fmt::Debug for CacheStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("len", &self.entries.lock().len())
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish()
    }
}
