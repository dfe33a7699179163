//! LRU cache of computed user statistics.
//!
//! Entries are invalidated explicitly when a meeting or feedback record that
//! affects an identity is inserted. A generation counter guards against a
//! computation that started before an invalidation writing a stale entry
//! back afterwards.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::Mutex;
use tracing::debug;

use meetpulse_core::UserStats;

/// Stats cache keyed by identity. Cloning shares the underlying cache.
#[derive(Clone)]
pub struct StatsCache {
    inner: Option<Arc<Mutex<CacheState>>>,
}

struct CacheState {
    entries: LruCache<String, UserStats>,
    generation: u64,
}

/// Cache generation captured before computing a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

impl StatsCache {
    /// Create a cache holding up to `capacity` identities; `0` disables it.
    pub fn new(capacity: usize) -> Self {
        match NonZeroUsize::new(capacity) {
            Some(cap) => Self {
                inner: Some(Arc::new(Mutex::new(CacheState {
                    entries: LruCache::new(cap),
                    generation: 0,
                }))),
            },
            None => Self::disabled(),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Look up cached stats for `identity`.
    pub async fn get(&self, identity: &str) -> Option<UserStats> {
        let inner = self.inner.as_ref()?;
        let mut state = inner.lock().await;
        state.entries.get(identity).copied()
    }

    /// Current generation; pass it back to [`StatsCache::put`].
    pub async fn generation(&self) -> Generation {
        match &self.inner {
            Some(inner) => Generation(inner.lock().await.generation),
            None => Generation(0),
        }
    }

    /// Store `stats` unless an invalidation happened since `observed`.
    pub async fn put(&self, identity: &str, stats: UserStats, observed: Generation) -> bool {
        let Some(inner) = &self.inner else {
            return false;
        };
        let mut state = inner.lock().await;
        if state.generation != observed.0 {
            debug!(
                subsystem = "api",
                component = "stats_cache",
                identity = %identity,
                "Discarding stats computed before an invalidation"
            );
            return false;
        }
        state.entries.put(identity.to_string(), stats);
        true
    }

    /// Drop the entry for `identity`.
    pub async fn invalidate(&self, identity: &str) {
        if let Some(inner) = &self.inner {
            let mut state = inner.lock().await;
            state.generation += 1;
            state.entries.pop(identity);
            debug!(
                subsystem = "api",
                component = "stats_cache",
                op = "invalidate",
                identity = %identity,
                "Invalidated cached stats"
            );
        }
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        if let Some(inner) = &self.inner {
            let mut state = inner.lock().await;
            state.generation += 1;
            state.entries.clear();
        }
    }

    /// Number of cached identities.
    pub async fn len(&self) -> usize {
        match &self.inner {
            Some(inner) => inner.lock().await.entries.len(),
            None => 0,
        }
    }
}
