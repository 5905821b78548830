// Bounded memoization of whole crawl results

use follownet_scanner::{CrawlResult, UserId};
use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Everything that can change the outcome of a crawl
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CrawlKey {
    pub root: UserId,
    pub depth: usize,
    pub token: String,
    pub max_followers: usize,
}

impl fmt::Debug for CrawlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrawlKey")
            .field("root", &self.root)
            .field("depth", &self.depth)
            .field("token", &"<redacted>")
            .field("max_followers", &self.max_followers)
            .finish()
    }
}

/// Least-recently-used cache of finished crawls. Only complete results are
/// stored; nothing about an in-progress traversal is shared.
pub struct CrawlCache {
    entries: Mutex<LruCache<CrawlKey, CrawlResult>>,
    capacity: usize,
}

impl CrawlCache {
    /// A capacity of 0 falls back to the default
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or(NonZeroUsize::MIN.saturating_add(DEFAULT_CACHE_CAPACITY - 1));
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity: capacity.get(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, key: &CrawlKey) -> Option<CrawlResult> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let hit = entries.get(key).cloned();
        debug!("Cache {} for {:?}", if hit.is_some() { "hit" } else { "miss" }, key);
        hit
    }

    /// Cancelled crawls are partial and are not stored
    pub fn insert(&self, key: CrawlKey, result: CrawlResult) -> bool {
        if result.cancelled {
            return false;
        }
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((evicted, _)) = entries.push(key.clone(), result)
            && evicted != key
        {
            debug!("Evicted {:?}", evicted);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for CrawlCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
