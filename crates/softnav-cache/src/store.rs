//! Cache storage
//!
//! Keys are URLs with the fragment removed, so `/page` and `/page#top`
//! share one entry. Clones share the underlying map.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::RwLock;
use url::{Position, Url};

struct Store {
    entries: HashMap<String, String>,
    /// Insertion order, oldest first. Tracked only when bounded.
    order: VecDeque<String>,
}

pub struct ContentCache {
    store: Arc<RwLock<Store>>,
    capacity: Option<usize>,
}

impl ContentCache {
    /// Unbounded cache; entries live until `clear`.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store {
                entries: HashMap::new(),
                order: VecDeque::new(),
            })),
            capacity: None,
        }
    }

    /// Cache holding at most `capacity` entries; inserting beyond the
    /// bound evicts the oldest-inserted entry.
    pub fn bounded(capacity: usize) -> Self {
        let mut cache = Self::new();
        cache.capacity = Some(capacity.max(1));
        cache
    }

    /// Cache key for a URL: everything up to the fragment.
    pub fn key(url: &Url) -> String {
        url[..Position::AfterQuery].to_string()
    }

    pub fn get(&self, url: &Url) -> Option<String> {
        let key = Self::key(url);
        let hit = self.store.read().entries.get(&key).cloned();
        tracing::debug!(key = %key, hit = hit.is_some(), "cache lookup");
        hit
    }

    pub fn insert(&self, url: &Url, html: String) {
        let key = Self::key(url);
        let mut store = self.store.write();
        if store.entries.insert(key.clone(), html).is_some() {
            // Refreshing an entry keeps its original slot in the order.
            tracing::debug!(key = %key, "cache entry refreshed");
            return;
        }
        tracing::debug!(key = %key, "cache entry stored");
        if let Some(capacity) = self.capacity {
            store.order.push_back(key);
            while store.entries.len() > capacity {
                if let Some(oldest) = store.order.pop_front() {
                    store.entries.remove(&oldest);
                    tracing::debug!(key = %oldest, "cache entry evicted");
                } else {
                    break;
                }
            }
        }
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.store.read().entries.contains_key(&Self::key(url))
    }

    pub fn len(&self) -> usize {
        self.store.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().entries.is_empty()
    }

    pub fn clear(&self) {
        let mut store = self.store.write();
        store.entries.clear();
        store.order.clear();
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ContentCache {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            capacity: self.capacity,
        }
    }
}
