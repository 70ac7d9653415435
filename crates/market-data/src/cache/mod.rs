//! Short-lived raw-page cache for the scraper source.
//!
//! Keyed by full URL. Entries are immutable once written; a benign race
//! (two concurrent scrapes of the same uncached URL) only wastes one
//! network call. The cache is injected as `Arc<dyn PageCache>` so tests
//! run against their own instance.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::debug;

/// Read/write interface the scraper depends on.
pub trait PageCache: Send + Sync {
    /// Fresh payload for `key`, if present and within TTL.
    fn get(&self, key: &str) -> Option<String>;
    /// Store `payload` under `key`, evicting the oldest-inserted entry
    /// when at capacity.
    fn insert(&self, key: &str, payload: String);
}

struct Entry {
    payload: String,
    inserted_at: Instant,
}

struct Inner {
    entries: HashMap<String, Entry>,
    /// Insertion order, oldest first. Eviction is FIFO, not LRU.
    order: VecDeque<String>,
}

/// TTL- and capacity-bounded in-memory page cache.
pub struct TtlPageCache {
    ttl: Duration,
    capacity: usize,
    inner: Mutex<Inner>,
}

impl TtlPageCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60);
    pub const DEFAULT_CAPACITY: usize = 500;

    pub fn new() -> Self {
        Self::with_config(Self::DEFAULT_TTL, Self::DEFAULT_CAPACITY)
    }

    pub fn with_config(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }
}

impl Default for TtlPageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCache for TtlPageCache {
    fn get(&self, key: &str) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        let entry = inner.entries.get(key)?;
        if entry.inserted_at.elapsed() > self.ttl {
            return None;
        }
        debug!("page cache hit: {}", key);
        Some(entry.payload.clone())
    }

    fn insert(&self, key: &str, payload: String) {
        let mut inner = self.inner.lock().unwrap();
        if !inner.entries.contains_key(key) {
            while inner.entries.len() >= self.capacity {
                match inner.order.pop_front() {
                    Some(oldest) => {
                        inner.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
            inner.order.push_back(key.to_string());
        }
        inner.entries.insert(
            key.to_string(),
            Entry {
                payload,
                inserted_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl() {
        let cache = TtlPageCache::new();
        cache.insert("https://a/", "body".to_string());
        assert_eq!(cache.get("https://a/"), Some("body".to_string()));
    }

    #[test]
    fn miss_for_unknown_key() {
        let cache = TtlPageCache::new();
        assert_eq!(cache.get("https://a/"), None);
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let cache = TtlPageCache::with_config(Duration::from_millis(20), 10);
        cache.insert("https://a/", "body".to_string());
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get("https://a/"), None);
    }

    #[test]
    fn evicts_oldest_inserted_first() {
        let cache = TtlPageCache::with_config(Duration::from_secs(60), 2);
        cache.insert("https://a/", "1".to_string());
        cache.insert("https://b/", "2".to_string());
        cache.insert("https://c/", "3".to_string());
        assert_eq!(cache.get("https://a/"), None);
        assert_eq!(cache.get("https://b/"), Some("2".to_string()));
        assert_eq!(cache.get("https://c/"), Some("3".to_string()));
    }

    #[test]
    fn reinsert_overwrites_payload() {
        let cache = TtlPageCache::new();
        cache.insert("https://a/", "old".to_string());
        cache.insert("https://a/", "new".to_string());
        assert_eq!(cache.get("https://a/"), Some("new".to_string()));
    }
}
