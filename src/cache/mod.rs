//! Bounded User-Agent result cache
//!
//! Classification results are memoized per User-Agent string so repeat
//! visitors skip the matcher entirely. The cache is a fixed-capacity FIFO:
//! a ring of slots plus a cursor, where inserting into an occupied slot
//! evicts the key that has been resident longest. Negative results (the
//! empty string) are cached exactly like positive ones; the contract is
//! "this User-Agent has already been classified", not "this User-Agent is
//! a bot".

use std::collections::HashMap;
use std::sync::RwLock;

/// Fixed-capacity FIFO cache from User-Agent string to matched bot name
///
/// Thread-safe for concurrent readers and writers. The whole cache is
/// replaced (never drained) when the bot index refreshes, so entries can
/// never outlive the index they were computed against.
#[derive(Debug)]
pub struct UaCache {
    inner: RwLock<UaCacheInner>,
}

#[derive(Debug)]
struct UaCacheInner {
    cursor: usize,
    data: HashMap<String, String>,
    slots: Vec<Option<String>>,
    limit: usize,
}

impl UaCache {
    /// Creates an empty cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(UaCacheInner {
                cursor: 0,
                data: HashMap::with_capacity(capacity),
                slots: vec![None; capacity],
                limit: capacity,
            }),
        }
    }

    /// Looks up a previously classified User-Agent
    ///
    /// # Returns
    ///
    /// * `Some(name)` - The cached result; an empty string means the
    ///   User-Agent was classified as not a bot
    /// * `None` - The User-Agent has not been classified yet
    pub fn get(&self, user_agent: &str) -> Option<String> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.data.get(user_agent).cloned()
    }

    /// Stores a classification result, evicting the oldest entry when full
    pub fn set(&self, user_agent: &str, bot_name: &str) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if inner.limit == 0 {
            return;
        }

        // rollover
        if inner.cursor >= inner.limit {
            inner.cursor = 0;
        }

        // free up the slot if it is occupied
        let cursor = inner.cursor;
        if let Some(old) = inner.slots[cursor].take() {
            inner.data.remove(&old);
        }

        inner.data.insert(user_agent.to_string(), bot_name.to_string());
        inner.slots[cursor] = Some(user_agent.to_string());
        inner.cursor += 1;
    }

    /// Returns the number of cached entries
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.data.len()
    }

    /// Returns true when the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured capacity
    pub fn capacity(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_get_miss() {
        let cache = UaCache::new(4);
        assert_eq!(cache.get("Mozilla/5.0"), None);
    }

    #[test]
    fn test_set_then_get() {
        let cache = UaCache::new(4);
        cache.set("GPTBot/1.0", "GPTBot");
        assert_eq!(cache.get("GPTBot/1.0"), Some("GPTBot".to_string()));
    }

    #[test]
    fn test_negative_result_cached() {
        let cache = UaCache::new(4);
        cache.set("Mozilla/5.0", "");
        assert_eq!(cache.get("Mozilla/5.0"), Some(String::new()));
    }

    #[test]
    fn test_rollover_evicts_oldest() {
        let cache = UaCache::new(1);
        cache.set("A", "");
        cache.set("B", "");
        assert_eq!(cache.get("A"), None);
        assert_eq!(cache.get("B"), Some(String::new()));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.capacity(), 1);
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let cache = UaCache::new(3);
        for i in 0..10 {
            cache.set(&format!("agent-{}", i), "bot");
            assert!(cache.len() <= 3);
        }
        // the three youngest survive
        assert!(cache.get("agent-9").is_some());
        assert!(cache.get("agent-8").is_some());
        assert!(cache.get("agent-7").is_some());
        assert!(cache.get("agent-6").is_none());
    }

    #[test]
    fn test_zero_capacity_is_noop() {
        let cache = UaCache::new(0);
        cache.set("A", "bot");
        assert_eq!(cache.get("A"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(UaCache::new(8));
        let mut handles = Vec::new();
        for t in 0..4 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for i in 0..100 {
                    let key = format!("agent-{}-{}", t, i);
                    cache.set(&key, "bot");
                    let _ = cache.get(&key);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 8);
    }
}
