//! Read-through query cache with TTL and tag invalidation.
//!
//! Keyed by query identity. Each entry carries tags so a write can drop every
//! cached query it affects (`invalidate_tag("site:<id>")`) without knowing
//! the exact keys.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    tags: Vec<String>,
}

struct CacheState<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    /// Bumped by every invalidation. A load that started under an older
    /// generation may have read data the invalidation superseded.
    generation: u64,
}

pub struct QueryCache<K, V> {
    state: Mutex<CacheState<K, V>>,
    ttl: Duration,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                generation: 0,
            }),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`, evicting it if expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock().ok()?;
        let fresh = state.entries.get(key).map(|e| e.inserted_at.elapsed() < self.ttl)?;
        if fresh {
            state.entries.get(key).map(|e| e.value.clone())
        } else {
            state.entries.remove(key);
            None
        }
    }

    /// Store a value. Expired entries are swept first so keys that are never
    /// read again do not accumulate.
    pub fn insert(&self, key: K, value: V, tags: &[&str]) {
        if let Ok(mut state) = self.state.lock() {
            self.store(&mut state, key, value, tags);
        }
    }

    fn store(&self, state: &mut CacheState<K, V>, key: K, value: V, tags: &[&str]) {
        let ttl = self.ttl;
        state.entries.retain(|_, e| e.inserted_at.elapsed() < ttl);
        state.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            },
        );
    }

    /// Cached value, or run `loader` and cache its `Ok` result.
    ///
    /// The lock is not held while loading. If any invalidation happens while
    /// the loader runs, its result is returned to this caller but not cached,
    /// so a write that lands mid-load is never hidden behind stale data.
    pub fn get_or_try_load<E, F>(&self, key: K, tags: &[&str], loader: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let started_at = self.generation();
        let value = loader()?;
        if let Ok(mut state) = self.state.lock() {
            if state.generation == started_at {
                self.store(&mut state, key, value.clone(), tags);
            } else {
                tracing::debug!("Invalidated during load, result not cached");
            }
        }
        Ok(value)
    }

    fn generation(&self) -> u64 {
        self.state.lock().map(|s| s.generation).unwrap_or(u64::MAX)
    }

    pub fn invalidate(&self, key: &K) {
        if let Ok(mut state) = self.state.lock() {
            state.generation = state.generation.wrapping_add(1);
            state.entries.remove(key);
        }
    }

    /// Drop every entry carrying `tag`. Returns how many were removed.
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        let Ok(mut state) = self.state.lock() else {
            return 0;
        };
        state.generation = state.generation.wrapping_add(1);
        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.tags.iter().any(|t| t == tag));
        before - state.entries.len()
    }

    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.generation = state.generation.wrapping_add(1);
            state.entries.clear();
        }
    }

    /// Number of stored entries, expired ones included until touched.
    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::Barrier;

    fn long_lived() -> QueryCache<String, u32> {
        QueryCache::new(Duration::from_secs(3600))
    }

    #[test]
    fn new_cache_is_empty() {
        let cache = long_lived();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a".to_string()), None);
    }

    #[test]
    fn insert_then_get() {
        let cache = long_lived();
        cache.insert("a".into(), 1, &[]);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn zero_ttl_always_misses_and_evicts() {
        let cache: QueryCache<String, u32> = QueryCache::new(Duration::ZERO);
        cache.insert("a".into(), 1, &[]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"a".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn loader_runs_once_while_fresh() {
        let cache = long_lived();
        let calls = Cell::new(0);
        let load = || -> Result<u32, String> {
            calls.set(calls.get() + 1);
            Ok(42)
        };
        assert_eq!(cache.get_or_try_load("q".into(), &[], load), Ok(42));
        assert_eq!(cache.get_or_try_load("q".into(), &[], load), Ok(42));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn loader_error_is_not_cached() {
        let cache = long_lived();
        let result: Result<u32, String> =
            cache.get_or_try_load("q".into(), &[], || Err("store down".into()));
        assert_eq!(result, Err("store down".to_string()));
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_tag_drops_only_tagged_entries() {
        let cache = long_lived();
        cache.insert("site-1".into(), 1, &["site:1"]);
        cache.insert("site-1-week".into(), 2, &["site:1", "weeks"]);
        cache.insert("site-2".into(), 3, &["site:2"]);

        assert_eq!(cache.invalidate_tag("site:1"), 2);
        assert_eq!(cache.get(&"site-1".to_string()), None);
        assert_eq!(cache.get(&"site-2".to_string()), Some(3));
        assert_eq!(cache.invalidate_tag("site:1"), 0);
    }

    #[test]
    fn insert_sweeps_expired_entries() {
        let cache: QueryCache<String, u32> = QueryCache::new(Duration::ZERO);
        cache.insert("a".into(), 1, &[]);
        cache.insert("b".into(), 2, &[]);
        cache.insert("c".into(), 3, &[]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn insert_keeps_fresh_entries() {
        let cache: QueryCache<String, u32> = QueryCache::new(Duration::from_millis(50));
        cache.insert("old".into(), 1, &[]);
        std::thread::sleep(Duration::from_millis(80));
        cache.insert("new".into(), 2, &[]);
        cache.insert("newer".into(), 3, &[]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"new".to_string()), Some(2));
    }

    #[test]
    fn load_racing_an_invalidation_is_not_cached() {
        let cache = long_lived();
        let gate = Barrier::new(2);

        std::thread::scope(|scope| {
            let loading = scope.spawn(|| {
                cache.get_or_try_load("site".into(), &["site:1"], || -> Result<u32, String> {
                    // value read before the write below
                    let stale = 1;
                    gate.wait();
                    gate.wait();
                    Ok(stale)
                })
            });

            gate.wait();
            cache.invalidate_tag("site:1");
            gate.wait();

            assert_eq!(loading.join().unwrap(), Ok(1));
        });

        assert_eq!(cache.get(&"site".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn load_after_invalidation_is_cached() {
        let cache = long_lived();
        cache.invalidate_tag("site:1");
        cache.clear();
        let loaded: Result<u32, String> = cache.get_or_try_load("site".into(), &["site:1"], || Ok(7));
        assert_eq!(loaded, Ok(7));
        assert_eq!(cache.get(&"site".to_string()), Some(7));
    }

    #[test]
    fn invalidate_and_clear() {
        let cache = long_lived();
        cache.insert("a".into(), 1, &[]);
        cache.insert("b".into(), 2, &[]);
        cache.invalidate(&"a".to_string());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
