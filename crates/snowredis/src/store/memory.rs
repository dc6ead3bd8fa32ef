use crate::{CoordinationStore, StoreError};
use core::{cmp::Reverse, time::Duration};
use parking_lot::{Mutex, MutexGuard};
use std::{
    collections::{BinaryHeap, HashMap},
    time::Instant,
};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, Entry>,
    /// Min-heap of pending expiries. May hold stale items for keys that were
    /// deleted or overwritten since; those are skipped when popped.
    expiries: BinaryHeap<Reverse<(Instant, String)>>,
}

impl State {
    /// Drops every entry whose TTL has elapsed.
    fn purge_expired(&mut self, now: Instant) {
        while let Some(Reverse((at, _))) = self.expiries.peek() {
            if *at > now {
                break;
            }
            let Some(Reverse((at, key))) = self.expiries.pop() else {
                break;
            };
            if self
                .entries
                .get(&key)
                .is_some_and(|entry| entry.expires_at == Some(at))
            {
                self.entries.remove(&key);
            }
        }
    }

    fn insert(&mut self, key: &str, value: String, expires_at: Option<Instant>) {
        if let Some(at) = expires_at {
            self.expiries.push(Reverse((at, key.to_owned())));
        }
        self.entries
            .insert(key.to_owned(), Entry { value, expires_at });
    }
}

/// An in-process [`CoordinationStore`].
///
/// Provides the same atomicity as the Redis store, but only among generators
/// of a single process. Useful for tests and for single-process deployments
/// that still want strict mode. Expired keys are purged on every write, so
/// one-shot claim keys do not accumulate.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock()
    }

    /// Returns `true` if `key` exists and has not expired.
    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        self.lock()
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_live(now))
    }

    /// Returns the value stored at `key`, if live.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        self.lock()
            .entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }
}

impl CoordinationStore for MemoryStore {
    fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut state = self.lock();
        state.purge_expired(now);
        if state.entries.contains_key(key) {
            return Ok(false);
        }
        state.insert(key, value.to_owned(), now.checked_add(ttl));
        Ok(true)
    }

    fn increment(&self, key: &str) -> Result<i64, StoreError> {
        let now = Instant::now();
        let mut state = self.lock();
        state.purge_expired(now);
        let current = match state.entries.get(key) {
            Some(entry) => entry.value.parse::<i64>().map_err(|_| {
                StoreError::Protocol(format!("value at `{key}` is not an integer"))
            })?,
            None => 0,
        };
        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::Protocol(format!("increment of `{key}` overflowed")))?;
        // Counters never expire, matching INCR on a fresh key.
        state.insert(key, next.to_string(), None);
        Ok(next)
    }

    fn delete(&self, keys: &[&str]) -> Result<u64, StoreError> {
        let now = Instant::now();
        let mut state = self.lock();
        state.purge_expired(now);
        let removed = keys
            .iter()
            .filter(|key| state.entries.remove(**key).is_some())
            .count();
        Ok(removed as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn set_if_absent_claims_once() {
        let store = MemoryStore::new();
        assert!(store.set_if_absent("k", "1", HOUR).unwrap());
        assert!(!store.set_if_absent("k", "2", HOUR).unwrap());
        assert_eq!(store.get("k").as_deref(), Some("1"));
    }

    #[test]
    fn expired_claims_can_be_retaken() {
        let store = MemoryStore::new();
        assert!(store.set_if_absent("k", "1", Duration::from_millis(1)).unwrap());
        std::thread::sleep(Duration::from_millis(5));
        assert!(!store.contains("k"));
        assert!(store.set_if_absent("k", "2", HOUR).unwrap());
    }

    #[test]
    fn increment_starts_at_one() {
        let store = MemoryStore::new();
        assert_eq!(store.increment("c").unwrap(), 1);
        assert_eq!(store.increment("c").unwrap(), 2);
        assert_eq!(store.increment("other").unwrap(), 1);
    }

    #[test]
    fn increment_rejects_non_integers() {
        let store = MemoryStore::new();
        store.set_if_absent("c", "abc", HOUR).unwrap();
        assert!(matches!(
            store.increment("c"),
            Err(StoreError::Protocol(_))
        ));
    }

    #[test]
    fn delete_counts_existing_keys() {
        let store = MemoryStore::new();
        store.set_if_absent("a", "1", HOUR).unwrap();
        store.set_if_absent("b", "1", HOUR).unwrap();
        assert_eq!(store.delete(&["a", "b", "missing"]).unwrap(), 2);
        assert!(!store.contains("a"));
    }

    #[test]
    fn expired_claims_are_purged_on_write() {
        let store = MemoryStore::new();
        for i in 0..1_000 {
            let key = format!("snowflake:id:{i}");
            assert!(store.set_if_absent(&key, "1", Duration::from_millis(1)).unwrap());
        }
        std::thread::sleep(Duration::from_millis(10));
        for i in 1_000..1_010 {
            let key = format!("snowflake:id:{i}");
            assert!(store.set_if_absent(&key, "1", HOUR).unwrap());
        }

        let state = store.lock();
        assert_eq!(state.entries.len(), 10);
        assert_eq!(state.expiries.len(), 10);
    }

    #[test]
    fn overwritten_key_keeps_its_new_expiry() {
        let store = MemoryStore::new();
        store.set_if_absent("k", "1", Duration::from_millis(1)).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        // The stale expiry of the first claim must not evict the second.
        assert!(store.set_if_absent("k", "2", HOUR).unwrap());
        assert_eq!(store.increment("counter").unwrap(), 1);
        assert_eq!(store.get("k").as_deref(), Some("2"));
        assert_eq!(store.get("counter").as_deref(), Some("1"));
    }
}
