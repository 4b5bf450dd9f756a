//! Lock-protected key/value map.
//!
//! Every operation takes the lock once, so `get`, `set`, `delete` and
//! `update` are atomic with respect to each other. Values are cloned out
//! on read; the lock is never held across caller code except inside
//! `update`.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

/// A thread-safe `HashMap` guarded by an `RwLock`.
pub struct ConcurrentMap<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Clone out the value for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let map = self.inner.read().expect("map lock");
        map.get(key).cloned()
    }

    /// Insert or replace the value for `key`.
    pub fn set(&self, key: K, value: V) {
        let mut map = self.inner.write().expect("map lock");
        map.insert(key, value);
    }

    /// Remove `key`. Returns true if it existed.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let mut map = self.inner.write().expect("map lock");
        map.remove(key).is_some()
    }

    /// Read-modify-write under a single write lock.
    ///
    /// `f` receives the current value (if any) and returns the new one.
    pub fn update<F>(&self, key: K, f: F)
    where
        F: FnOnce(Option<V>) -> V,
    {
        let mut map = self.inner.write().expect("map lock");
        let current = map.remove(&key);
        let next = f(current);
        map.insert(key, next);
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let map = self.inner.read().expect("map lock");
        map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        let map = self.inner.read().expect("map lock");
        map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for ConcurrentMap<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_delete() {
        let map: ConcurrentMap<String, u32> = ConcurrentMap::new();
        assert!(map.get("a").is_none());

        map.set("a".to_string(), 1);
        assert_eq!(map.get("a"), Some(1));
        assert!(map.contains("a"));

        map.set("a".to_string(), 2);
        assert_eq!(map.get("a"), Some(2));
        assert_eq!(map.len(), 1);

        assert!(map.delete("a"));
        assert!(!map.delete("a"));
        assert!(map.is_empty());
    }

    #[test]
    fn update_initializes_then_modifies() {
        let map: ConcurrentMap<String, Vec<u32>> = ConcurrentMap::new();

        map.update("k".to_string(), |cur| {
            let mut v = cur.unwrap_or_default();
            v.push(1);
            v
        });
        map.update("k".to_string(), |cur| {
            let mut v = cur.unwrap_or_default();
            v.push(2);
            v
        });

        assert_eq!(map.get("k"), Some(vec![1, 2]));
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        use std::sync::Arc;
        use std::thread;

        let map: Arc<ConcurrentMap<String, u32>> = Arc::new(ConcurrentMap::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let map = map.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    map.update("counter".to_string(), |cur| cur.unwrap_or(0) + 1);
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(map.get("counter"), Some(800));
    }
}
