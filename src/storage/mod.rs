//! Key-value backend abstraction.
//!
//! The real node plugs a persistent database in here; the interop layer only
//! sees the trait. [`MemoryStore`] backs tests and light deployments.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Mutex;

/// Byte-oriented key-value store.
pub trait Store {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn put(&self, key: &[u8], value: &[u8]);

    fn delete(&self, key: &[u8]);

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn seek_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)>;
}

/// In-memory store over a sorted map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &[u8], value: &[u8]) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_vec(), value.to_vec());
    }

    fn delete(&self, key: &[u8]) {
        self.entries.lock().unwrap().remove(key);
    }

    fn seek_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        let entries = self.entries.lock().unwrap();
        entries
            .range::<[u8], _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_delete() {
        let store = MemoryStore::new();
        store.put(b"a", b"1");
        assert_eq!(store.get(b"a"), Some(b"1".to_vec()));
        store.delete(b"a");
        assert_eq!(store.get(b"a"), None);
    }

    #[test]
    fn seek_is_prefix_scoped_and_ordered() {
        let store = MemoryStore::new();
        store.put(b"p\x02", b"b");
        store.put(b"p\x01", b"a");
        store.put(b"q\x01", b"x");
        let found = store.seek_prefix(b"p");
        assert_eq!(
            found,
            vec![
                (b"p\x01".to_vec(), b"a".to_vec()),
                (b"p\x02".to_vec(), b"b".to_vec()),
            ]
        );
    }
}
