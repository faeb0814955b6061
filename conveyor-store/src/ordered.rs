//! The `OrderedStore` implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

/// A live entry. The `seq` records when the entry last took its place in the
/// ordering index and breaks timestamp ties.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    timestamp: i64,
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    /// Key → entry. Invariant: a key is present here iff `order` holds
    /// exactly one slot pointing back at it.
    entries: HashMap<String, Entry>,
    /// `(timestamp, seq)` → key. Traversal order is the read order.
    order: BTreeMap<(i64, u64), String>,
    /// Monotonic insertion sequence; never reused.
    next_seq: u64,
}

/// Concurrent key/value store with timestamp-ordered traversal.
///
/// All operations are total: absence of a key is `None` on reads and a no-op
/// on deletes, never an error. Reads take a shared lock and may run
/// concurrently; `set`/`delete` take the exclusive lock.
///
/// Concurrent `set`/`delete` on the same key resolve by lock-acquisition
/// order, not by comparing timestamps — callers that need last-writer-by-
/// timestamp semantics must serialize upstream.
#[derive(Debug, Default)]
pub struct OrderedStore {
    inner: RwLock<Inner>,
}

impl OrderedStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `key`.
    ///
    /// A replace updates both value and timestamp and repositions the entry
    /// in the ordering index. Repositioning (rather than retaining the
    /// original slot) is a deliberate choice: traversal reflects the latest
    /// write's timestamp.
    pub fn set(&self, key: &str, value: &str, timestamp: i64) {
        let mut inner = self.inner.write().expect("store lock poisoned");

        let seq = inner.next_seq;
        inner.next_seq += 1;

        if let Some(old) = inner.entries.remove(key) {
            inner.order.remove(&(old.timestamp, old.seq));
        }
        inner.order.insert((timestamp, seq), key.to_string());
        inner.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                timestamp,
                seq,
            },
        );
    }

    /// Looks up the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Removes `key` if present. Deleting an absent key is a no-op.
    pub fn delete(&self, key: &str) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if let Some(entry) = inner.entries.remove(key) {
            inner.order.remove(&(entry.timestamp, entry.seq));
        }
    }

    /// Snapshot of every live `(key, value)` pair in non-decreasing
    /// timestamp order, ties in insertion order. O(n).
    #[must_use]
    pub fn all_by_timestamp(&self) -> Vec<(String, String)> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner
            .order
            .values()
            .map(|key| {
                let entry = &inner.entries[key];
                (key.clone(), entry.value.clone())
            })
            .collect()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().expect("store lock poisoned").entries.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
