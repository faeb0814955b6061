//! Concurrent timestamp-ordered key/value store.
//!
//! [`OrderedStore`] is the shared collection the dispatch engine mutates and
//! queries. It keeps two views in lockstep under one reader/writer lock:
//!
//! - a key → entry map for O(1) point lookups, and
//! - an ordering index keyed by `(timestamp, seq)` so a full traversal
//!   yields entries in non-decreasing timestamp order, ties broken by
//!   insertion sequence (stable).
//!
//! The original design used a hand-linked doubly-linked list; here the
//! ordering index is a `BTreeMap`, which removes the cyclic node references
//! while keeping the same observable traversal order.

mod ordered;

pub use ordered::OrderedStore;
