//! Execution-scoped call context and proof-result cache.

use std::collections::BTreeMap;

use crate::height::Height;

/// Cache of key/value facts established by verified proofs within the
/// current execution, keyed by (height, path, value) and storing the
/// trusted timestamp at that height.
///
/// The cache is side storage, not application state: it is constructed
/// fresh for each top-level operation and discarded afterwards, so entries
/// never survive into a different call.
#[derive(Debug, Default)]
pub struct ProofCache {
    entries: BTreeMap<(Height, Vec<u8>, Vec<u8>), u64>,
}

impl ProofCache {
    /// Records a verified (height, path, value) fact with its timestamp.
    pub fn insert(&mut self, height: Height, path: Vec<u8>, value: Vec<u8>, timestamp: u64) {
        self.entries.insert((height, path, value), timestamp);
    }

    /// Looks up a previously verified fact.
    #[must_use]
    pub fn get(&self, height: Height, path: &[u8], value: &[u8]) -> Option<u64> {
        self.entries
            .get(&(height, path.to_vec(), value.to_vec()))
            .copied()
    }

    /// Number of cached facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-operation context threaded through every light client call.
#[derive(Debug)]
pub struct CallContext {
    /// Current host time, unix seconds
    pub now: u64,
    /// Execution-scoped proof cache
    pub cache: ProofCache,
}

impl CallContext {
    /// Creates a fresh context for one top-level operation.
    #[must_use]
    pub fn new(now: u64) -> Self {
        Self {
            now,
            cache: ProofCache::default(),
        }
    }
}
