//! Write-once/delete-once commitment store.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::HostError;

/// Content-addressed map from a deterministic path to a commitment hash.
///
/// Entries are written once on send/receive and deleted once on
/// ack/timeout. Paths are never reused: re-creation at a deleted path is
/// rejected, so terminal packet states can be inferred from membership.
#[derive(Debug, Default, Clone)]
pub struct CommitmentStore {
    entries: BTreeMap<Vec<u8>, [u8; 32]>,
    deleted: BTreeSet<Vec<u8>>,
}

impl CommitmentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` at `path`.
    ///
    /// # Errors
    /// Returns [`HostError::AlreadyExists`] if an entry exists at `path`
    /// or one existed there before being deleted.
    pub fn put(&mut self, path: Vec<u8>, value: [u8; 32]) -> Result<(), HostError> {
        if self.entries.contains_key(&path) || self.deleted.contains(&path) {
            return Err(HostError::AlreadyExists);
        }
        self.entries.insert(path, value);
        Ok(())
    }

    /// Returns the stored hash at `path`.
    ///
    /// # Errors
    /// Returns [`HostError::NotFound`] if no entry exists at `path`.
    pub fn get(&self, path: &[u8]) -> Result<[u8; 32], HostError> {
        self.entries.get(path).copied().ok_or(HostError::NotFound)
    }

    /// Whether an entry exists at `path`.
    #[must_use]
    pub fn contains(&self, path: &[u8]) -> bool {
        self.entries.contains_key(path)
    }

    /// Removes the entry at `path` and returns the prior value.
    ///
    /// # Errors
    /// Returns [`HostError::NotFound`] if no entry exists at `path`, and
    /// [`HostError::Mismatch`] if the stored value differs from `expected`.
    pub fn delete(&mut self, path: &[u8], expected: [u8; 32]) -> Result<[u8; 32], HostError> {
        let stored = self.get(path)?;
        if stored != expected {
            return Err(HostError::Mismatch);
        }
        self.entries.remove(path);
        self.deleted.insert(path.to_vec());
        Ok(stored)
    }
}
