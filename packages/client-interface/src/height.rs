//! Two-part heights into a remote ledger's history.

use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};

/// A (revision number, revision height) position. Within one client
/// instance the revision number is fixed; ordering is lexicographic.
#[derive(
    BorshSerialize,
    BorshDeserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
pub struct Height {
    /// Revision number of the remote ledger
    pub revision_number: u64,
    /// Height within the revision
    pub revision_height: u64,
}

impl Height {
    /// Creates a new height.
    #[must_use]
    pub const fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}
