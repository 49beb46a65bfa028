//! Attested payload layouts.

use borsh::{BorshDeserialize, BorshSerialize};

/// The fact attested for a client update: a (height, timestamp) pair.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightAttestation {
    /// Attested height; must be non-zero
    pub height: u64,
    /// Attested timestamp, unix seconds; must be non-zero
    pub timestamp: u64,
}

/// The fact attested for packet membership: the commitments present in the
/// remote ledger's state at a height.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct PacketAttestation {
    /// Height the commitments were observed at
    pub height: u64,
    /// The committed facts, byte-exact
    pub packet_commitments: Vec<Vec<u8>>,
}
