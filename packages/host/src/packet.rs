//! Packet and payload types shared by the router and the light clients.

use borsh::{BorshDeserialize, BorshSerialize};

/// An application payload carried by a packet.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Payload {
    /// Port identifier on the sending ledger
    pub source_port: String,
    /// Port identifier on the receiving ledger
    pub dest_port: String,
    /// Application version string
    pub version: String,
    /// Encoding tag for `value`
    pub encoding: String,
    /// Opaque application bytes
    pub value: Vec<u8>,
}

/// A cross-ledger packet. Immutable once sent; identity is
/// (`source_client`, `sequence`).
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    /// Per-channel strictly increasing sequence number
    pub sequence: u64,
    /// Client identifier on the source ledger
    pub source_client: String,
    /// Client identifier on the destination ledger
    pub dest_client: String,
    /// Unix timestamp (seconds) after which the packet can only time out
    pub timeout_timestamp: u64,
    /// One or more application payloads
    pub payloads: Vec<Payload>,
}
