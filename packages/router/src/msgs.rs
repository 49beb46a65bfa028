//! Router operation messages.

use borsh::{BorshDeserialize, BorshSerialize};
use ibc_lite_client_interface::Height;
pub use ibc_lite_host::{Packet, Payload};

/// Message for sending a packet.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct MsgSendPacket {
    /// Source-side client identifier the packet travels over
    pub source_client: String,
    /// Unix timestamp (seconds) after which the packet can only time out
    pub timeout_timestamp: u64,
    /// One or more application payloads
    pub payloads: Vec<Payload>,
}

/// Message for receiving a packet.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct MsgRecvPacket {
    /// The packet as sent on the source ledger
    pub packet: Packet,
    /// Proof that the packet commitment is in the source ledger's state
    pub proof_commitment: Vec<u8>,
    /// Height the proof is evaluated at
    pub proof_height: Height,
}

/// Message for acknowledging a packet.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct MsgAckPacket {
    /// The packet as originally sent
    pub packet: Packet,
    /// One acknowledgement per payload, as written by the destination
    pub acknowledgements: Vec<Vec<u8>>,
    /// Proof that the ack commitment is in the destination ledger's state
    pub proof_acked: Vec<u8>,
    /// Height the proof is evaluated at
    pub proof_height: Height,
}

/// Message for timing out a packet.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct MsgTimeoutPacket {
    /// The packet as originally sent
    pub packet: Packet,
    /// Proof that no receipt exists in the destination ledger's state
    pub proof_unreceived: Vec<u8>,
    /// Height the proof is evaluated at
    pub proof_height: Height,
}
