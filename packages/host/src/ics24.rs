//! Deterministic commitment paths and commitment hashes.
//!
//! Paths are built from (client id, kind tag, sequence) so two relayers
//! computing a path for the same logical event always agree. Path keys are
//! keccak256 of the path bytes; commitments are sha256 folds over the
//! canonical encodings.

use std::mem::size_of;

use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::error::HostError;
use crate::packet::{Packet, Payload};

/// Protocol version byte folded into packet and ack commitments.
const PROTOCOL_VERSION: u8 = 2;

const HASH_OUTPUT_SIZE: usize = 32;

const PACKET_COMMITMENT_TAG: u8 = 1;
const PACKET_RECEIPT_TAG: u8 = 2;
const PACKET_ACK_TAG: u8 = 3;

/// The acknowledgement commitment recorded when an application callback
/// rejects a received packet.
pub const UNIVERSAL_ERROR_ACK: [u8; 32] = [
    0x47, 0x74, 0xd4, 0xa5, 0x75, 0x99, 0x3f, 0x96, 0x3b, 0x1c, 0x06, 0x57, 0x37, 0x36, 0x61,
    0x7a, 0x45, 0x7a, 0xbe, 0xf8, 0x58, 0x91, 0x78, 0xdb, 0x8d, 0x10, 0xc9, 0x4b, 0x4a, 0xb5,
    0x11, 0xab,
];

fn sha256(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

fn keccak256(bytes: &[u8]) -> [u8; 32] {
    Keccak256::digest(bytes).into()
}

fn commitment_path(client_id: &str, tag: u8, sequence: u64) -> Vec<u8> {
    let mut path = Vec::with_capacity(client_id.len() + size_of::<u8>() + size_of::<u64>());
    path.extend_from_slice(client_id.as_bytes());
    path.push(tag);
    path.extend_from_slice(&sequence.to_be_bytes());
    path
}

/// Computes the commitment path for a packet.
/// Path format: `client_id || 0x01 || sequence (big-endian)`
#[must_use]
pub fn packet_commitment_path(client_id: &str, sequence: u64) -> Vec<u8> {
    commitment_path(client_id, PACKET_COMMITMENT_TAG, sequence)
}

/// Computes the commitment path for a packet receipt.
/// Path format: `client_id || 0x02 || sequence (big-endian)`
#[must_use]
pub fn packet_receipt_commitment_path(client_id: &str, sequence: u64) -> Vec<u8> {
    commitment_path(client_id, PACKET_RECEIPT_TAG, sequence)
}

/// Computes the commitment path for an acknowledgement.
/// Path format: `client_id || 0x03 || sequence (big-endian)`
#[must_use]
pub fn packet_acknowledgement_commitment_path(client_id: &str, sequence: u64) -> Vec<u8> {
    commitment_path(client_id, PACKET_ACK_TAG, sequence)
}

/// Computes the keccak256 key of the packet commitment path.
#[must_use]
pub fn packet_commitment_key(client_id: &str, sequence: u64) -> [u8; 32] {
    keccak256(&packet_commitment_path(client_id, sequence))
}

/// Computes the keccak256 key of the packet receipt path.
#[must_use]
pub fn packet_receipt_commitment_key(client_id: &str, sequence: u64) -> [u8; 32] {
    keccak256(&packet_receipt_commitment_path(client_id, sequence))
}

/// Computes the keccak256 key of the acknowledgement path.
#[must_use]
pub fn packet_acknowledgement_commitment_key(client_id: &str, sequence: u64) -> [u8; 32] {
    keccak256(&packet_acknowledgement_commitment_path(client_id, sequence))
}

/// Computes the packet commitment hash.
/// Format: `sha256(0x02 || sha256(destClient) || sha256(timeout) || sha256(payloads))`
#[must_use]
pub fn packet_commitment_bytes32(packet: &Packet) -> [u8; 32] {
    let mut app_bytes = Vec::with_capacity(packet.payloads.len() * HASH_OUTPUT_SIZE);
    for payload in &packet.payloads {
        app_bytes.extend_from_slice(&hash_payload(payload));
    }

    let dest_client_hash = sha256(packet.dest_client.as_bytes());
    let timeout_hash = sha256(&packet.timeout_timestamp.to_be_bytes());
    let app_hash = sha256(&app_bytes);

    let mut hasher = Sha256::new();
    hasher.update([PROTOCOL_VERSION]);
    hasher.update(dest_client_hash);
    hasher.update(timeout_hash);
    hasher.update(app_hash);
    hasher.finalize().into()
}

/// Computes the hash of a payload.
fn hash_payload(payload: &Payload) -> [u8; 32] {
    let mut buf = Vec::with_capacity(5 * HASH_OUTPUT_SIZE);
    buf.extend_from_slice(&sha256(payload.source_port.as_bytes()));
    buf.extend_from_slice(&sha256(payload.dest_port.as_bytes()));
    buf.extend_from_slice(&sha256(payload.version.as_bytes()));
    buf.extend_from_slice(&sha256(payload.encoding.as_bytes()));
    buf.extend_from_slice(&sha256(&payload.value));
    sha256(&buf)
}

/// Computes the acknowledgement commitment hash.
/// Format: `sha256(0x02 || sha256(ack1) || sha256(ack2) || ...)`
///
/// # Errors
/// Returns [`HostError::NoAcknowledgements`] if the ack list is empty.
pub fn packet_acknowledgement_commitment_bytes32(acks: &[Vec<u8>]) -> Result<[u8; 32], HostError> {
    if acks.is_empty() {
        return Err(HostError::NoAcknowledgements);
    }

    let mut ack_bytes = Vec::with_capacity(acks.len() * HASH_OUTPUT_SIZE);
    for ack in acks {
        ack_bytes.extend_from_slice(&sha256(ack));
    }

    let mut hasher = Sha256::new();
    hasher.update([PROTOCOL_VERSION]);
    hasher.update(&ack_bytes);
    Ok(hasher.finalize().into())
}

/// Computes the packet receipt commitment hash (keccak256 of the canonical
/// packet encoding). Lets a duplicate receive distinguish the same packet
/// from a different packet at the same sequence.
///
/// # Errors
/// Returns [`HostError::PacketSerialization`] if the packet cannot be encoded.
pub fn packet_receipt_commitment_bytes32(packet: &Packet) -> Result<[u8; 32], HostError> {
    let packet_bytes = borsh::to_vec(packet).map_err(|_| HostError::PacketSerialization)?;
    Ok(keccak256(&packet_bytes))
}

/// Appends a path to the last element of a merkle prefix.
///
/// # Errors
/// Returns [`HostError::EmptyMerklePrefix`] if the merkle prefix is empty.
pub fn prefixed_path(merkle_prefix: &[Vec<u8>], path: &[u8]) -> Result<Vec<Vec<u8>>, HostError> {
    if merkle_prefix.is_empty() {
        return Err(HostError::EmptyMerklePrefix);
    }

    let mut result = merkle_prefix.to_vec();
    let last_idx = result.len() - 1;
    result[last_idx].extend_from_slice(path);

    Ok(result)
}
