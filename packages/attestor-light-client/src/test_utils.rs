//! Shared fixtures for attestor light client tests.

use std::cell::LazyCell;

use k256::ecdsa::SigningKey;
use sha2::{Digest, Sha256};

use crate::attestation::{HeightAttestation, PacketAttestation};
use crate::client::AttestorLightClient;
use crate::client_state::{ClientState, ConsensusState};
use crate::header::{Header, MembershipAttestationProof};
use crate::verify::address_from_verifying_key;

/// Deterministic signing keys of the fixture attestor set.
pub const SIGNING_KEYS: LazyCell<[SigningKey; 5]> = LazyCell::new(|| {
    [
        SigningKey::from_bytes(&[0xcd; 32].into()).expect("32 bytes, within curve order"),
        SigningKey::from_bytes(&[0x02; 32].into()).expect("32 bytes, within curve order"),
        SigningKey::from_bytes(&[0x03; 32].into()).expect("32 bytes, within curve order"),
        SigningKey::from_bytes(&[0x10; 32].into()).expect("32 bytes, within curve order"),
        SigningKey::from_bytes(&[0x1f; 32].into()).expect("32 bytes, within curve order"),
    ]
});

/// Addresses of the fixture attestor set.
pub const ADDRESSES: LazyCell<Vec<[u8; 20]>> = LazyCell::new(|| {
    SIGNING_KEYS
        .iter()
        .map(|key| address_from_verifying_key(key.verifying_key()))
        .collect()
});

/// Initial height of fixture clients built by [`client`].
pub const INITIAL_HEIGHT: u64 = 90;
/// Initial timestamp of fixture clients built by [`client`].
pub const INITIAL_TIMESTAMP: u64 = 900;

/// A client state over the full fixture attestor set at height 100.
///
/// # Panics
/// Panics if the fixture configuration is rejected.
#[must_use]
pub fn client_state(min_required_sigs: u8) -> ClientState {
    ClientState::new(ADDRESSES.clone(), min_required_sigs, 100)
        .expect("fixture client state is valid")
}

/// A fresh client over the first `attestors` fixture keys.
///
/// # Panics
/// Panics if the fixture configuration is rejected.
#[must_use]
pub fn client(attestors: usize, min_required_sigs: u8) -> AttestorLightClient {
    let addresses = ADDRESSES[..attestors].to_vec();
    let client_state = ClientState::new(addresses, min_required_sigs, INITIAL_HEIGHT)
        .expect("fixture client state is valid");
    AttestorLightClient::new(
        client_state,
        &ConsensusState {
            height: INITIAL_HEIGHT,
            timestamp: INITIAL_TIMESTAMP,
        },
    )
    .expect("fixture client is valid")
}

/// A client frozen by force, for terminal-state tests.
#[must_use]
pub fn frozen_client(attestors: usize, min_required_sigs: u8) -> AttestorLightClient {
    let mut client = client(attestors, min_required_sigs);
    client.client_state.is_frozen = true;
    client
}

/// Signs `data` with each key, producing raw 65-byte (r||s||v) signatures.
///
/// # Panics
/// Panics if signing fails.
#[must_use]
pub fn sign_payload(data: &[u8], keys: &[SigningKey]) -> Vec<Vec<u8>> {
    let digest: [u8; 32] = Sha256::digest(data).into();
    keys.iter()
        .map(|key| {
            let (signature, recovery_id) = key
                .sign_prehash_recoverable(&digest)
                .expect("signing cannot fail");
            let mut raw = signature.to_bytes().to_vec();
            raw.push(recovery_id.to_byte());
            raw
        })
        .collect()
}

/// A height-attestation header signed by `keys`.
///
/// # Panics
/// Panics if encoding fails.
#[must_use]
pub fn header_bytes_signed_by(height: u64, timestamp: u64, keys: &[SigningKey]) -> Vec<u8> {
    let attestation_data =
        borsh::to_vec(&HeightAttestation { height, timestamp }).expect("payload encodes");
    let header = Header {
        signatures: sign_payload(&attestation_data, keys),
        attestation_data,
    };
    serde_json::to_vec(&header).expect("header encodes")
}

/// A height-attestation header signed by the whole fixture set.
#[must_use]
pub fn header_bytes(height: u64, timestamp: u64) -> Vec<u8> {
    header_bytes_signed_by(height, timestamp, &SIGNING_KEYS.clone())
}

/// A packet-membership proof signed by `keys`.
///
/// # Panics
/// Panics if encoding fails.
#[must_use]
pub fn membership_proof_signed_by(
    height: u64,
    packet_commitments: Vec<Vec<u8>>,
    keys: &[SigningKey],
) -> Vec<u8> {
    let attestation_data = borsh::to_vec(&PacketAttestation {
        height,
        packet_commitments,
    })
    .expect("payload encodes");
    let proof = MembershipAttestationProof {
        signatures: sign_payload(&attestation_data, keys),
        attestation_data,
    };
    serde_json::to_vec(&proof).expect("proof encodes")
}

/// A packet-membership proof signed by the whole fixture set.
#[must_use]
pub fn membership_proof_bytes(height: u64, packet_commitments: Vec<Vec<u8>>) -> Vec<u8> {
    membership_proof_signed_by(height, packet_commitments, &SIGNING_KEYS.clone())
}
