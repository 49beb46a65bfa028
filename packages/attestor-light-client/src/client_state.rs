//! Attestor client and consensus state.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::error::AttestorClientError;
use crate::verify::address_from_verifying_key;

/// Minimal attestor client state.
///
/// The attestor set and threshold are configured once at instantiation and
/// never mutate; only `latest_height` and `is_frozen` change afterwards.
/// Heights are single-part: the attested ledger has no revisions.
#[derive(
    BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct ClientState {
    /// Attestor addresses (20 bytes, recovered from signatures)
    pub attestor_addresses: Vec<[u8; 20]>,
    /// Minimum required signatures
    pub min_required_sigs: u8,
    /// Latest height for tracking progression
    pub latest_height: u64,
    /// Whether the client is frozen due to misbehaviour
    pub is_frozen: bool,
}

impl ClientState {
    /// Constructs a client state from the attestor address set.
    ///
    /// # Errors
    /// Returns [`AttestorClientError::InvalidConfiguration`] for an empty
    /// attestor set or a threshold of zero or exceeding the set size.
    pub fn new(
        attestor_addresses: Vec<[u8; 20]>,
        min_required_sigs: u8,
        latest_height: u64,
    ) -> Result<Self, AttestorClientError> {
        let invalid = |reason: &str| AttestorClientError::InvalidConfiguration {
            reason: reason.to_string(),
        };

        if attestor_addresses.is_empty() {
            return Err(invalid("empty attestor set"));
        }
        if min_required_sigs == 0 {
            return Err(invalid("signature threshold must be non-zero"));
        }
        if usize::from(min_required_sigs) > attestor_addresses.len() {
            return Err(invalid("signature threshold exceeds attestor set size"));
        }

        Ok(Self {
            attestor_addresses,
            min_required_sigs,
            latest_height,
            is_frozen: false,
        })
    }

    /// Constructs a client state from attestor public keys, deriving their
    /// addresses as keccak256 of the uncompressed point, last 20 bytes.
    ///
    /// # Errors
    /// Same configuration errors as [`ClientState::new`].
    pub fn new_from_pubkeys(
        pub_keys: &[k256::ecdsa::VerifyingKey],
        min_required_sigs: u8,
        latest_height: u64,
    ) -> Result<Self, AttestorClientError> {
        let attestor_addresses = pub_keys.iter().map(address_from_verifying_key).collect();
        Self::new(attestor_addresses, min_required_sigs, latest_height)
    }
}

/// Per-height consensus record: the attested timestamp.
#[derive(
    BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct ConsensusState {
    /// Attested height
    pub height: u64,
    /// Attested timestamp, unix seconds
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ADDRESSES, SIGNING_KEYS};
    use sha3::{Digest, Keccak256};

    #[test]
    fn address_derivation_matches_keccak_last20() {
        let skey = &SIGNING_KEYS[0];
        let vk = skey.verifying_key();
        let uncompressed = vk.to_encoded_point(false);
        let hash = Keccak256::digest(&uncompressed.as_bytes()[1..]);
        let mut expected = [0u8; 20];
        expected.copy_from_slice(&hash[12..]);

        let client_state = ClientState::new_from_pubkeys(&[*vk], 1, 1).unwrap();
        assert_eq!(client_state.attestor_addresses, vec![expected]);
    }

    #[test]
    fn populates_addresses_from_multiple_pubkeys() {
        let pubkeys: Vec<_> = SIGNING_KEYS.iter().map(|k| *k.verifying_key()).collect();
        let client_state = ClientState::new_from_pubkeys(&pubkeys, 3, 42).unwrap();

        assert_eq!(client_state.attestor_addresses, ADDRESSES.clone());
        assert_eq!(client_state.min_required_sigs, 3);
        assert_eq!(client_state.latest_height, 42);
        assert!(!client_state.is_frozen);
    }

    #[test]
    fn rejects_empty_attestor_set() {
        let res = ClientState::new(vec![], 1, 1);
        assert!(matches!(
            res,
            Err(AttestorClientError::InvalidConfiguration { reason }) if reason.contains("empty")
        ));
    }

    #[test]
    fn rejects_zero_threshold() {
        let res = ClientState::new(ADDRESSES.clone(), 0, 1);
        assert!(matches!(
            res,
            Err(AttestorClientError::InvalidConfiguration { reason }) if reason.contains("non-zero")
        ));
    }

    #[test]
    fn rejects_threshold_exceeding_set_size() {
        let res = ClientState::new(ADDRESSES.clone(), 6, 1);
        assert!(matches!(
            res,
            Err(AttestorClientError::InvalidConfiguration { reason }) if reason.contains("exceeds")
        ));
    }

    #[test]
    fn round_trips_through_canonical_encoding() {
        let client_state = ClientState::new(ADDRESSES.clone(), 3, 100).unwrap();
        let bz = borsh::to_vec(&client_state).unwrap();
        assert_eq!(client_state, borsh::from_slice::<ClientState>(&bz).unwrap());

        let consensus = ConsensusState {
            height: 100,
            timestamp: 1000,
        };
        let bz = borsh::to_vec(&consensus).unwrap();
        assert_eq!(consensus, borsh::from_slice::<ConsensusState>(&bz).unwrap());
    }
}
