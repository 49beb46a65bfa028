//! Client and consensus state for the ZK-proof light client.

use borsh::{BorshDeserialize, BorshSerialize};
use ibc_lite_client_interface::Height;
use sha2::{Digest, Sha256};

/// Fractional voting-power threshold required to trust a header.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrustThreshold {
    /// Numerator of the fraction
    pub numerator: u64,
    /// Denominator of the fraction
    pub denominator: u64,
}

/// Trust parameters and progress of one client instance.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClientState {
    /// Chain identifier of the remote ledger
    pub chain_id: String,
    /// Fractional trust threshold
    pub trust_level: TrustThreshold,
    /// Trusting period in seconds
    pub trusting_period: u64,
    /// Unbonding period in seconds
    pub unbonding_period: u64,
    /// Allowed clock drift in seconds
    pub max_clock_drift: u64,
    /// Latest verified height
    pub latest_height: Height,
    /// Whether the client is frozen due to misbehaviour
    pub is_frozen: bool,
}

impl ClientState {
    /// Compares the trust parameters of two client states.
    ///
    /// `latest_height` and `is_frozen` are deliberately excluded: a proof
    /// generated against an older snapshot of this client would otherwise
    /// be rejected whenever a racing relayer lands an update first.
    #[must_use]
    pub fn matches_trust_parameters(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id
            && self.trust_level == other.trust_level
            && self.trusting_period == other.trusting_period
            && self.unbonding_period == other.unbonding_period
            && self.max_clock_drift == other.max_clock_drift
    }
}

/// A verified snapshot of the remote ledger's consensus at one height.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ConsensusState {
    /// Timestamp of the remote block, unix seconds
    pub timestamp: u64,
    /// State-root commitment
    pub root: [u8; 32],
    /// Identity hash of the validator set signing the next block
    pub next_validators_hash: [u8; 32],
}

impl ConsensusState {
    /// Hash of the canonical encoding; the identity consensus states are
    /// stored and compared under.
    ///
    /// # Panics
    /// Never panics: the canonical encoding of a consensus state cannot
    /// fail.
    #[must_use]
    pub fn hash(&self) -> [u8; 32] {
        let bz = borsh::to_vec(self).expect("consensus state encoding is infallible");
        Sha256::digest(&bz).into()
    }
}
