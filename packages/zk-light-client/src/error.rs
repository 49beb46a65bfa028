//! Error types for the ZK-proof light client.

use ibc_lite_client_interface::{Height, LightClientError};
use thiserror::Error;

use crate::verifier::ProofVerifyError;

/// Main error type for ZK light client operations.
#[derive(Error, Debug)]
pub enum ZkClientError {
    /// Client is frozen
    #[error("client is frozen")]
    FrozenClientState,

    /// Invalid instantiation parameters
    #[error("invalid client configuration: {reason}")]
    InvalidConfiguration {
        /// Reason for error
        reason: String,
    },

    /// Proof or public values could not be decoded
    #[error("failed to decode proof envelope: {0}")]
    Decode(#[from] std::io::Error),

    /// The proof names a different program than the operation expects
    #[error("verification key mismatch: expected {expected}, got {actual}")]
    VerificationKeyMismatch {
        /// Hex of the expected program key
        expected: String,
        /// Hex of the submitted program key
        actual: String,
    },

    /// Public values reference a client state with different trust parameters
    #[error("client state in public values does not match the stored client state")]
    ClientStateMismatch,

    /// Proof timestamp is too old or in the future
    #[error("proof time {time} outside allowed drift window ending at {now}")]
    ProofTimeOutOfRange {
        /// Prover wall-clock time
        time: u64,
        /// Host time at verification
        now: u64,
    },

    /// No consensus state recorded at the height
    #[error("no consensus state recorded at height {0}")]
    ConsensusStateNotFound(Height),

    /// The referenced trusted consensus state differs from the record
    #[error("trusted consensus state at height {height} does not match the record")]
    TrustedConsensusStateMismatch {
        /// Height of the mismatching record
        height: Height,
    },

    /// More key/value pairs than one proof may carry
    #[error("proof carries {count} key/value pairs, maximum is {max}")]
    TooManyKvPairs {
        /// Pairs in the submitted proof
        count: usize,
        /// Allowed maximum
        max: usize,
    },

    /// Requested pair absent from the proven pairs
    #[error("key/value pair not found among the proven pairs")]
    KeyValuePairNotFound,

    /// Empty proof referenced a fact this execution never verified
    #[error("key/value pair not found in proof cache")]
    KeyValuePairNotInCache,

    /// Membership requires a value, non-membership forbids one
    #[error("invalid value for this proof kind: {reason}")]
    InvalidValue {
        /// Reason for error
        reason: &'static str,
    },

    /// Combined proof advanced the client to an unexpected height
    #[error("proof height mismatch: expected {expected}, got {actual}")]
    ProofHeightMismatch {
        /// Height the caller requested
        expected: Height,
        /// Height the proof established
        actual: Height,
    },

    /// A combined update-and-membership proof classified as misbehaviour
    #[error("update embedded in membership proof would freeze the client")]
    MisbehaviourInMembershipProof,

    /// The proof itself failed cryptographic verification
    #[error("proof verification failed: {0}")]
    ProofVerification(#[from] ProofVerifyError),

    /// Capability not implemented by this client
    #[error("{feature} is not supported by this client")]
    UnsupportedFeature {
        /// Name of the missing capability
        feature: &'static str,
    },
}

impl From<ZkClientError> for LightClientError {
    fn from(err: ZkClientError) -> Self {
        match err {
            ZkClientError::FrozenClientState => Self::FrozenClientState,
            ZkClientError::KeyValuePairNotInCache => Self::KeyValuePairNotInCache,
            ZkClientError::ConsensusStateNotFound(height) => Self::ConsensusStateNotFound(height),
            ZkClientError::UnsupportedFeature { feature } => Self::UnsupportedFeature { feature },
            other => Self::verification(other),
        }
    }
}
