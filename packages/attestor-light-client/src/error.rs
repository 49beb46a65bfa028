//! Error types for the attestor light client.

use ibc_lite_client_interface::{Height, LightClientError};
use thiserror::Error;

/// Main error type for attestor light client operations.
#[derive(Error, Debug)]
pub enum AttestorClientError {
    /// Client is frozen
    #[error("client is frozen")]
    FrozenClientState,

    /// Invalid instantiation parameters
    #[error("invalid client configuration: {reason}")]
    InvalidConfiguration {
        /// Reason for error
        reason: String,
    },

    /// Signature could not be parsed or recovered
    #[error("signature verification failed")]
    InvalidSignature,

    /// Recovered signer is not in the trusted attestor set
    #[error("unknown address recovered from signature: {address:02x?}")]
    UnknownAddressRecovered {
        /// Recovered address that is not in the trusted set
        address: [u8; 20],
    },

    /// Cannot attest to data as malformed
    #[error("invalid attested data: {reason}")]
    InvalidAttestedData {
        /// Reason for error
        reason: String,
    },

    /// Invalid header format
    #[error("invalid header format: {reason}")]
    InvalidHeader {
        /// Reason for error
        reason: String,
    },

    /// Bad proof provided
    #[error("proof invalid: {reason}")]
    InvalidProof {
        /// Reason for error
        reason: String,
    },

    /// Requested value absent from the attested commitments
    #[error("value is not a member of the attested commitments")]
    NotMember,

    /// Proof or header envelope cannot be deserialized
    #[error("deserializing attestation envelope failed: {0}")]
    DeserializeEnvelopeFailed(#[source] serde_json::Error),

    /// Attested payload cannot be decoded
    #[error("failed to decode attested payload: {0}")]
    DecodePayload(#[from] std::io::Error),

    /// No timestamp on record for the height
    #[error("height {0} not found in consensus state")]
    HeightNotFound(u64),

    /// Capability not implemented by this client
    #[error("{feature} is not supported by this client")]
    UnsupportedFeature {
        /// Name of the missing capability
        feature: &'static str,
    },
}

impl From<AttestorClientError> for LightClientError {
    fn from(err: AttestorClientError) -> Self {
        match err {
            AttestorClientError::FrozenClientState => Self::FrozenClientState,
            AttestorClientError::HeightNotFound(height) => {
                Self::ConsensusStateNotFound(Height::new(0, height))
            }
            AttestorClientError::UnsupportedFeature { feature } => {
                Self::UnsupportedFeature { feature }
            }
            other => Self::verification(other),
        }
    }
}
