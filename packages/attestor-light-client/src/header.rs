//! Attestor header and proof envelopes.

use serde::{Deserialize, Serialize};

/// A client update: an attested payload plus the quorum's raw signatures.
///
/// The height and timestamp being attested live inside `attestation_data`
/// (see [`crate::attestation::HeightAttestation`]); nothing outside the
/// signed bytes is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Canonical encoding of the attested payload
    pub attestation_data: Vec<u8>,
    /// Raw 65-byte signatures in (r||s||v) format for address recovery
    pub signatures: Vec<Vec<u8>>,
}

/// A membership proof: the same envelope shape over a packet attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipAttestationProof {
    /// Canonical encoding of the attested packet commitments
    pub attestation_data: Vec<u8>,
    /// Raw 65-byte signatures in (r||s||v) format for address recovery
    pub signatures: Vec<Vec<u8>>,
}
