//! Packet membership verification for the attestor client.

use crate::attestation::PacketAttestation;
use crate::client::AttestorLightClient;
use crate::error::AttestorClientError;
use crate::header::MembershipAttestationProof;
use crate::verify::verify_attestation;

impl AttestorLightClient {
    /// Verifies that `value` appears, byte-exact, among the commitments the
    /// quorum attested for `height`. Returns the trusted timestamp at that
    /// height.
    ///
    /// A timestamp must already be on record for `height`; the attestors
    /// vouch for inclusion in a state the client has already accepted, the
    /// proof itself cannot introduce one.
    ///
    /// # Errors
    /// Fails if the client is frozen, no timestamp is recorded at `height`,
    /// the signature check fails, the attested height differs from the
    /// requested one, or the value is not among the attested commitments.
    pub fn membership(
        &self,
        height: u64,
        value: &[u8],
        proof_bytes: &[u8],
    ) -> Result<u64, AttestorClientError> {
        self.ensure_active()?;

        let trusted_timestamp = self
            .timestamp_at(height)
            .ok_or(AttestorClientError::HeightNotFound(height))?;

        let proof: MembershipAttestationProof = serde_json::from_slice(proof_bytes)
            .map_err(AttestorClientError::DeserializeEnvelopeFailed)?;

        verify_attestation(&self.client_state, &proof.attestation_data, &proof.signatures)?;

        let attested: PacketAttestation = borsh::from_slice(&proof.attestation_data)?;
        if attested.height != height {
            return Err(AttestorClientError::InvalidProof {
                reason: format!(
                    "attested height {} does not match proof height {height}",
                    attested.height
                ),
            });
        }

        if !attested
            .packet_commitments
            .iter()
            .any(|commitment| commitment == value)
        {
            return Err(AttestorClientError::NotMember);
        }

        Ok(trusted_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        client, frozen_client, membership_proof_bytes, membership_proof_signed_by, SIGNING_KEYS,
    };

    const COMMITMENT_A: [u8; 32] = [0xaa; 32];
    const COMMITMENT_B: [u8; 32] = [0xbb; 32];

    fn commitments() -> Vec<Vec<u8>> {
        vec![COMMITMENT_A.to_vec(), COMMITMENT_B.to_vec()]
    }

    #[test]
    fn membership_returns_trusted_timestamp() {
        let client = client(5, 5);
        let proof = membership_proof_bytes(90, commitments());

        let ts = client.membership(90, &COMMITMENT_A, &proof).unwrap();
        assert_eq!(ts, 900);
    }

    #[test]
    fn fails_without_recorded_timestamp() {
        let client = client(5, 5);
        let proof = membership_proof_bytes(123, commitments());

        let res = client.membership(123, &COMMITMENT_A, &proof);
        assert!(matches!(res, Err(AttestorClientError::HeightNotFound(123))));
    }

    #[test]
    fn fails_on_height_mismatch_inside_attestation() {
        let client = client(5, 5);
        let proof = membership_proof_bytes(91, commitments());

        let res = client.membership(90, &COMMITMENT_A, &proof);
        assert!(matches!(
            res,
            Err(AttestorClientError::InvalidProof { reason }) if reason.contains("height")
        ));
    }

    #[test]
    fn fails_when_value_not_attested() {
        let client = client(5, 5);
        let proof = membership_proof_bytes(90, commitments());

        let res = client.membership(90, &[0xcc; 32], &proof);
        assert!(matches!(res, Err(AttestorClientError::NotMember)));
    }

    #[test]
    fn fails_below_quorum() {
        let client = client(3, 2);
        let proof = membership_proof_signed_by(90, commitments(), &SIGNING_KEYS[..1]);

        let res = client.membership(90, &COMMITMENT_A, &proof);
        assert!(matches!(
            res,
            Err(AttestorClientError::InvalidAttestedData { reason }) if reason.contains("too few")
        ));
    }

    #[test]
    fn frozen_client_rejects_membership() {
        let client = frozen_client(5, 5);
        let proof = membership_proof_bytes(90, commitments());

        let res = client.membership(90, &COMMITMENT_A, &proof);
        assert!(matches!(res, Err(AttestorClientError::FrozenClientState)));
    }

    #[test]
    fn fails_on_garbage_proof() {
        let client = client(5, 5);
        let res = client.membership(90, &COMMITMENT_A, b"not json");
        assert!(matches!(
            res,
            Err(AttestorClientError::DeserializeEnvelopeFailed(_))
        ));
    }
}
