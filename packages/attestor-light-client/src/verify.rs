//! Attestation signature verification.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::client_state::ClientState;
use crate::error::AttestorClientError;

/// Length of a raw (r||s||v) signature.
const SIGNATURE_LENGTH: usize = 65;

/// Derives the 20-byte address of a public key: keccak256 over the
/// uncompressed point, last 20 bytes.
#[must_use]
pub fn address_from_verifying_key(key: &VerifyingKey) -> [u8; 20] {
    let uncompressed = key.to_encoded_point(false);
    let hash = Keccak256::digest(&uncompressed.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

fn recover_address(digest: &[u8; 32], raw: &[u8]) -> Result<[u8; 20], AttestorClientError> {
    if raw.len() != SIGNATURE_LENGTH {
        return Err(AttestorClientError::InvalidAttestedData {
            reason: format!("signature must be {SIGNATURE_LENGTH} bytes, got {}", raw.len()),
        });
    }

    let signature =
        Signature::from_slice(&raw[..64]).map_err(|_| AttestorClientError::InvalidSignature)?;
    let v = match raw[64] {
        v @ 27.. => v - 27,
        v => v,
    };
    let recovery_id =
        RecoveryId::from_byte(v).ok_or(AttestorClientError::InvalidSignature)?;
    let key = VerifyingKey::recover_from_prehash(digest, &signature, recovery_id)
        .map_err(|_| AttestorClientError::InvalidSignature)?;

    Ok(address_from_verifying_key(&key))
}

/// Verifies the cryptographic validity of an attestation.
///
/// Fails if:
/// - Fewer signatures than the quorum are submitted
/// - A signature is not exactly 65 bytes or does not recover
/// - A recovered address is not in the trusted attestor set
/// - The same attestor signed twice
pub(crate) fn verify_attestation(
    client_state: &ClientState,
    attestation_data: &[u8],
    signatures: &[Vec<u8>],
) -> Result<(), AttestorClientError> {
    if signatures.len() < usize::from(client_state.min_required_sigs) {
        return Err(AttestorClientError::InvalidAttestedData {
            reason: format!(
                "too few signatures: got {}, quorum is {}",
                signatures.len(),
                client_state.min_required_sigs
            ),
        });
    }

    let digest: [u8; 32] = Sha256::digest(attestation_data).into();

    // Duplicate detection is quadratic over the small attestor set.
    let mut recovered: Vec<[u8; 20]> = Vec::with_capacity(signatures.len());
    for raw in signatures {
        let address = recover_address(&digest, raw)?;
        if !client_state.attestor_addresses.contains(&address) {
            return Err(AttestorClientError::UnknownAddressRecovered { address });
        }
        if recovered.contains(&address) {
            return Err(AttestorClientError::InvalidAttestedData {
                reason: "duplicate signer in attestation".to_string(),
            });
        }
        recovered.push(address);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{client_state, sign_payload, SIGNING_KEYS};
    use rstest::rstest;

    const DATA: &[u8] = b"attested-bytes";

    #[test]
    fn accepts_a_full_quorum() {
        let cs = client_state(5);
        let sigs = sign_payload(DATA, &SIGNING_KEYS.clone());
        assert!(verify_attestation(&cs, DATA, &sigs).is_ok());
    }

    #[test]
    fn accepts_exactly_the_quorum() {
        let cs = client_state(2);
        let sigs = sign_payload(DATA, &SIGNING_KEYS[..2]);
        assert!(verify_attestation(&cs, DATA, &sigs).is_ok());
    }

    #[test]
    fn fails_below_quorum_even_with_valid_signatures() {
        let cs = client_state(5);
        let mut sigs = sign_payload(DATA, &SIGNING_KEYS.clone());
        sigs.pop();

        let res = verify_attestation(&cs, DATA, &sigs);
        assert!(matches!(
            res,
            Err(AttestorClientError::InvalidAttestedData { reason }) if reason.contains("too few")
        ));
    }

    #[test]
    fn fails_on_duplicate_signer_regardless_of_quorum() {
        let cs = client_state(2);
        let mut sigs = sign_payload(DATA, &SIGNING_KEYS[..3]);
        sigs[0] = sigs[1].clone();

        let res = verify_attestation(&cs, DATA, &sigs);
        assert!(matches!(
            res,
            Err(AttestorClientError::InvalidAttestedData { reason }) if reason.contains("duplicate")
        ));
    }

    #[rstest]
    #[case(0)]
    #[case(64)]
    #[case(66)]
    fn fails_on_wrong_signature_length(#[case] len: usize) {
        let cs = client_state(2);
        let mut sigs = sign_payload(DATA, &SIGNING_KEYS[..2]);
        sigs[0] = vec![0xff; len];

        let res = verify_attestation(&cs, DATA, &sigs);
        assert!(matches!(
            res,
            Err(AttestorClientError::InvalidAttestedData { reason }) if reason.contains("65")
        ));
    }

    #[test]
    fn fails_on_rogue_signer() {
        // Signed by a key outside the trusted set.
        let rogue =
            k256::ecdsa::SigningKey::from_bytes(&[0x77; 32].into()).expect("valid key bytes");
        let cs = client_state(2);
        let mut sigs = sign_payload(DATA, &SIGNING_KEYS[..2]);
        sigs[0] = sign_payload(DATA, std::slice::from_ref(&rogue)).remove(0);

        let res = verify_attestation(&cs, DATA, &sigs);
        assert!(matches!(
            res,
            Err(AttestorClientError::UnknownAddressRecovered { .. })
        ));
    }

    #[test]
    fn fails_on_garbage_signature_bytes() {
        let cs = client_state(2);
        let mut sigs = sign_payload(DATA, &SIGNING_KEYS[..2]);
        sigs[0] = vec![0xff; 65];

        let res = verify_attestation(&cs, DATA, &sigs);
        assert!(matches!(
            res,
            Err(
                AttestorClientError::InvalidSignature
                    | AttestorClientError::UnknownAddressRecovered { .. }
            )
        ));
    }

    #[test]
    fn fails_when_signature_covers_different_data() {
        let cs = client_state(2);
        let sigs = sign_payload(b"other-bytes", &SIGNING_KEYS[..2]);

        let res = verify_attestation(&cs, DATA, &sigs);
        assert!(matches!(
            res,
            Err(
                AttestorClientError::InvalidSignature
                    | AttestorClientError::UnknownAddressRecovered { .. }
            )
        ));
    }
}
