//! Client update verification and outcome classification.

use ibc_lite_client_interface::UpdateResult;

use crate::client::ZkLightClient;
use crate::error::ZkClientError;
use crate::msgs::{UpdateClientOutput, ZkProof};

/// How a proposed consensus state relates to the records already on file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UpdateClassification {
    Update,
    Misbehaviour,
    NoOp,
}

/// Classifies a proposed consensus state against the stored record at its
/// height. Classification never depends on the proof itself, so a proof
/// that would fail verification cannot influence the decision.
pub(crate) fn classify(
    existing_hash: Option<[u8; 32]>,
    proposed_hash: [u8; 32],
    proposed_timestamp: u64,
    trusted_timestamp: u64,
) -> UpdateClassification {
    match existing_hash {
        Some(stored) if stored == proposed_hash => UpdateClassification::NoOp,
        Some(_) => UpdateClassification::Misbehaviour,
        None if proposed_timestamp <= trusted_timestamp => UpdateClassification::Misbehaviour,
        None => UpdateClassification::Update,
    }
}

impl ZkLightClient {
    /// Verifies an update proof and applies its outcome.
    ///
    /// The outcome is classified before the proof is checked; the proof is
    /// then verified for `Update` and `Misbehaviour` outcomes before any
    /// state is committed, while `NoOp` skips verification entirely.
    ///
    /// # Errors
    /// Fails without mutating state if the client is frozen, the envelope
    /// is malformed, the public values are inconsistent with the stored
    /// client state, or the proof is invalid.
    pub fn verify_and_update(
        &mut self,
        now: u64,
        client_message: &[u8],
    ) -> Result<UpdateResult, ZkClientError> {
        self.ensure_active()?;

        let proof: ZkProof = borsh::from_slice(client_message)?;
        self.check_vkey(self.vkeys.update_client, proof.vkey)?;

        let output: UpdateClientOutput = borsh::from_slice(&proof.public_values)?;
        self.validate_update_output(&output, now)?;

        let proposed_hash = output.new_consensus_state.hash();
        let classification = classify(
            self.consensus_state_hash(output.new_height),
            proposed_hash,
            output.new_consensus_state.timestamp,
            output.trusted_consensus_state.timestamp,
        );

        match classification {
            UpdateClassification::NoOp => Ok(UpdateResult::NoOp),
            UpdateClassification::Update => {
                self.verifier
                    .verify(&proof.vkey, &proof.public_values, &proof.proof)?;
                self.record_consensus(
                    output.new_height,
                    proposed_hash,
                    output.new_consensus_state.timestamp,
                );
                tracing::info!(
                    chain_id = %output.client_state.chain_id,
                    height = %output.new_height,
                    "client updated"
                );
                Ok(UpdateResult::Update(output.new_height))
            }
            UpdateClassification::Misbehaviour => {
                self.verifier
                    .verify(&proof.vkey, &proof.public_values, &proof.proof)?;
                self.freeze();
                Ok(UpdateResult::Misbehaviour)
            }
        }
    }

    /// Validates the non-proof parts of an update output: prover time
    /// within drift, trust parameters unchanged, and the referenced trusted
    /// consensus state on record.
    pub(crate) fn validate_update_output(
        &self,
        output: &UpdateClientOutput,
        now: u64,
    ) -> Result<(), ZkClientError> {
        self.validate_proof_time(output.time, now)?;

        if !self
            .client_state
            .matches_trust_parameters(&output.client_state)
        {
            return Err(ZkClientError::ClientStateMismatch);
        }

        self.validate_trusted_consensus(output.trusted_height, &output.trusted_consensus_state)
    }

    pub(crate) fn check_vkey(
        &self,
        expected: [u8; 32],
        actual: [u8; 32],
    ) -> Result<(), ZkClientError> {
        if expected != actual {
            return Err(ZkClientError::VerificationKeyMismatch {
                expected: hex::encode(expected),
                actual: hex::encode(actual),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, UPDATE_VKEY};
    use ibc_lite_client_interface::{Height, LightClient};

    #[test]
    fn first_update_records_new_consensus_state() {
        let mut client = test_utils::client();
        let (message, output) = test_utils::update_message(&client, Height::new(0, 20), 2000);

        let res = client.verify_and_update(test_utils::NOW, &message).unwrap();
        assert_eq!(res, UpdateResult::Update(Height::new(0, 20)));
        assert_eq!(client.latest_height(), Height::new(0, 20));
        assert_eq!(
            client.consensus_state_hash(Height::new(0, 20)),
            Some(output.new_consensus_state.hash())
        );
    }

    #[test]
    fn update_below_latest_height_keeps_latest() {
        let mut client = test_utils::client();
        let (message, _) = test_utils::update_message(&client, Height::new(0, 20), 2000);
        client.verify_and_update(test_utils::NOW, &message).unwrap();

        // Backfill a skipped height; latest height must not regress.
        let (message, _) = test_utils::update_message(&client, Height::new(0, 15), 1500);
        let res = client.verify_and_update(test_utils::NOW, &message).unwrap();
        assert_eq!(res, UpdateResult::Update(Height::new(0, 15)));
        assert_eq!(client.latest_height(), Height::new(0, 20));
    }

    #[test]
    fn resubmitting_identical_state_is_a_noop() {
        let mut client = test_utils::client();
        let (message, _) = test_utils::update_message(&client, Height::new(0, 20), 2000);
        client.verify_and_update(test_utils::NOW, &message).unwrap();

        let res = client.verify_and_update(test_utils::NOW, &message).unwrap();
        assert_eq!(res, UpdateResult::NoOp);
        assert!(!client.client_state().is_frozen);
    }

    #[test]
    fn noop_skips_proof_verification() {
        let mut client = test_utils::client();
        let (message, _) = test_utils::update_message(&client, Height::new(0, 20), 2000);
        client.verify_and_update(test_utils::NOW, &message).unwrap();

        // Same public values under a verifier that now rejects everything:
        // the no-op classification must short-circuit before the proof.
        let mut client = test_utils::with_rejecting_verifier(client);
        let res = client.verify_and_update(test_utils::NOW, &message).unwrap();
        assert_eq!(res, UpdateResult::NoOp);
    }

    #[test]
    fn conflicting_consensus_state_freezes_the_client() {
        let mut client = test_utils::client();
        let (message, _) = test_utils::update_message(&client, Height::new(0, 20), 2000);
        client.verify_and_update(test_utils::NOW, &message).unwrap();

        let (conflicting, _) = test_utils::update_message(&client, Height::new(0, 20), 2001);
        let res = client
            .verify_and_update(test_utils::NOW, &conflicting)
            .unwrap();
        assert_eq!(res, UpdateResult::Misbehaviour);
        assert!(client.client_state().is_frozen);

        // Every mutating call now fails terminally.
        let res = client.verify_and_update(test_utils::NOW, &message);
        assert!(matches!(res, Err(ZkClientError::FrozenClientState)));
    }

    #[test]
    fn non_advancing_timestamp_freezes_the_client() {
        let mut client = test_utils::client();
        // New height, but timestamp equal to the trusted one.
        let (message, _) =
            test_utils::update_message(&client, Height::new(0, 20), test_utils::GENESIS_TIMESTAMP);

        let res = client.verify_and_update(test_utils::NOW, &message).unwrap();
        assert_eq!(res, UpdateResult::Misbehaviour);
        assert!(client.client_state().is_frozen);
    }

    #[test]
    fn invalid_proof_cannot_freeze_the_client() {
        let mut client = test_utils::with_rejecting_verifier(test_utils::client());
        let (message, _) = test_utils::update_message(&client, Height::new(0, 20), 2000);

        let res = client.verify_and_update(test_utils::NOW, &message);
        assert!(matches!(res, Err(ZkClientError::ProofVerification(_))));
        assert!(!client.client_state().is_frozen);
    }

    #[test]
    fn rejects_wrong_verification_key() {
        let mut client = test_utils::client();
        let (_, output) = test_utils::update_message(&client, Height::new(0, 20), 2000);
        let message = test_utils::proof_message([0xde; 32], &output);

        let res = client.verify_and_update(test_utils::NOW, &message);
        assert!(matches!(
            res,
            Err(ZkClientError::VerificationKeyMismatch { .. })
        ));
    }

    #[test]
    fn rejects_proof_time_outside_drift() {
        let mut client = test_utils::client();
        let (_, mut output) = test_utils::update_message(&client, Height::new(0, 20), 2000);

        output.time = test_utils::NOW + 1;
        let message = test_utils::proof_message(UPDATE_VKEY, &output);
        let res = client.verify_and_update(test_utils::NOW, &message);
        assert!(matches!(res, Err(ZkClientError::ProofTimeOutOfRange { .. })));

        output.time = test_utils::NOW - test_utils::MAX_CLOCK_DRIFT - 1;
        let message = test_utils::proof_message(UPDATE_VKEY, &output);
        let res = client.verify_and_update(test_utils::NOW, &message);
        assert!(matches!(res, Err(ZkClientError::ProofTimeOutOfRange { .. })));
    }

    #[test]
    fn rejects_changed_trust_parameters() {
        let mut client = test_utils::client();
        let (_, mut output) = test_utils::update_message(&client, Height::new(0, 20), 2000);
        output.client_state.trusting_period += 1;

        let message = test_utils::proof_message(UPDATE_VKEY, &output);
        let res = client.verify_and_update(test_utils::NOW, &message);
        assert!(matches!(res, Err(ZkClientError::ClientStateMismatch)));
    }

    #[test]
    fn rejects_unknown_trusted_consensus_state() {
        let mut client = test_utils::client();
        let (_, mut output) = test_utils::update_message(&client, Height::new(0, 20), 2000);
        output.trusted_height = Height::new(0, 9999);

        let message = test_utils::proof_message(UPDATE_VKEY, &output);
        let res = client.verify_and_update(test_utils::NOW, &message);
        assert!(matches!(res, Err(ZkClientError::ConsensusStateNotFound(_))));
    }

    #[test]
    fn rejects_tampered_trusted_consensus_state() {
        let mut client = test_utils::client();
        let (_, mut output) = test_utils::update_message(&client, Height::new(0, 20), 2000);
        output.trusted_consensus_state.root[0] ^= 0xff;

        let message = test_utils::proof_message(UPDATE_VKEY, &output);
        let res = client.verify_and_update(test_utils::NOW, &message);
        assert!(matches!(
            res,
            Err(ZkClientError::TrustedConsensusStateMismatch { .. })
        ));
    }
}
