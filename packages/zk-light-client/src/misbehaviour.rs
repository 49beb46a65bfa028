//! Misbehaviour proof verification.

use crate::client::ZkLightClient;
use crate::error::ZkClientError;
use crate::msgs::{MisbehaviourOutput, ZkProof};

impl ZkLightClient {
    /// Verifies a misbehaviour proof and freezes the client on success.
    ///
    /// Both trusted consensus states referenced by the conflicting headers
    /// must be on record; the prover takes them as inputs without state of
    /// its own, so the verifier has to anchor them before accepting the
    /// evidence.
    ///
    /// # Errors
    /// Fails without mutating state if the client is already frozen, the
    /// envelope is malformed, the referenced records are missing, or the
    /// proof is invalid.
    pub fn verify_misbehaviour(
        &mut self,
        now: u64,
        misbehaviour_message: &[u8],
    ) -> Result<(), ZkClientError> {
        self.ensure_active()?;

        let proof: ZkProof = borsh::from_slice(misbehaviour_message)?;
        self.check_vkey(self.vkeys.misbehaviour, proof.vkey)?;

        let output: MisbehaviourOutput = borsh::from_slice(&proof.public_values)?;
        self.validate_proof_time(output.time, now)?;

        if !self
            .client_state
            .matches_trust_parameters(&output.client_state)
        {
            return Err(ZkClientError::ClientStateMismatch);
        }

        self.validate_trusted_consensus(
            output.trusted_height_1,
            &output.trusted_consensus_state_1,
        )?;
        self.validate_trusted_consensus(
            output.trusted_height_2,
            &output.trusted_consensus_state_2,
        )?;

        self.verifier
            .verify(&proof.vkey, &proof.public_values, &proof.proof)?;

        self.freeze();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;
    use ibc_lite_client_interface::Height;

    #[test]
    fn valid_misbehaviour_freezes_the_client() {
        let mut client = test_utils::client();
        let (update, _) = test_utils::update_message(&client, Height::new(0, 20), 2000);
        client.verify_and_update(test_utils::NOW, &update).unwrap();

        let message = test_utils::misbehaviour_message(
            &client,
            test_utils::GENESIS_HEIGHT,
            Height::new(0, 20),
        );
        client
            .verify_misbehaviour(test_utils::NOW, &message)
            .unwrap();
        assert!(client.client_state().is_frozen);

        // Once frozen, even valid evidence is rejected terminally.
        let res = client.verify_misbehaviour(test_utils::NOW, &message);
        assert!(matches!(res, Err(ZkClientError::FrozenClientState)));
    }

    #[test]
    fn misbehaviour_requires_both_records_on_file() {
        let mut client = test_utils::client();
        let message = test_utils::misbehaviour_message(
            &client,
            test_utils::GENESIS_HEIGHT,
            Height::new(0, 20),
        );

        let res = client.verify_misbehaviour(test_utils::NOW, &message);
        assert!(matches!(res, Err(ZkClientError::ConsensusStateNotFound(_))));
        assert!(!client.client_state().is_frozen);
    }

    #[test]
    fn invalid_proof_does_not_freeze() {
        let mut client = test_utils::client();
        let (update, _) = test_utils::update_message(&client, Height::new(0, 20), 2000);
        client.verify_and_update(test_utils::NOW, &update).unwrap();

        let mut client = test_utils::with_rejecting_verifier(client);
        let message = test_utils::misbehaviour_message(
            &client,
            test_utils::GENESIS_HEIGHT,
            Height::new(0, 20),
        );
        let res = client.verify_misbehaviour(test_utils::NOW, &message);
        assert!(matches!(res, Err(ZkClientError::ProofVerification(_))));
        assert!(!client.client_state().is_frozen);
    }

    #[test]
    fn misbehaviour_rejects_wrong_program_key() {
        let mut client = test_utils::client();
        let (update, _) = test_utils::update_message(&client, Height::new(0, 20), 2000);
        client.verify_and_update(test_utils::NOW, &update).unwrap();

        let message = test_utils::misbehaviour_message_with_vkey(
            &client,
            test_utils::GENESIS_HEIGHT,
            Height::new(0, 20),
            [0xde; 32],
        );
        let res = client.verify_misbehaviour(test_utils::NOW, &message);
        assert!(matches!(
            res,
            Err(ZkClientError::VerificationKeyMismatch { .. })
        ));
    }
}
