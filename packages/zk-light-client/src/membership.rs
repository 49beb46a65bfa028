//! Membership and non-membership verification.
//!
//! Three proof shapes are accepted: a direct proof against a trusted
//! consensus state, a combined proof that advances the client and proves
//! membership against the newly established state, and the empty proof,
//! which serves a fact already verified earlier in the same execution from
//! the call-scoped cache.

use ibc_lite_client_interface::{
    msgs::flatten_path, CallContext, Height, MembershipMsg, NonMembershipMsg, ProofCache,
};

use crate::client::ZkLightClient;
use crate::error::ZkClientError;
use crate::msgs::{
    KvPair, MembershipOutput, MembershipProof, UcAndMembershipOutput, ZkProof, MAX_KV_PAIRS,
};
use crate::update::{classify, UpdateClassification};

fn check_kv_pairs(path: &[u8], value: &[u8], kv_pairs: &[KvPair]) -> Result<(), ZkClientError> {
    if kv_pairs.len() > MAX_KV_PAIRS {
        return Err(ZkClientError::TooManyKvPairs {
            count: kv_pairs.len(),
            max: MAX_KV_PAIRS,
        });
    }
    if !kv_pairs
        .iter()
        .any(|kv| kv.path == path && kv.value == value)
    {
        return Err(ZkClientError::KeyValuePairNotFound);
    }
    Ok(())
}

/// Batch caching: every pair of a multi-pair proof becomes servable by an
/// empty proof for the rest of this execution.
fn cache_kv_pairs(cache: &mut ProofCache, height: Height, kv_pairs: Vec<KvPair>, timestamp: u64) {
    if kv_pairs.len() > 1 {
        for kv in kv_pairs {
            cache.insert(height, kv.path, kv.value, timestamp);
        }
    }
}

impl ZkLightClient {
    /// Verifies that `msg.value` is bound to `msg.path` at
    /// `msg.proof_height` and returns the trusted timestamp there.
    ///
    /// # Errors
    /// Fails if the client is frozen, the value is empty, or the proof does
    /// not establish the pair.
    pub fn membership(
        &mut self,
        ctx: &mut CallContext,
        msg: MembershipMsg,
    ) -> Result<u64, ZkClientError> {
        if msg.value.is_empty() {
            return Err(ZkClientError::InvalidValue {
                reason: "membership requires a non-empty value",
            });
        }
        self.verify_kv(ctx, msg.proof_height, &msg.path, msg.value, &msg.proof)
    }

    /// Verifies that nothing is bound to `msg.path` at `msg.proof_height`
    /// and returns the trusted timestamp there.
    ///
    /// # Errors
    /// Fails if the client is frozen or the proof does not establish the
    /// absence.
    pub fn non_membership(
        &mut self,
        ctx: &mut CallContext,
        msg: NonMembershipMsg,
    ) -> Result<u64, ZkClientError> {
        self.verify_kv(ctx, msg.proof_height, &msg.path, Vec::new(), &msg.proof)
    }

    fn verify_kv(
        &mut self,
        ctx: &mut CallContext,
        height: Height,
        path_segments: &[Vec<u8>],
        value: Vec<u8>,
        proof_bytes: &[u8],
    ) -> Result<u64, ZkClientError> {
        self.ensure_active()?;

        let path = flatten_path(path_segments);

        if proof_bytes.is_empty() {
            return ctx
                .cache
                .get(height, &path, &value)
                .ok_or(ZkClientError::KeyValuePairNotInCache);
        }

        let proof: MembershipProof = borsh::from_slice(proof_bytes)?;
        match proof {
            MembershipProof::Direct(zk) => self.direct_membership(ctx, height, &path, &value, &zk),
            MembershipProof::UpdateAndMembership(zk) => {
                self.update_and_membership(ctx, height, &path, &value, &zk)
            }
        }
    }

    fn direct_membership(
        &mut self,
        ctx: &mut CallContext,
        height: Height,
        path: &[u8],
        value: &[u8],
        proof: &ZkProof,
    ) -> Result<u64, ZkClientError> {
        self.check_vkey(self.vkeys.membership, proof.vkey)?;

        let output: MembershipOutput = borsh::from_slice(&proof.public_values)?;
        self.validate_trusted_consensus(height, &output.trusted_consensus_state)?;
        check_kv_pairs(path, value, &output.kv_pairs)?;

        self.verifier
            .verify(&proof.vkey, &proof.public_values, &proof.proof)?;

        let timestamp = output.trusted_consensus_state.timestamp;
        cache_kv_pairs(&mut ctx.cache, height, output.kv_pairs, timestamp);
        Ok(timestamp)
    }

    fn update_and_membership(
        &mut self,
        ctx: &mut CallContext,
        height: Height,
        path: &[u8],
        value: &[u8],
        proof: &ZkProof,
    ) -> Result<u64, ZkClientError> {
        self.check_vkey(self.vkeys.uc_and_membership, proof.vkey)?;

        let output: UcAndMembershipOutput = borsh::from_slice(&proof.public_values)?;
        let update = &output.update_output;

        if update.new_height != height {
            return Err(ZkClientError::ProofHeightMismatch {
                expected: height,
                actual: update.new_height,
            });
        }

        self.validate_update_output(update, ctx.now)?;

        let proposed_hash = update.new_consensus_state.hash();
        let classification = classify(
            self.consensus_state_hash(update.new_height),
            proposed_hash,
            update.new_consensus_state.timestamp,
            update.trusted_consensus_state.timestamp,
        );
        if classification == UpdateClassification::Misbehaviour {
            return Err(ZkClientError::MisbehaviourInMembershipProof);
        }

        check_kv_pairs(path, value, &output.kv_pairs)?;

        // The membership facts come out of this proof, so it is verified
        // even when the embedded update is a no-op.
        self.verifier
            .verify(&proof.vkey, &proof.public_values, &proof.proof)?;

        let timestamp = update.new_consensus_state.timestamp;
        if classification == UpdateClassification::Update {
            self.record_consensus(update.new_height, proposed_hash, timestamp);
            tracing::info!(height = %update.new_height, "client advanced by combined proof");
        }

        cache_kv_pairs(&mut ctx.cache, height, output.kv_pairs, timestamp);
        Ok(timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;
    use ibc_lite_client_interface::LightClient;

    fn kv(path: &[u8], value: &[u8]) -> KvPair {
        KvPair {
            path: path.to_vec(),
            value: value.to_vec(),
        }
    }

    fn msg_for(
        height: Height,
        proof: Vec<u8>,
        path_tail: &[u8],
        value: &[u8],
    ) -> MembershipMsg {
        MembershipMsg {
            proof_height: height,
            proof,
            path: vec![b"ibc".to_vec(), path_tail.to_vec()],
            value: value.to_vec(),
        }
    }

    #[test]
    fn direct_membership_returns_trusted_timestamp() {
        let mut client = test_utils::client();
        let consensus = test_utils::consensus_state(test_utils::GENESIS_TIMESTAMP);
        let proof = test_utils::membership_message(&consensus, vec![kv(b"ibck1", b"v1")]);

        let mut ctx = CallContext::new(test_utils::NOW);
        let ts = client
            .membership(&mut ctx, msg_for(test_utils::GENESIS_HEIGHT, proof, b"k1", b"v1"))
            .unwrap();
        assert_eq!(ts, test_utils::GENESIS_TIMESTAMP);
    }

    #[test]
    fn membership_rejects_empty_value() {
        let mut client = test_utils::client();
        let mut ctx = CallContext::new(test_utils::NOW);
        let res = client.membership(
            &mut ctx,
            msg_for(test_utils::GENESIS_HEIGHT, vec![], b"k1", b""),
        );
        assert!(matches!(res, Err(ZkClientError::InvalidValue { .. })));
    }

    #[test]
    fn membership_fails_without_consensus_state() {
        let mut client = test_utils::client();
        let consensus = test_utils::consensus_state(test_utils::GENESIS_TIMESTAMP);
        let proof = test_utils::membership_message(&consensus, vec![kv(b"ibck1", b"v1")]);

        let mut ctx = CallContext::new(test_utils::NOW);
        let res = client.membership(&mut ctx, msg_for(Height::new(0, 77), proof, b"k1", b"v1"));
        assert!(matches!(res, Err(ZkClientError::ConsensusStateNotFound(_))));
    }

    #[test]
    fn membership_fails_when_pair_not_proven() {
        let mut client = test_utils::client();
        let consensus = test_utils::consensus_state(test_utils::GENESIS_TIMESTAMP);
        let proof = test_utils::membership_message(&consensus, vec![kv(b"ibck1", b"v1")]);

        let mut ctx = CallContext::new(test_utils::NOW);
        let res = client.membership(
            &mut ctx,
            msg_for(test_utils::GENESIS_HEIGHT, proof, b"k1", b"other"),
        );
        assert!(matches!(res, Err(ZkClientError::KeyValuePairNotFound)));
    }

    #[test]
    fn membership_rejects_unbounded_pair_lists() {
        let mut client = test_utils::client();
        let consensus = test_utils::consensus_state(test_utils::GENESIS_TIMESTAMP);
        let pairs = (0..=MAX_KV_PAIRS)
            .map(|i| kv(format!("ibck{i}").as_bytes(), b"v"))
            .collect();
        let proof = test_utils::membership_message(&consensus, pairs);

        let mut ctx = CallContext::new(test_utils::NOW);
        let res = client.membership(
            &mut ctx,
            msg_for(test_utils::GENESIS_HEIGHT, proof, b"k0", b"v"),
        );
        assert!(matches!(res, Err(ZkClientError::TooManyKvPairs { .. })));
    }

    #[test]
    fn multi_pair_proof_populates_the_cache() {
        let mut client = test_utils::client();

        // Advance to height 50 so the scenario runs against a non-genesis state.
        let (update, _) = test_utils::update_message(&client, Height::new(0, 50), 2000);
        client.verify_and_update(test_utils::NOW, &update).unwrap();

        let consensus = test_utils::consensus_state(2000);
        let pairs = vec![kv(b"ibck1", b"v1"), kv(b"ibck2", b"v2"), kv(b"ibck3", b"v3")];
        let proof = test_utils::membership_message(&consensus, pairs);

        let mut ctx = CallContext::new(test_utils::NOW);
        let height = Height::new(0, 50);
        client
            .membership(&mut ctx, msg_for(height, proof, b"k2", b"v2"))
            .unwrap();
        assert_eq!(ctx.cache.len(), 3);

        // Later calls in the same execution use empty proofs.
        let ts = client
            .membership(&mut ctx, msg_for(height, vec![], b"k3", b"v3"))
            .unwrap();
        assert_eq!(ts, 2000);

        // A path never verified in this execution is a hard failure.
        let res = client.membership(&mut ctx, msg_for(height, vec![], b"k9", b"v9"));
        assert!(matches!(res, Err(ZkClientError::KeyValuePairNotInCache)));
    }

    #[test]
    fn single_pair_proof_is_not_cached() {
        let mut client = test_utils::client();
        let consensus = test_utils::consensus_state(test_utils::GENESIS_TIMESTAMP);
        let proof = test_utils::membership_message(&consensus, vec![kv(b"ibck1", b"v1")]);

        let mut ctx = CallContext::new(test_utils::NOW);
        client
            .membership(&mut ctx, msg_for(test_utils::GENESIS_HEIGHT, proof, b"k1", b"v1"))
            .unwrap();
        assert!(ctx.cache.is_empty());
    }

    #[test]
    fn cache_does_not_survive_into_a_new_context() {
        let mut client = test_utils::client();
        let consensus = test_utils::consensus_state(test_utils::GENESIS_TIMESTAMP);
        let pairs = vec![kv(b"ibck1", b"v1"), kv(b"ibck2", b"v2")];
        let proof = test_utils::membership_message(&consensus, pairs);

        let mut ctx = CallContext::new(test_utils::NOW);
        client
            .membership(&mut ctx, msg_for(test_utils::GENESIS_HEIGHT, proof, b"k1", b"v1"))
            .unwrap();

        let mut fresh_ctx = CallContext::new(test_utils::NOW);
        let res = client.membership(
            &mut fresh_ctx,
            msg_for(test_utils::GENESIS_HEIGHT, vec![], b"k2", b"v2"),
        );
        assert!(matches!(res, Err(ZkClientError::KeyValuePairNotInCache)));
    }

    #[test]
    fn non_membership_proves_absence_with_empty_value() {
        let mut client = test_utils::client();
        let consensus = test_utils::consensus_state(test_utils::GENESIS_TIMESTAMP);
        let proof = test_utils::membership_message(&consensus, vec![kv(b"ibcreceipt", b"")]);

        let mut ctx = CallContext::new(test_utils::NOW);
        let ts = client
            .non_membership(
                &mut ctx,
                NonMembershipMsg {
                    proof_height: test_utils::GENESIS_HEIGHT,
                    proof,
                    path: vec![b"ibc".to_vec(), b"receipt".to_vec()],
                },
            )
            .unwrap();
        assert_eq!(ts, test_utils::GENESIS_TIMESTAMP);
    }

    #[test]
    fn combined_proof_advances_client_and_proves_membership() {
        let mut client = test_utils::client();
        let target = Height::new(0, 60);
        let (_, update_output) = test_utils::update_message(&client, target, 3000);
        let proof = test_utils::uc_membership_message(
            &update_output,
            vec![kv(b"ibck1", b"v1"), kv(b"ibck2", b"v2")],
        );

        let mut ctx = CallContext::new(test_utils::NOW);
        let ts = client
            .membership(&mut ctx, msg_for(target, proof, b"k1", b"v1"))
            .unwrap();
        assert_eq!(ts, 3000);
        assert_eq!(client.latest_height(), target);
        assert_eq!(ctx.cache.len(), 2);
    }

    #[test]
    fn combined_proof_rejects_height_mismatch() {
        let mut client = test_utils::client();
        let (_, update_output) = test_utils::update_message(&client, Height::new(0, 60), 3000);
        let proof = test_utils::uc_membership_message(&update_output, vec![kv(b"ibck1", b"v1")]);

        let mut ctx = CallContext::new(test_utils::NOW);
        let res = client.membership(&mut ctx, msg_for(Height::new(0, 61), proof, b"k1", b"v1"));
        assert!(matches!(res, Err(ZkClientError::ProofHeightMismatch { .. })));
    }

    #[test]
    fn combined_proof_refuses_to_act_on_misbehaviour() {
        let mut client = test_utils::client();
        let (update, _) = test_utils::update_message(&client, Height::new(0, 60), 3000);
        client.verify_and_update(test_utils::NOW, &update).unwrap();

        // Conflicting consensus state for the now-recorded height 60.
        let (_, conflicting) = test_utils::update_message(&client, Height::new(0, 60), 3001);
        let proof = test_utils::uc_membership_message(&conflicting, vec![kv(b"ibck1", b"v1")]);

        let mut ctx = CallContext::new(test_utils::NOW);
        let res = client.membership(&mut ctx, msg_for(Height::new(0, 60), proof, b"k1", b"v1"));
        assert!(matches!(
            res,
            Err(ZkClientError::MisbehaviourInMembershipProof)
        ));
        assert!(!client.client_state().is_frozen);
    }

    #[test]
    fn frozen_client_rejects_membership() {
        let mut client = test_utils::frozen_client();
        let consensus = test_utils::consensus_state(test_utils::GENESIS_TIMESTAMP);
        let proof = test_utils::membership_message(&consensus, vec![kv(b"ibck1", b"v1")]);

        let mut ctx = CallContext::new(test_utils::NOW);
        let res = client.membership(
            &mut ctx,
            msg_for(test_utils::GENESIS_HEIGHT, proof, b"k1", b"v1"),
        );
        assert!(matches!(res, Err(ZkClientError::FrozenClientState)));
    }

    #[test]
    fn membership_rejects_wrong_program_key() {
        let mut client = test_utils::client();
        let consensus = test_utils::consensus_state(test_utils::GENESIS_TIMESTAMP);
        let output = MembershipOutput {
            trusted_consensus_state: consensus,
            kv_pairs: vec![kv(b"ibck1", b"v1")],
        };
        let zk = ZkProof {
            vkey: [0xde; 32],
            public_values: borsh::to_vec(&output).unwrap(),
            proof: b"proof".to_vec(),
        };
        let proof = borsh::to_vec(&MembershipProof::Direct(zk)).unwrap();

        let mut ctx = CallContext::new(test_utils::NOW);
        let res = client.membership(
            &mut ctx,
            msg_for(test_utils::GENESIS_HEIGHT, proof, b"k1", b"v1"),
        );
        assert!(matches!(
            res,
            Err(ZkClientError::VerificationKeyMismatch { .. })
        ));
    }
}
