//! Shared fixtures for ZK light client tests.

use borsh::BorshSerialize;
use ibc_lite_client_interface::Height;
use sha2::{Digest, Sha256};

use crate::client::ZkLightClient;
use crate::client_state::{ClientState, ConsensusState, TrustThreshold};
use crate::msgs::{
    KvPair, MembershipOutput, MembershipProof, MisbehaviourOutput, ProgramVerificationKeys,
    UcAndMembershipOutput, UpdateClientOutput, ZkProof,
};
use crate::verifier::{ProofVerifier, ProofVerifyError};

/// Host time used across the fixtures.
pub const NOW: u64 = 10_000;
/// Allowed clock drift of the fixture client.
pub const MAX_CLOCK_DRIFT: u64 = 15;
/// Height of the genesis consensus state.
pub const GENESIS_HEIGHT: Height = Height::new(0, 10);
/// Timestamp of the genesis consensus state.
pub const GENESIS_TIMESTAMP: u64 = 1000;

/// Verification key of the update-client program.
pub const UPDATE_VKEY: [u8; 32] = [1; 32];
/// Verification key of the membership program.
pub const MEMBERSHIP_VKEY: [u8; 32] = [2; 32];
/// Verification key of the combined update-and-membership program.
pub const UC_MEMBERSHIP_VKEY: [u8; 32] = [3; 32];
/// Verification key of the misbehaviour program.
pub const MISBEHAVIOUR_VKEY: [u8; 32] = [4; 32];

/// A proof backend that either accepts or rejects everything.
#[derive(Clone, Copy, Debug)]
pub struct MockVerifier {
    accept: bool,
}

impl MockVerifier {
    /// A backend that accepts every proof.
    #[must_use]
    pub const fn accepting() -> Self {
        Self { accept: true }
    }

    /// A backend that rejects every proof.
    #[must_use]
    pub const fn rejecting() -> Self {
        Self { accept: false }
    }
}

impl ProofVerifier for MockVerifier {
    fn verify(
        &self,
        vkey: &[u8; 32],
        _public_values: &[u8],
        _proof: &[u8],
    ) -> Result<(), ProofVerifyError> {
        if self.accept {
            Ok(())
        } else {
            Err(ProofVerifyError::new(vkey))
        }
    }
}

/// The fixture program keys.
#[must_use]
pub const fn vkeys() -> ProgramVerificationKeys {
    ProgramVerificationKeys {
        update_client: UPDATE_VKEY,
        membership: MEMBERSHIP_VKEY,
        uc_and_membership: UC_MEMBERSHIP_VKEY,
        misbehaviour: MISBEHAVIOUR_VKEY,
    }
}

/// A fresh fixture client state at the genesis height.
#[must_use]
pub fn client_state() -> ClientState {
    ClientState {
        chain_id: "testchain-1".to_string(),
        trust_level: TrustThreshold {
            numerator: 1,
            denominator: 3,
        },
        trusting_period: 1_209_600,
        unbonding_period: 1_814_400,
        max_clock_drift: MAX_CLOCK_DRIFT,
        latest_height: GENESIS_HEIGHT,
        is_frozen: false,
    }
}

/// A deterministic consensus state for `timestamp`.
#[must_use]
pub fn consensus_state(timestamp: u64) -> ConsensusState {
    ConsensusState {
        timestamp,
        root: Sha256::digest(timestamp.to_be_bytes()).into(),
        next_validators_hash: [0x22; 32],
    }
}

/// A fresh client with an accepting proof backend.
///
/// # Panics
/// Panics if the fixture configuration is rejected.
#[must_use]
pub fn client() -> ZkLightClient {
    ZkLightClient::new(
        client_state(),
        &consensus_state(GENESIS_TIMESTAMP),
        vkeys(),
        Box::new(MockVerifier::accepting()),
    )
    .expect("fixture client state is valid")
}

/// A client frozen by force, for terminal-state tests.
#[must_use]
pub fn frozen_client() -> ZkLightClient {
    let mut client = client();
    client.client_state.is_frozen = true;
    client
}

/// Swaps in a rejecting proof backend.
#[must_use]
pub fn with_rejecting_verifier(mut client: ZkLightClient) -> ZkLightClient {
    client.verifier = Box::new(MockVerifier::rejecting());
    client
}

/// Builds an update output from the genesis trusted state.
#[must_use]
pub fn update_output(
    trusted: ConsensusState,
    new: ConsensusState,
    trusted_height: Height,
    new_height: Height,
    time: u64,
) -> UpdateClientOutput {
    UpdateClientOutput {
        client_state: client_state(),
        trusted_consensus_state: trusted,
        new_consensus_state: new,
        time,
        trusted_height,
        new_height,
    }
}

/// Encodes `output` into a proof envelope under `vkey`.
///
/// # Panics
/// Panics if encoding fails.
#[must_use]
pub fn proof_message<T: BorshSerialize>(vkey: [u8; 32], output: &T) -> Vec<u8> {
    let envelope = ZkProof {
        vkey,
        public_values: borsh::to_vec(output).expect("fixture output encodes"),
        proof: b"proof".to_vec(),
    };
    borsh::to_vec(&envelope).expect("fixture envelope encodes")
}

/// Builds an update message advancing `client` to `new_height` with a new
/// consensus timestamp, trusted from the genesis state.
#[must_use]
pub fn update_message(
    client: &ZkLightClient,
    new_height: Height,
    new_timestamp: u64,
) -> (Vec<u8>, UpdateClientOutput) {
    let output = UpdateClientOutput {
        client_state: client.client_state().clone(),
        trusted_consensus_state: consensus_state(GENESIS_TIMESTAMP),
        new_consensus_state: consensus_state(new_timestamp),
        time: NOW - 1,
        trusted_height: GENESIS_HEIGHT,
        new_height,
    };
    (proof_message(UPDATE_VKEY, &output), output)
}

/// Builds a direct membership proof message over `kv_pairs`.
///
/// # Panics
/// Panics if encoding fails.
#[must_use]
pub fn membership_message(trusted: &ConsensusState, kv_pairs: Vec<KvPair>) -> Vec<u8> {
    let output = MembershipOutput {
        trusted_consensus_state: trusted.clone(),
        kv_pairs,
    };
    let zk = ZkProof {
        vkey: MEMBERSHIP_VKEY,
        public_values: borsh::to_vec(&output).expect("fixture output encodes"),
        proof: b"proof".to_vec(),
    };
    borsh::to_vec(&MembershipProof::Direct(zk)).expect("fixture proof encodes")
}

/// Builds a combined update-and-membership proof message.
///
/// # Panics
/// Panics if encoding fails.
#[must_use]
pub fn uc_membership_message(update: &UpdateClientOutput, kv_pairs: Vec<KvPair>) -> Vec<u8> {
    let output = UcAndMembershipOutput {
        update_output: update.clone(),
        kv_pairs,
    };
    let zk = ZkProof {
        vkey: UC_MEMBERSHIP_VKEY,
        public_values: borsh::to_vec(&output).expect("fixture output encodes"),
        proof: b"proof".to_vec(),
    };
    borsh::to_vec(&MembershipProof::UpdateAndMembership(zk)).expect("fixture proof encodes")
}

/// Builds a misbehaviour message referencing two recorded heights. The
/// fixture convention ties a height to timestamp `revision_height * 100`.
#[must_use]
pub fn misbehaviour_message(client: &ZkLightClient, height_1: Height, height_2: Height) -> Vec<u8> {
    misbehaviour_message_with_vkey(client, height_1, height_2, MISBEHAVIOUR_VKEY)
}

/// Same as [`misbehaviour_message`] with an explicit program key.
#[must_use]
pub fn misbehaviour_message_with_vkey(
    client: &ZkLightClient,
    height_1: Height,
    height_2: Height,
    vkey: [u8; 32],
) -> Vec<u8> {
    let output = MisbehaviourOutput {
        client_state: client.client_state().clone(),
        time: NOW - 1,
        trusted_height_1: height_1,
        trusted_height_2: height_2,
        trusted_consensus_state_1: consensus_state(height_1.revision_height * 100),
        trusted_consensus_state_2: consensus_state(height_2.revision_height * 100),
    };
    proof_message(vkey, &output)
}
