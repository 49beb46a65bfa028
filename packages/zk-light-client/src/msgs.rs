//! Proof envelopes and the public-value layouts of the proven programs.

use borsh::{BorshDeserialize, BorshSerialize};
use ibc_lite_client_interface::Height;

use crate::client_state::{ClientState, ConsensusState};

/// Upper bound on key/value pairs accepted from one membership proof.
pub const MAX_KV_PAIRS: usize = 32;

/// A succinct proof together with the identifier of the program it was
/// generated for and that program's committed public values.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ZkProof {
    /// Verification key identifying the proven program
    pub vkey: [u8; 32],
    /// Canonical encoding of the program's public outputs
    pub public_values: Vec<u8>,
    /// Opaque proof bytes
    pub proof: Vec<u8>,
}

/// Verification keys of the programs this client accepts, fixed at
/// instantiation.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramVerificationKeys {
    /// Header-verification ("update client") program
    pub update_client: [u8; 32],
    /// Membership / non-membership program
    pub membership: [u8; 32],
    /// Combined update-and-membership program
    pub uc_and_membership: [u8; 32],
    /// Misbehaviour-detection program
    pub misbehaviour: [u8; 32],
}

/// Public values committed by the update-client program.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpdateClientOutput {
    /// Client state the proof was generated against
    pub client_state: ClientState,
    /// The consensus state the header was verified from
    pub trusted_consensus_state: ConsensusState,
    /// The newly verified consensus state
    pub new_consensus_state: ConsensusState,
    /// Prover wall-clock time, unix seconds
    pub time: u64,
    /// Height of the trusted consensus state
    pub trusted_height: Height,
    /// Height of the new consensus state
    pub new_height: Height,
}

/// Key-value pair proven against a commitment root; an empty value proves
/// non-membership.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct KvPair {
    /// Full path bytes, prefix included
    pub path: Vec<u8>,
    /// Value bound at the path; empty for non-membership
    pub value: Vec<u8>,
}

impl KvPair {
    /// Whether this pair proves absence rather than presence.
    #[must_use]
    pub fn is_non_membership(&self) -> bool {
        self.value.is_empty()
    }
}

/// Public values committed by the membership program.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct MembershipOutput {
    /// The consensus state whose root the pairs were proven against
    pub trusted_consensus_state: ConsensusState,
    /// The proven key/value pairs
    pub kv_pairs: Vec<KvPair>,
}

/// Public values committed by the combined update-and-membership program.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct UcAndMembershipOutput {
    /// Output of the embedded header verification
    pub update_output: UpdateClientOutput,
    /// Pairs proven against the *new* consensus state's root
    pub kv_pairs: Vec<KvPair>,
}

/// Public values committed by the misbehaviour program.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct MisbehaviourOutput {
    /// Client state the proof was generated against
    pub client_state: ClientState,
    /// Prover wall-clock time, unix seconds
    pub time: u64,
    /// Trusted height referenced by the first conflicting header
    pub trusted_height_1: Height,
    /// Trusted height referenced by the second conflicting header
    pub trusted_height_2: Height,
    /// Consensus state on record at `trusted_height_1`
    pub trusted_consensus_state_1: ConsensusState,
    /// Consensus state on record at `trusted_height_2`
    pub trusted_consensus_state_2: ConsensusState,
}

/// The proof shapes accepted by membership verification. A third shape,
/// the empty proof, never reaches decoding: it is served from the
/// execution-scoped cache.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum MembershipProof {
    /// Direct proof against an already-trusted consensus state
    Direct(ZkProof),
    /// Proof that advances the client and proves membership in one step
    UpdateAndMembership(ZkProof),
}
