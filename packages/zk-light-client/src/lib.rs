#![doc = "Light client verifying succinct proofs of a BFT ledger's header-verification program"]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod client;
pub mod client_state;
pub mod error;
pub mod membership;
pub mod misbehaviour;
pub mod msgs;
pub mod update;
pub mod verifier;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::ZkLightClient;
pub use client_state::{ClientState, ConsensusState, TrustThreshold};
pub use error::ZkClientError;
pub use msgs::{MembershipProof, ProgramVerificationKeys, ZkProof};
pub use verifier::ProofVerifier;
