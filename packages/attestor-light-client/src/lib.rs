#![doc = "Light client trusting an m-of-n off-chain attestor quorum"]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]
#![cfg_attr(
    any(test, feature = "test-utils"),
    allow(clippy::borrow_interior_mutable_const, clippy::declare_interior_mutable_const)
)]

pub mod attestation;
pub mod client;
pub mod client_state;
pub mod error;
pub mod header;
pub mod membership;
pub mod update;
pub mod verify;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::AttestorLightClient;
pub use client_state::{ClientState, ConsensusState};
pub use error::AttestorClientError;
pub use header::Header;
