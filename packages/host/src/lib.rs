#![doc = "Host-level types for ibc-lite: packets, commitment paths and the commitment store"]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod error;
pub mod ics24;
pub mod packet;
pub mod store;

pub use error::HostError;
pub use packet::{Packet, Payload};
pub use store::CommitmentStore;
