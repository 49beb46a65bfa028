//! Error types for host-level operations

use thiserror::Error;

/// Errors from commitment paths and the commitment store.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HostError {
    /// An entry already exists at the path
    #[error("commitment already exists at path")]
    AlreadyExists,

    /// No entry exists at the path
    #[error("commitment not found at path")]
    NotFound,

    /// The stored value differs from the expected value
    #[error("commitment mismatch at path")]
    Mismatch,

    /// Ack commitment over an empty ack list
    #[error("no acknowledgements provided")]
    NoAcknowledgements,

    /// Merkle prefix with no elements
    #[error("empty merkle prefix")]
    EmptyMerklePrefix,

    /// Packet could not be canonically encoded
    #[error("failed to serialize packet")]
    PacketSerialization,
}
