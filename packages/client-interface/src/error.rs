//! The error surface light clients expose to the router.

use thiserror::Error;

use crate::height::Height;

/// Errors surfaced through the [`crate::LightClient`] trait.
///
/// Strategy crates keep their own richer error enums and map into this one
/// at the trait boundary; the original cause is preserved as a source.
#[derive(Error, Debug)]
pub enum LightClientError {
    /// The client observed misbehaviour and no longer mutates
    #[error("client is frozen")]
    FrozenClientState,

    /// The strategy deliberately does not implement this capability
    #[error("{feature} is not supported by this client")]
    UnsupportedFeature {
        /// Name of the missing capability
        feature: &'static str,
    },

    /// No consensus state is recorded at the height
    #[error("no consensus state recorded at height {0}")]
    ConsensusStateNotFound(Height),

    /// An empty proof referenced a fact this execution never verified
    #[error("key/value pair not found in proof cache")]
    KeyValuePairNotInCache,

    /// Strategy-specific verification failure
    #[error("verification failed: {0}")]
    Verification(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The host-delegated verification capability failed
    #[error("host verifier: {0}")]
    Host(String),
}

impl LightClientError {
    /// Wraps a strategy-specific error as a verification failure.
    pub fn verification<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Verification(Box::new(err))
    }
}
