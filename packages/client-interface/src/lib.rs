#![doc = "The light client capability set shared by all ibc-lite client implementations"]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod context;
pub mod error;
pub mod height;
pub mod msgs;

pub use context::{CallContext, ProofCache};
pub use error::LightClientError;
pub use height::Height;
pub use msgs::{ClientStatus, MembershipMsg, NonMembershipMsg, UpdateResult};

/// The capability set every light client strategy exposes to the router.
///
/// Strategies are selected at registration time by the client registry and
/// addressed through this trait only; the registry never interprets their
/// message payloads.
pub trait LightClient {
    /// Short identifier of the strategy, used to allocate client ids.
    fn client_type(&self) -> &'static str;

    /// The latest verified height.
    fn latest_height(&self) -> Height;

    /// Whether the client is active or frozen. Available when frozen.
    fn status(&self) -> ClientStatus;

    /// The trusted timestamp (unix seconds) recorded at `height`.
    ///
    /// # Errors
    /// Fails if no consensus state is recorded at `height`.
    fn timestamp_at_height(&self, height: Height) -> Result<u64, LightClientError>;

    /// Verifies `client_message` and applies the resulting consensus state,
    /// freeze, or no-op.
    ///
    /// # Errors
    /// Fails if the client is frozen or the message does not verify.
    fn update_client(
        &mut self,
        ctx: &mut CallContext,
        client_message: &[u8],
    ) -> Result<UpdateResult, LightClientError>;

    /// Verifies that `msg.value` is bound to `msg.path` in the remote
    /// ledger's state at `msg.proof_height`. Returns the trusted timestamp
    /// at that height.
    ///
    /// # Errors
    /// Fails if the proof does not verify against a trusted consensus state.
    fn verify_membership(
        &mut self,
        ctx: &mut CallContext,
        msg: MembershipMsg,
    ) -> Result<u64, LightClientError>;

    /// Verifies that nothing is bound to `msg.path` at `msg.proof_height`.
    /// Returns the trusted timestamp at that height.
    ///
    /// # Errors
    /// Fails if the proof does not verify, or the strategy does not support
    /// exclusion proofs.
    fn verify_non_membership(
        &mut self,
        ctx: &mut CallContext,
        msg: NonMembershipMsg,
    ) -> Result<u64, LightClientError>;

    /// Verifies misbehaviour evidence and freezes the client on success.
    ///
    /// # Errors
    /// Fails if the evidence does not verify, or the strategy does not
    /// support fault attribution.
    fn submit_misbehaviour(
        &mut self,
        ctx: &mut CallContext,
        misbehaviour_message: &[u8],
    ) -> Result<(), LightClientError>;

    /// Migrates the client to a new state following a planned upgrade of
    /// the remote ledger.
    ///
    /// # Errors
    /// Fails if the upgrade does not verify, or the strategy does not
    /// support upgrades.
    fn upgrade_client(
        &mut self,
        ctx: &mut CallContext,
        upgrade_message: &[u8],
    ) -> Result<(), LightClientError>;
}
