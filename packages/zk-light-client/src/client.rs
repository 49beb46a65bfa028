//! The ZK-proof light client instance.

use std::collections::BTreeMap;

use ibc_lite_client_interface::{
    CallContext, ClientStatus, Height, LightClient, LightClientError, MembershipMsg,
    NonMembershipMsg, UpdateResult,
};

use crate::client_state::{ClientState, ConsensusState};
use crate::error::ZkClientError;
use crate::msgs::ProgramVerificationKeys;
use crate::verifier::ProofVerifier;

/// A light client that trusts a succinct-proof system to have executed the
/// remote ledger's header-verification program correctly.
pub struct ZkLightClient {
    pub(crate) client_state: ClientState,
    /// Consensus states, stored as the hash of their canonical encoding.
    pub(crate) consensus_hashes: BTreeMap<Height, [u8; 32]>,
    /// Trusted timestamps per verified height, for timeout queries.
    pub(crate) timestamps: BTreeMap<Height, u64>,
    pub(crate) vkeys: ProgramVerificationKeys,
    pub(crate) verifier: Box<dyn ProofVerifier + Send + Sync>,
}

impl ZkLightClient {
    /// Instantiates a client from its initial state and the verification
    /// keys of the programs it will accept.
    ///
    /// # Errors
    /// Returns [`ZkClientError::InvalidConfiguration`] on malformed initial
    /// state; no partially constructed client is observable.
    pub fn new(
        client_state: ClientState,
        consensus_state: &ConsensusState,
        vkeys: ProgramVerificationKeys,
        verifier: Box<dyn ProofVerifier + Send + Sync>,
    ) -> Result<Self, ZkClientError> {
        Self::validate_config(&client_state)?;

        let mut consensus_hashes = BTreeMap::new();
        let mut timestamps = BTreeMap::new();
        consensus_hashes.insert(client_state.latest_height, consensus_state.hash());
        timestamps.insert(client_state.latest_height, consensus_state.timestamp);

        Ok(Self {
            client_state,
            consensus_hashes,
            timestamps,
            vkeys,
            verifier,
        })
    }

    fn validate_config(client_state: &ClientState) -> Result<(), ZkClientError> {
        let invalid = |reason: &str| ZkClientError::InvalidConfiguration {
            reason: reason.to_string(),
        };

        if client_state.chain_id.is_empty() {
            return Err(invalid("empty chain id"));
        }
        if client_state.trust_level.denominator == 0
            || client_state.trust_level.numerator == 0
            || client_state.trust_level.numerator > client_state.trust_level.denominator
        {
            return Err(invalid("trust level must be a fraction in (0, 1]"));
        }
        if client_state.trusting_period == 0 {
            return Err(invalid("trusting period must be non-zero"));
        }
        if client_state.trusting_period > client_state.unbonding_period {
            return Err(invalid("trusting period cannot exceed unbonding period"));
        }
        if client_state.is_frozen {
            return Err(invalid("initial client state cannot be frozen"));
        }
        Ok(())
    }

    /// The stored client state.
    #[must_use]
    pub const fn client_state(&self) -> &ClientState {
        &self.client_state
    }

    /// The stored consensus-state hash at `height`, if any.
    #[must_use]
    pub fn consensus_state_hash(&self, height: Height) -> Option<[u8; 32]> {
        self.consensus_hashes.get(&height).copied()
    }

    pub(crate) fn ensure_active(&self) -> Result<(), ZkClientError> {
        if self.client_state.is_frozen {
            return Err(ZkClientError::FrozenClientState);
        }
        Ok(())
    }

    /// Checks that the prover's wall-clock time falls in
    /// `[now - max_clock_drift, now]`.
    pub(crate) fn validate_proof_time(&self, time: u64, now: u64) -> Result<(), ZkClientError> {
        if time > now || time < now.saturating_sub(self.client_state.max_clock_drift) {
            return Err(ZkClientError::ProofTimeOutOfRange { time, now });
        }
        Ok(())
    }

    /// Checks that `consensus_state` hash-matches the record at `height`.
    pub(crate) fn validate_trusted_consensus(
        &self,
        height: Height,
        consensus_state: &ConsensusState,
    ) -> Result<(), ZkClientError> {
        let stored = self
            .consensus_hashes
            .get(&height)
            .copied()
            .ok_or(ZkClientError::ConsensusStateNotFound(height))?;
        if stored != consensus_state.hash() {
            return Err(ZkClientError::TrustedConsensusStateMismatch { height });
        }
        Ok(())
    }

    pub(crate) fn record_consensus(&mut self, height: Height, hash: [u8; 32], timestamp: u64) {
        self.consensus_hashes.insert(height, hash);
        self.timestamps.insert(height, timestamp);
        if height > self.client_state.latest_height {
            self.client_state.latest_height = height;
        }
    }

    pub(crate) fn freeze(&mut self) {
        self.client_state.is_frozen = true;
        tracing::warn!(chain_id = %self.client_state.chain_id, "client frozen on misbehaviour");
    }
}

impl LightClient for ZkLightClient {
    fn client_type(&self) -> &'static str {
        "zk"
    }

    fn latest_height(&self) -> Height {
        self.client_state.latest_height
    }

    fn status(&self) -> ClientStatus {
        if self.client_state.is_frozen {
            ClientStatus::Frozen
        } else {
            ClientStatus::Active
        }
    }

    fn timestamp_at_height(&self, height: Height) -> Result<u64, LightClientError> {
        self.timestamps
            .get(&height)
            .copied()
            .ok_or(LightClientError::ConsensusStateNotFound(height))
    }

    fn update_client(
        &mut self,
        ctx: &mut CallContext,
        client_message: &[u8],
    ) -> Result<UpdateResult, LightClientError> {
        Ok(self.verify_and_update(ctx.now, client_message)?)
    }

    fn verify_membership(
        &mut self,
        ctx: &mut CallContext,
        msg: MembershipMsg,
    ) -> Result<u64, LightClientError> {
        Ok(self.membership(ctx, msg)?)
    }

    fn verify_non_membership(
        &mut self,
        ctx: &mut CallContext,
        msg: NonMembershipMsg,
    ) -> Result<u64, LightClientError> {
        Ok(self.non_membership(ctx, msg)?)
    }

    fn submit_misbehaviour(
        &mut self,
        ctx: &mut CallContext,
        misbehaviour_message: &[u8],
    ) -> Result<(), LightClientError> {
        Ok(self.verify_misbehaviour(ctx.now, misbehaviour_message)?)
    }

    fn upgrade_client(
        &mut self,
        _ctx: &mut CallContext,
        _upgrade_message: &[u8],
    ) -> Result<(), LightClientError> {
        Err(ZkClientError::UnsupportedFeature { feature: "upgrade" }.into())
    }
}
