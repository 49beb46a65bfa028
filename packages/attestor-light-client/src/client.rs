//! The attestor light client instance.

use std::collections::BTreeMap;

use ibc_lite_client_interface::{
    CallContext, ClientStatus, Height, LightClient, LightClientError, MembershipMsg,
    NonMembershipMsg, UpdateResult,
};

use crate::client_state::{ClientState, ConsensusState};
use crate::error::AttestorClientError;

/// A light client that trusts a fixed m-of-n attestor quorum for inclusion
/// facts only; exclusion and fault attribution are out of its trust model.
#[derive(Debug, Clone)]
pub struct AttestorLightClient {
    pub(crate) client_state: ClientState,
    /// Attested timestamps by height; append-only.
    pub(crate) timestamps: BTreeMap<u64, u64>,
}

impl AttestorLightClient {
    /// Instantiates a client from its initial state.
    ///
    /// # Errors
    /// Returns [`AttestorClientError::InvalidConfiguration`] if the client
    /// state is malformed or inconsistent with the initial consensus state;
    /// no partially constructed client is observable.
    pub fn new(
        client_state: ClientState,
        consensus_state: &ConsensusState,
    ) -> Result<Self, AttestorClientError> {
        // Re-run the constructor checks so a hand-built state cannot skip them.
        ClientState::new(
            client_state.attestor_addresses.clone(),
            client_state.min_required_sigs,
            client_state.latest_height,
        )?;

        if client_state.is_frozen {
            return Err(AttestorClientError::InvalidConfiguration {
                reason: "initial client state cannot be frozen".to_string(),
            });
        }
        if client_state.latest_height != consensus_state.height {
            return Err(AttestorClientError::InvalidConfiguration {
                reason: "client and consensus state heights do not match".to_string(),
            });
        }

        let mut timestamps = BTreeMap::new();
        timestamps.insert(consensus_state.height, consensus_state.timestamp);

        Ok(Self {
            client_state,
            timestamps,
        })
    }

    /// The stored client state.
    #[must_use]
    pub const fn client_state(&self) -> &ClientState {
        &self.client_state
    }

    /// The attested timestamp at `height`, if any.
    #[must_use]
    pub fn timestamp_at(&self, height: u64) -> Option<u64> {
        self.timestamps.get(&height).copied()
    }

    pub(crate) fn ensure_active(&self) -> Result<(), AttestorClientError> {
        if self.client_state.is_frozen {
            return Err(AttestorClientError::FrozenClientState);
        }
        Ok(())
    }
}

impl LightClient for AttestorLightClient {
    fn client_type(&self) -> &'static str {
        "attestor"
    }

    fn latest_height(&self) -> Height {
        Height::new(0, self.client_state.latest_height)
    }

    fn status(&self) -> ClientStatus {
        if self.client_state.is_frozen {
            ClientStatus::Frozen
        } else {
            ClientStatus::Active
        }
    }

    fn timestamp_at_height(&self, height: Height) -> Result<u64, LightClientError> {
        self.timestamp_at(height.revision_height)
            .ok_or(LightClientError::ConsensusStateNotFound(height))
    }

    fn update_client(
        &mut self,
        _ctx: &mut CallContext,
        client_message: &[u8],
    ) -> Result<UpdateResult, LightClientError> {
        Ok(self.verify_and_update(client_message)?)
    }

    fn verify_membership(
        &mut self,
        _ctx: &mut CallContext,
        msg: MembershipMsg,
    ) -> Result<u64, LightClientError> {
        Ok(self.membership(msg.proof_height.revision_height, &msg.value, &msg.proof)?)
    }

    fn verify_non_membership(
        &mut self,
        _ctx: &mut CallContext,
        _msg: NonMembershipMsg,
    ) -> Result<u64, LightClientError> {
        Err(AttestorClientError::UnsupportedFeature {
            feature: "non-membership",
        }
        .into())
    }

    fn submit_misbehaviour(
        &mut self,
        _ctx: &mut CallContext,
        _misbehaviour_message: &[u8],
    ) -> Result<(), LightClientError> {
        Err(AttestorClientError::UnsupportedFeature {
            feature: "misbehaviour",
        }
        .into())
    }

    fn upgrade_client(
        &mut self,
        _ctx: &mut CallContext,
        _upgrade_message: &[u8],
    ) -> Result<(), LightClientError> {
        Err(AttestorClientError::UnsupportedFeature { feature: "upgrade" }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::client_state;

    #[test]
    fn constructor_rejects_mismatched_heights() {
        let cs = client_state(3);
        let consensus = ConsensusState {
            height: cs.latest_height + 1,
            timestamp: 1000,
        };
        let res = AttestorLightClient::new(cs, &consensus);
        assert!(matches!(
            res,
            Err(AttestorClientError::InvalidConfiguration { reason }) if reason.contains("height")
        ));
    }

    #[test]
    fn constructor_rejects_frozen_initial_state() {
        let mut cs = client_state(3);
        cs.is_frozen = true;
        let consensus = ConsensusState {
            height: cs.latest_height,
            timestamp: 1000,
        };
        let res = AttestorLightClient::new(cs, &consensus);
        assert!(matches!(
            res,
            Err(AttestorClientError::InvalidConfiguration { reason }) if reason.contains("frozen")
        ));
    }

    #[test]
    fn unsupported_capabilities_report_as_such() {
        let cs = client_state(3);
        let consensus = ConsensusState {
            height: cs.latest_height,
            timestamp: 1000,
        };
        let mut client = AttestorLightClient::new(cs, &consensus).unwrap();
        let mut ctx = CallContext::new(2000);

        let res = client.verify_non_membership(
            &mut ctx,
            NonMembershipMsg {
                proof_height: Height::new(0, 100),
                proof: vec![],
                path: vec![],
            },
        );
        assert!(matches!(
            res,
            Err(LightClientError::UnsupportedFeature { feature: "non-membership" })
        ));

        let res = client.submit_misbehaviour(&mut ctx, b"evidence");
        assert!(matches!(
            res,
            Err(LightClientError::UnsupportedFeature { feature: "misbehaviour" })
        ));

        let res = client.upgrade_client(&mut ctx, b"upgrade");
        assert!(matches!(
            res,
            Err(LightClientError::UnsupportedFeature { feature: "upgrade" })
        ));

        // Queries stay available regardless.
        assert_eq!(client.latest_height(), Height::new(0, 100));
        assert_eq!(client.status(), ClientStatus::Active);
    }
}
