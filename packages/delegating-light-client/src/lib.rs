#![doc = "Light client delegating all verification to a host-provided capability"]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

use std::sync::Arc;

use ibc_lite_client_interface::{
    CallContext, ClientStatus, Height, LightClient, LightClientError, MembershipMsg,
    NonMembershipMsg, UpdateResult,
};
use thiserror::Error;

/// Failure reported by the host's verification capability.
#[derive(Error, Debug)]
#[error("{reason}")]
pub struct HostVerifierError {
    /// Reason for error
    pub reason: String,
}

impl HostVerifierError {
    /// Creates an error with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A verification capability exposed by the host ledger itself, addressed
/// by a remote client identifier. The wrapper never interprets proof
/// bytes; the host does all verification and bookkeeping.
pub trait HostVerifier {
    /// Latest height the host has verified for `client_id`.
    ///
    /// # Errors
    /// Fails if the host does not know the client.
    fn latest_height(&self, client_id: &str) -> Result<Height, HostVerifierError>;

    /// Whether the host considers `client_id` active.
    ///
    /// # Errors
    /// Fails if the host does not know the client.
    fn is_frozen(&self, client_id: &str) -> Result<bool, HostVerifierError>;

    /// Trusted timestamp at `height` for `client_id`.
    ///
    /// # Errors
    /// Fails if the host has no record at that height.
    fn timestamp_at_height(&self, client_id: &str, height: Height)
        -> Result<u64, HostVerifierError>;

    /// Forwards a client update.
    ///
    /// # Errors
    /// Fails if the host rejects the message.
    fn update_client(
        &self,
        client_id: &str,
        client_message: &[u8],
    ) -> Result<UpdateResult, HostVerifierError>;

    /// Forwards a membership verification.
    ///
    /// # Errors
    /// Fails if the host rejects the proof.
    fn verify_membership(
        &self,
        client_id: &str,
        msg: &MembershipMsg,
    ) -> Result<u64, HostVerifierError>;

    /// Forwards a non-membership verification.
    ///
    /// # Errors
    /// Fails if the host rejects the proof.
    fn verify_non_membership(
        &self,
        client_id: &str,
        msg: &NonMembershipMsg,
    ) -> Result<u64, HostVerifierError>;

    /// Forwards misbehaviour evidence.
    ///
    /// # Errors
    /// Fails if the host rejects the evidence.
    fn submit_misbehaviour(
        &self,
        client_id: &str,
        misbehaviour_message: &[u8],
    ) -> Result<(), HostVerifierError>;

    /// Forwards an upgrade.
    ///
    /// # Errors
    /// Fails if the host rejects the upgrade.
    fn upgrade_client(
        &self,
        client_id: &str,
        upgrade_message: &[u8],
    ) -> Result<(), HostVerifierError>;
}

/// A stateless light client forwarding every capability to the host.
pub struct DelegatingLightClient {
    host: Arc<dyn HostVerifier + Send + Sync>,
    remote_client_id: String,
}

impl DelegatingLightClient {
    /// Wraps the host capability for one remote client identifier.
    #[must_use]
    pub fn new(host: Arc<dyn HostVerifier + Send + Sync>, remote_client_id: String) -> Self {
        Self {
            host,
            remote_client_id,
        }
    }

    /// The remote client identifier all calls are forwarded under.
    #[must_use]
    pub fn remote_client_id(&self) -> &str {
        &self.remote_client_id
    }
}

fn host_err(err: &HostVerifierError) -> LightClientError {
    LightClientError::Host(err.reason.clone())
}

impl LightClient for DelegatingLightClient {
    fn client_type(&self) -> &'static str {
        "host"
    }

    fn latest_height(&self) -> Height {
        self.host
            .latest_height(&self.remote_client_id)
            .unwrap_or_default()
    }

    fn status(&self) -> ClientStatus {
        match self.host.is_frozen(&self.remote_client_id) {
            Ok(false) => ClientStatus::Active,
            _ => ClientStatus::Frozen,
        }
    }

    fn timestamp_at_height(&self, height: Height) -> Result<u64, LightClientError> {
        self.host
            .timestamp_at_height(&self.remote_client_id, height)
            .map_err(|e| host_err(&e))
    }

    fn update_client(
        &mut self,
        _ctx: &mut CallContext,
        client_message: &[u8],
    ) -> Result<UpdateResult, LightClientError> {
        self.host
            .update_client(&self.remote_client_id, client_message)
            .map_err(|e| host_err(&e))
    }

    fn verify_membership(
        &mut self,
        _ctx: &mut CallContext,
        msg: MembershipMsg,
    ) -> Result<u64, LightClientError> {
        self.host
            .verify_membership(&self.remote_client_id, &msg)
            .map_err(|e| host_err(&e))
    }

    fn verify_non_membership(
        &mut self,
        _ctx: &mut CallContext,
        msg: NonMembershipMsg,
    ) -> Result<u64, LightClientError> {
        self.host
            .verify_non_membership(&self.remote_client_id, &msg)
            .map_err(|e| host_err(&e))
    }

    fn submit_misbehaviour(
        &mut self,
        _ctx: &mut CallContext,
        misbehaviour_message: &[u8],
    ) -> Result<(), LightClientError> {
        self.host
            .submit_misbehaviour(&self.remote_client_id, misbehaviour_message)
            .map_err(|e| host_err(&e))
    }

    fn upgrade_client(
        &mut self,
        _ctx: &mut CallContext,
        upgrade_message: &[u8],
    ) -> Result<(), LightClientError> {
        self.host
            .upgrade_client(&self.remote_client_id, upgrade_message)
            .map_err(|e| host_err(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records forwarded calls and answers from fixed state.
    #[derive(Default)]
    struct RecordingHost {
        calls: Mutex<Vec<String>>,
        frozen: bool,
    }

    impl RecordingHost {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }
    }

    impl HostVerifier for RecordingHost {
        fn latest_height(&self, client_id: &str) -> Result<Height, HostVerifierError> {
            self.record(format!("latest_height:{client_id}"));
            Ok(Height::new(1, 7))
        }

        fn is_frozen(&self, _client_id: &str) -> Result<bool, HostVerifierError> {
            Ok(self.frozen)
        }

        fn timestamp_at_height(
            &self,
            _client_id: &str,
            height: Height,
        ) -> Result<u64, HostVerifierError> {
            if height.revision_height == 7 {
                Ok(700)
            } else {
                Err(HostVerifierError::new("no record at height"))
            }
        }

        fn update_client(
            &self,
            client_id: &str,
            _client_message: &[u8],
        ) -> Result<UpdateResult, HostVerifierError> {
            self.record(format!("update:{client_id}"));
            Ok(UpdateResult::Update(Height::new(1, 8)))
        }

        fn verify_membership(
            &self,
            client_id: &str,
            _msg: &MembershipMsg,
        ) -> Result<u64, HostVerifierError> {
            self.record(format!("membership:{client_id}"));
            Ok(700)
        }

        fn verify_non_membership(
            &self,
            _client_id: &str,
            _msg: &NonMembershipMsg,
        ) -> Result<u64, HostVerifierError> {
            Err(HostVerifierError::new("rejected"))
        }

        fn submit_misbehaviour(
            &self,
            _client_id: &str,
            _misbehaviour_message: &[u8],
        ) -> Result<(), HostVerifierError> {
            Ok(())
        }

        fn upgrade_client(
            &self,
            _client_id: &str,
            _upgrade_message: &[u8],
        ) -> Result<(), HostVerifierError> {
            Ok(())
        }
    }

    #[test]
    fn forwards_calls_under_the_remote_client_id() {
        let host = Arc::new(RecordingHost::default());
        let mut client = DelegatingLightClient::new(host.clone(), "remote-3".to_string());
        let mut ctx = CallContext::new(1000);

        assert_eq!(client.latest_height(), Height::new(1, 7));
        let res = client.update_client(&mut ctx, b"msg").unwrap();
        assert_eq!(res, UpdateResult::Update(Height::new(1, 8)));

        let msg = MembershipMsg {
            proof_height: Height::new(1, 7),
            proof: b"proof".to_vec(),
            path: vec![b"ibc".to_vec()],
            value: b"value".to_vec(),
        };
        assert_eq!(client.verify_membership(&mut ctx, msg).unwrap(), 700);

        let calls = host.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                "latest_height:remote-3".to_string(),
                "update:remote-3".to_string(),
                "membership:remote-3".to_string(),
            ]
        );
    }

    #[test]
    fn host_failures_surface_as_host_errors() {
        let host = Arc::new(RecordingHost::default());
        let mut client = DelegatingLightClient::new(host, "remote-3".to_string());
        let mut ctx = CallContext::new(1000);

        let res = client.verify_non_membership(
            &mut ctx,
            NonMembershipMsg {
                proof_height: Height::new(1, 7),
                proof: vec![],
                path: vec![],
            },
        );
        assert!(matches!(res, Err(LightClientError::Host(reason)) if reason == "rejected"));

        let res = client.timestamp_at_height(Height::new(1, 9));
        assert!(matches!(res, Err(LightClientError::Host(_))));
    }

    #[test]
    fn frozen_host_reports_frozen_status() {
        let host = Arc::new(RecordingHost {
            frozen: true,
            ..RecordingHost::default()
        });
        let client = DelegatingLightClient::new(host, "remote-3".to_string());
        assert_eq!(client.status(), ClientStatus::Frozen);
    }
}
