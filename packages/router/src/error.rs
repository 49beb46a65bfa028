//! Error types for the packet router.

use ibc_lite_client_interface::LightClientError;
use ibc_lite_host::HostError;
use thiserror::Error;

use crate::app::AppError;

/// Main error type for router operations.
#[derive(Error, Debug)]
pub enum RouterError {
    /// Submitter not on the allow-list
    #[error("unauthorized sender")]
    UnauthorizedSender,

    /// A second entry point was entered while one was in flight
    #[error("re-entrant router call")]
    ReentrantCall,

    /// No application registered for the port
    #[error("no application registered for port {port}")]
    AppNotFound {
        /// Port identifier
        port: String,
    },

    /// An application is already registered for the port
    #[error("an application is already registered for port {port}")]
    AppAlreadyExists {
        /// Port identifier
        port: String,
    },

    /// No client registered under the identifier
    #[error("client {client_id} not found")]
    ClientNotFound {
        /// Client identifier
        client_id: String,
    },

    /// Client is registered but deactivated
    #[error("client is not active")]
    ClientNotActive,

    /// Packet's counterparty does not match the registry
    #[error("invalid counterparty client")]
    InvalidCounterpartyClient,

    /// Counterparty metadata rejected at registration
    #[error("invalid counterparty info: {reason}")]
    InvalidCounterpartyInfo {
        /// Reason for error
        reason: &'static str,
    },

    /// Packet without payloads
    #[error("packet must carry at least one payload")]
    NoPayloads,

    /// Timeout not in the future
    #[error("invalid timeout timestamp")]
    InvalidTimeoutTimestamp,

    /// Timeout unreasonably far in the future
    #[error("invalid timeout duration")]
    InvalidTimeoutDuration,

    /// Stored packet commitment differs from the packet being settled
    #[error("packet commitment mismatch")]
    PacketCommitmentMismatch,

    /// A different packet was already received at this sequence
    #[error("packet receipt mismatch")]
    PacketReceiptMismatch,

    /// Application returned an empty acknowledgement
    #[error("async acknowledgement not supported")]
    AsyncAcknowledgementNotSupported,

    /// One acknowledgement per payload is required
    #[error("acknowledgement count does not match payload count")]
    AcknowledgementCountMismatch,

    /// Destination's verified timestamp has not reached the timeout
    #[error("timeout not reached: packet times out at {timeout}, proven timestamp is {timestamp}")]
    TimeoutNotReached {
        /// Packet timeout timestamp
        timeout: u64,
        /// Timestamp proven at the proof height
        timestamp: u64,
    },

    /// An application callback aborted the operation
    #[error("application callback failed: {0}")]
    AppCallbackFailed(#[from] AppError),

    /// Light client verification failure
    #[error(transparent)]
    LightClient(#[from] LightClientError),

    /// Commitment store or path failure
    #[error(transparent)]
    Host(#[from] HostError),
}
