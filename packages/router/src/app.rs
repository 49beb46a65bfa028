//! The application callback interface.

use ibc_lite_host::{Packet, Payload};
use thiserror::Error;

/// Failure signalled by an application callback.
#[derive(Error, Debug)]
#[error("{reason}")]
pub struct AppError {
    /// Reason for error
    pub reason: String,
}

impl AppError {
    /// Creates an error with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Callbacks the router dispatches to per-port applications. The router is
/// the only caller and the only consumer of the return values.
pub trait IbcApp {
    /// Invoked before a packet commitment is written; an error aborts the
    /// whole send.
    ///
    /// # Errors
    /// Returns [`AppError`] to abort the send.
    fn on_send_packet(
        &mut self,
        packet: &Packet,
        payload: &Payload,
        sender: &str,
    ) -> Result<(), AppError>;

    /// Invoked on receive; returns the acknowledgement bytes. Empty
    /// acknowledgements are rejected by the router, and an error is
    /// recorded as the universal error acknowledgement.
    ///
    /// # Errors
    /// Returns [`AppError`] to report failure to the sender.
    fn on_recv_packet(
        &mut self,
        packet: &Packet,
        payload: &Payload,
        relayer: &str,
    ) -> Result<Vec<u8>, AppError>;

    /// Invoked when the counterparty's acknowledgement has been verified.
    ///
    /// # Errors
    /// Returns [`AppError`] to abort the acknowledgement.
    fn on_acknowledgement_packet(
        &mut self,
        packet: &Packet,
        payload: &Payload,
        acknowledgement: &[u8],
        relayer: &str,
    ) -> Result<(), AppError>;

    /// Invoked when a timeout has been proven.
    ///
    /// # Errors
    /// Returns [`AppError`] to abort the timeout.
    fn on_timeout_packet(
        &mut self,
        packet: &Packet,
        payload: &Payload,
        relayer: &str,
    ) -> Result<(), AppError>;
}
