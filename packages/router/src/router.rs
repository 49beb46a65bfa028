//! The packet router state machine.
//!
//! Per (client, sequence) a packet moves `Unsent -> Committed ->
//! {Acknowledged | TimedOut}`; only the committed state is stored, the
//! rest is inferred from commitment-store membership. Duplicate deliveries
//! by racing relayers resolve to no-ops, not errors.

use std::collections::BTreeMap;

use ibc_lite_client_interface::{
    CallContext, ClientStatus, LightClient, MembershipMsg, NonMembershipMsg, UpdateResult,
};
use ibc_lite_host::{ics24, CommitmentStore, HostError, Packet};

use crate::access::AccessController;
use crate::app::IbcApp;
use crate::error::RouterError;
use crate::events::RouterEvent;
use crate::msgs::{MsgAckPacket, MsgRecvPacket, MsgSendPacket, MsgTimeoutPacket};
use crate::registry::{ClientRegistry, CounterpartyInfo};

/// Longest allowed distance between now and a packet's timeout, seconds.
pub const MAX_TIMEOUT_DURATION: u64 = 86_400;

/// Outcome of a receive operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecvPacketResult {
    /// Duplicate delivery; nothing changed
    Noop,
    /// Packet received, acknowledgements written
    Received {
        /// One acknowledgement per payload
        acks: Vec<Vec<u8>>,
    },
}

/// Outcome of an acknowledge operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckPacketResult {
    /// Commitment already settled; nothing changed
    Noop,
    /// Acknowledgement verified, commitment deleted
    Acknowledged,
}

/// Outcome of a timeout operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPacketResult {
    /// Commitment already settled; nothing changed
    Noop,
    /// Timeout proven, commitment deleted
    TimedOut,
}

/// Top-level orchestrator: sequences packets, asks the registered light
/// clients for proof verification, keeps the commitment bookkeeping and
/// dispatches to per-port applications.
pub struct Router {
    registry: ClientRegistry,
    store: CommitmentStore,
    apps: BTreeMap<String, Box<dyn IbcApp>>,
    access: AccessController,
    /// Next send sequence per source client; gapless, starting at 1.
    next_sequences: BTreeMap<String, u64>,
    events: Vec<RouterEvent>,
    busy: bool,
}

impl Router {
    /// Creates a router gated by `access`.
    #[must_use]
    pub fn new(access: AccessController) -> Self {
        Self {
            registry: ClientRegistry::new(),
            store: CommitmentStore::new(),
            apps: BTreeMap::new(),
            access,
            next_sequences: BTreeMap::new(),
            events: Vec::new(),
            busy: false,
        }
    }

    /// Registers a light client and returns its allocated identifier.
    ///
    /// # Errors
    /// Fails on malformed counterparty metadata.
    pub fn register_client(
        &mut self,
        counterparty_info: CounterpartyInfo,
        client: Box<dyn LightClient>,
    ) -> Result<String, RouterError> {
        let counterparty_client_id = counterparty_info.client_id.clone();
        let client_id = self.registry.register(counterparty_info, client)?;
        tracing::info!(%client_id, "client registered");
        self.events.push(RouterEvent::ClientAdded {
            client_id: client_id.clone(),
            counterparty_client_id,
        });
        Ok(client_id)
    }

    /// Registers an application under `port`.
    ///
    /// # Errors
    /// Returns [`RouterError::AppAlreadyExists`] if the port is taken.
    pub fn register_app(
        &mut self,
        port: impl Into<String>,
        app: Box<dyn IbcApp>,
    ) -> Result<(), RouterError> {
        let port = port.into();
        if self.apps.contains_key(&port) {
            return Err(RouterError::AppAlreadyExists { port });
        }
        self.apps.insert(port, app);
        Ok(())
    }

    /// Activates or deactivates a registered client.
    ///
    /// # Errors
    /// Returns [`RouterError::ClientNotFound`] if absent.
    pub fn set_client_active(&mut self, client_id: &str, active: bool) -> Result<(), RouterError> {
        self.registry.set_active(client_id, active)
    }

    /// Status of a registered client; available when frozen.
    ///
    /// # Errors
    /// Returns [`RouterError::ClientNotFound`] if absent.
    pub fn client_status(&self, client_id: &str) -> Result<ClientStatus, RouterError> {
        Ok(self.registry.record(client_id)?.client.status())
    }

    /// The commitment store, for inspection.
    #[must_use]
    pub const fn store(&self) -> &CommitmentStore {
        &self.store
    }

    /// The access controller.
    pub fn access_mut(&mut self) -> &mut AccessController {
        &mut self.access
    }

    /// Drains the records emitted since the last call.
    pub fn take_events(&mut self) -> Vec<RouterEvent> {
        std::mem::take(&mut self.events)
    }

    fn begin(&mut self) -> Result<(), RouterError> {
        if self.busy {
            return Err(RouterError::ReentrantCall);
        }
        self.busy = true;
        Ok(())
    }

    fn next_sequence(&self, client_id: &str) -> u64 {
        self.next_sequences.get(client_id).copied().unwrap_or(1)
    }

    /// Sends a packet over `msg.source_client` and returns its sequence.
    ///
    /// # Errors
    /// Fails with no state change on invalid timeouts, unknown clients or
    /// ports, or an aborting `on_send_packet` callback.
    pub fn send_packet(
        &mut self,
        now: u64,
        sender: &str,
        msg: MsgSendPacket,
    ) -> Result<u64, RouterError> {
        self.begin()?;
        let result = self.send_packet_inner(now, sender, msg);
        self.busy = false;
        result
    }

    fn send_packet_inner(
        &mut self,
        now: u64,
        sender: &str,
        msg: MsgSendPacket,
    ) -> Result<u64, RouterError> {
        if msg.payloads.is_empty() {
            return Err(RouterError::NoPayloads);
        }

        let record = self.registry.active_record_mut(&msg.source_client)?;
        let dest_client = record.counterparty_info.client_id.clone();

        if msg.timeout_timestamp <= now {
            return Err(RouterError::InvalidTimeoutTimestamp);
        }
        if msg.timeout_timestamp - now > MAX_TIMEOUT_DURATION {
            return Err(RouterError::InvalidTimeoutDuration);
        }

        for payload in &msg.payloads {
            if !self.apps.contains_key(&payload.source_port) {
                return Err(RouterError::AppNotFound {
                    port: payload.source_port.clone(),
                });
            }
        }

        let sequence = self.next_sequence(&msg.source_client);
        let packet = Packet {
            sequence,
            source_client: msg.source_client,
            dest_client,
            timeout_timestamp: msg.timeout_timestamp,
            payloads: msg.payloads,
        };

        // The owning application may abort the whole send here; nothing is
        // committed until every callback has passed.
        for payload in &packet.payloads {
            let app = self
                .apps
                .get_mut(&payload.source_port)
                .ok_or_else(|| RouterError::AppNotFound {
                    port: payload.source_port.clone(),
                })?;
            app.on_send_packet(&packet, payload, sender)?;
        }

        let commitment = ics24::packet_commitment_bytes32(&packet);
        self.store.put(
            ics24::packet_commitment_path(&packet.source_client, sequence),
            commitment,
        )?;
        self.next_sequences
            .insert(packet.source_client.clone(), sequence + 1);

        tracing::info!(client_id = %packet.source_client, sequence, "packet sent");
        self.events.push(RouterEvent::SendPacket {
            client_id: packet.source_client.clone(),
            sequence,
            packet,
        });

        Ok(sequence)
    }

    /// Receives a packet on its destination side.
    ///
    /// A duplicate delivery of the same packet is a no-op. The packet
    /// commitment is verified against the source ledger's state through
    /// the destination-side light client before any callback runs.
    ///
    /// # Errors
    /// Fails with no state change on an unauthorized submitter, elapsed
    /// timeout, counterparty mismatch, missing application, failed proof,
    /// or an empty acknowledgement.
    pub fn recv_packet(
        &mut self,
        now: u64,
        relayer: &str,
        msg: MsgRecvPacket,
    ) -> Result<RecvPacketResult, RouterError> {
        self.begin()?;
        let result = self.recv_packet_inner(now, relayer, msg);
        self.busy = false;
        result
    }

    fn recv_packet_inner(
        &mut self,
        now: u64,
        relayer: &str,
        msg: MsgRecvPacket,
    ) -> Result<RecvPacketResult, RouterError> {
        self.access.authorize(relayer)?;

        let packet = msg.packet;
        if packet.payloads.is_empty() {
            return Err(RouterError::NoPayloads);
        }

        let record = self.registry.active_record_mut(&packet.dest_client)?;
        if packet.source_client != record.counterparty_info.client_id {
            return Err(RouterError::InvalidCounterpartyClient);
        }

        let receipt_path =
            ics24::packet_receipt_commitment_path(&packet.dest_client, packet.sequence);
        let receipt_commitment = ics24::packet_receipt_commitment_bytes32(&packet)?;

        match self.store.get(&receipt_path) {
            Ok(stored) if stored == receipt_commitment => {
                // Duplicate relayer submission; tolerate rather than error.
                self.events.push(RouterEvent::Noop);
                return Ok(RecvPacketResult::Noop);
            }
            Ok(_) => return Err(RouterError::PacketReceiptMismatch),
            Err(HostError::NotFound) => {}
            Err(err) => return Err(err.into()),
        }

        if packet.timeout_timestamp <= now {
            return Err(RouterError::InvalidTimeoutTimestamp);
        }

        for payload in &packet.payloads {
            if !self.apps.contains_key(&payload.dest_port) {
                return Err(RouterError::AppNotFound {
                    port: payload.dest_port.clone(),
                });
            }
        }

        let commitment_path =
            ics24::packet_commitment_path(&packet.source_client, packet.sequence);
        let prefixed =
            ics24::prefixed_path(&record.counterparty_info.merkle_prefix, &commitment_path)?;
        let commitment = ics24::packet_commitment_bytes32(&packet);

        let mut ctx = CallContext::new(now);
        record.client.verify_membership(
            &mut ctx,
            MembershipMsg {
                proof_height: msg.proof_height,
                proof: msg.proof_commitment,
                path: prefixed,
                value: commitment.to_vec(),
            },
        )?;

        let mut acks = Vec::with_capacity(packet.payloads.len());
        for payload in &packet.payloads {
            let app = self
                .apps
                .get_mut(&payload.dest_port)
                .ok_or_else(|| RouterError::AppNotFound {
                    port: payload.dest_port.clone(),
                })?;
            let ack = match app.on_recv_packet(&packet, payload, relayer) {
                Ok(ack) => {
                    if ack.is_empty() {
                        return Err(RouterError::AsyncAcknowledgementNotSupported);
                    }
                    ack
                }
                Err(err) => {
                    tracing::debug!(%err, "application rejected packet, writing error ack");
                    ics24::UNIVERSAL_ERROR_ACK.to_vec()
                }
            };
            acks.push(ack);
        }

        let ack_commitment = ics24::packet_acknowledgement_commitment_bytes32(&acks)?;
        self.store.put(
            ics24::packet_acknowledgement_commitment_path(&packet.dest_client, packet.sequence),
            ack_commitment,
        )?;
        self.store.put(receipt_path, receipt_commitment)?;

        tracing::info!(client_id = %packet.dest_client, sequence = packet.sequence, "packet received");
        self.events.push(RouterEvent::WriteAcknowledgement {
            client_id: packet.dest_client.clone(),
            sequence: packet.sequence,
            packet,
            acknowledgements: acks.clone(),
        });

        Ok(RecvPacketResult::Received { acks })
    }

    /// Settles a sent packet with the acknowledgement the destination
    /// wrote for it.
    ///
    /// # Errors
    /// Fails with no state change on an unauthorized submitter,
    /// counterparty mismatch, commitment mismatch, failed proof, or an
    /// aborting callback.
    pub fn ack_packet(
        &mut self,
        now: u64,
        relayer: &str,
        msg: MsgAckPacket,
    ) -> Result<AckPacketResult, RouterError> {
        self.begin()?;
        let result = self.ack_packet_inner(now, relayer, msg);
        self.busy = false;
        result
    }

    fn ack_packet_inner(
        &mut self,
        now: u64,
        relayer: &str,
        msg: MsgAckPacket,
    ) -> Result<AckPacketResult, RouterError> {
        self.access.authorize(relayer)?;

        let packet = msg.packet;
        if packet.payloads.is_empty() {
            return Err(RouterError::NoPayloads);
        }
        if msg.acknowledgements.len() != packet.payloads.len() {
            return Err(RouterError::AcknowledgementCountMismatch);
        }

        let record = self.registry.active_record_mut(&packet.source_client)?;
        if packet.dest_client != record.counterparty_info.client_id {
            return Err(RouterError::InvalidCounterpartyClient);
        }

        let commitment_path =
            ics24::packet_commitment_path(&packet.source_client, packet.sequence);
        let stored = match self.store.get(&commitment_path) {
            Ok(stored) => stored,
            Err(HostError::NotFound) => {
                // Already acknowledged or timed out by a racing relayer.
                self.events.push(RouterEvent::Noop);
                return Ok(AckPacketResult::Noop);
            }
            Err(err) => return Err(err.into()),
        };

        let expected = ics24::packet_commitment_bytes32(&packet);
        if stored != expected {
            return Err(RouterError::PacketCommitmentMismatch);
        }

        for payload in &packet.payloads {
            if !self.apps.contains_key(&payload.source_port) {
                return Err(RouterError::AppNotFound {
                    port: payload.source_port.clone(),
                });
            }
        }

        let ack_commitment =
            ics24::packet_acknowledgement_commitment_bytes32(&msg.acknowledgements)?;
        let ack_path =
            ics24::packet_acknowledgement_commitment_path(&packet.dest_client, packet.sequence);
        let prefixed = ics24::prefixed_path(&record.counterparty_info.merkle_prefix, &ack_path)?;

        let mut ctx = CallContext::new(now);
        record.client.verify_membership(
            &mut ctx,
            MembershipMsg {
                proof_height: msg.proof_height,
                proof: msg.proof_acked,
                path: prefixed,
                value: ack_commitment.to_vec(),
            },
        )?;

        for (payload, ack) in packet.payloads.iter().zip(&msg.acknowledgements) {
            let app = self
                .apps
                .get_mut(&payload.source_port)
                .ok_or_else(|| RouterError::AppNotFound {
                    port: payload.source_port.clone(),
                })?;
            app.on_acknowledgement_packet(&packet, payload, ack, relayer)?;
        }

        self.store.delete(&commitment_path, expected)?;

        tracing::info!(client_id = %packet.source_client, sequence = packet.sequence, "packet acknowledged");
        self.events.push(RouterEvent::AckPacket {
            client_id: packet.source_client.clone(),
            sequence: packet.sequence,
        });

        Ok(AckPacketResult::Acknowledged)
    }

    /// Settles a sent packet whose timeout has passed unreceived.
    ///
    /// The destination-side absence of a receipt is proven through the
    /// light client, and the timestamp proven at the proof height must
    /// have reached the packet's timeout.
    ///
    /// # Errors
    /// Fails with no state change on an unauthorized submitter,
    /// counterparty mismatch, commitment mismatch, failed proof, a
    /// timestamp short of the timeout, or an aborting callback.
    pub fn timeout_packet(
        &mut self,
        now: u64,
        relayer: &str,
        msg: MsgTimeoutPacket,
    ) -> Result<TimeoutPacketResult, RouterError> {
        self.begin()?;
        let result = self.timeout_packet_inner(now, relayer, msg);
        self.busy = false;
        result
    }

    fn timeout_packet_inner(
        &mut self,
        now: u64,
        relayer: &str,
        msg: MsgTimeoutPacket,
    ) -> Result<TimeoutPacketResult, RouterError> {
        self.access.authorize(relayer)?;

        let packet = msg.packet;
        if packet.payloads.is_empty() {
            return Err(RouterError::NoPayloads);
        }

        let record = self.registry.active_record_mut(&packet.source_client)?;
        if packet.dest_client != record.counterparty_info.client_id {
            return Err(RouterError::InvalidCounterpartyClient);
        }

        let commitment_path =
            ics24::packet_commitment_path(&packet.source_client, packet.sequence);
        let stored = match self.store.get(&commitment_path) {
            Ok(stored) => stored,
            Err(HostError::NotFound) => {
                self.events.push(RouterEvent::Noop);
                return Ok(TimeoutPacketResult::Noop);
            }
            Err(err) => return Err(err.into()),
        };

        let expected = ics24::packet_commitment_bytes32(&packet);
        if stored != expected {
            return Err(RouterError::PacketCommitmentMismatch);
        }

        for payload in &packet.payloads {
            if !self.apps.contains_key(&payload.source_port) {
                return Err(RouterError::AppNotFound {
                    port: payload.source_port.clone(),
                });
            }
        }

        let receipt_path =
            ics24::packet_receipt_commitment_path(&packet.dest_client, packet.sequence);
        let prefixed =
            ics24::prefixed_path(&record.counterparty_info.merkle_prefix, &receipt_path)?;

        let mut ctx = CallContext::new(now);
        let timestamp = record.client.verify_non_membership(
            &mut ctx,
            NonMembershipMsg {
                proof_height: msg.proof_height,
                proof: msg.proof_unreceived,
                path: prefixed,
            },
        )?;

        if timestamp < packet.timeout_timestamp {
            return Err(RouterError::TimeoutNotReached {
                timeout: packet.timeout_timestamp,
                timestamp,
            });
        }

        for payload in &packet.payloads {
            let app = self
                .apps
                .get_mut(&payload.source_port)
                .ok_or_else(|| RouterError::AppNotFound {
                    port: payload.source_port.clone(),
                })?;
            app.on_timeout_packet(&packet, payload, relayer)?;
        }

        self.store.delete(&commitment_path, expected)?;

        tracing::info!(client_id = %packet.source_client, sequence = packet.sequence, "packet timed out");
        self.events.push(RouterEvent::TimeoutPacket {
            client_id: packet.source_client.clone(),
            sequence: packet.sequence,
        });

        Ok(TimeoutPacketResult::TimedOut)
    }

    /// Delegates a client update to the addressed instance without
    /// interpreting the payload.
    ///
    /// # Errors
    /// Fails if the submitter is unauthorized, the client is unknown, or
    /// the instance rejects the message.
    pub fn update_client(
        &mut self,
        now: u64,
        relayer: &str,
        client_id: &str,
        client_message: &[u8],
    ) -> Result<UpdateResult, RouterError> {
        self.begin()?;
        let result = self.update_client_inner(now, relayer, client_id, client_message);
        self.busy = false;
        result
    }

    fn update_client_inner(
        &mut self,
        now: u64,
        relayer: &str,
        client_id: &str,
        client_message: &[u8],
    ) -> Result<UpdateResult, RouterError> {
        self.access.authorize(relayer)?;
        let record = self.registry.active_record_mut(client_id)?;
        let mut ctx = CallContext::new(now);
        Ok(record.client.update_client(&mut ctx, client_message)?)
    }

    /// Delegates misbehaviour evidence to the addressed instance without
    /// interpreting the payload.
    ///
    /// # Errors
    /// Fails if the submitter is unauthorized, the client is unknown, or
    /// the instance rejects the evidence.
    pub fn submit_misbehaviour(
        &mut self,
        now: u64,
        relayer: &str,
        client_id: &str,
        misbehaviour_message: &[u8],
    ) -> Result<(), RouterError> {
        self.begin()?;
        let result = self.submit_misbehaviour_inner(now, relayer, client_id, misbehaviour_message);
        self.busy = false;
        result
    }

    fn submit_misbehaviour_inner(
        &mut self,
        now: u64,
        relayer: &str,
        client_id: &str,
        misbehaviour_message: &[u8],
    ) -> Result<(), RouterError> {
        self.access.authorize(relayer)?;
        let record = self.registry.active_record_mut(client_id)?;
        let mut ctx = CallContext::new(now);
        Ok(record.client.submit_misbehaviour(&mut ctx, misbehaviour_message)?)
    }
}
