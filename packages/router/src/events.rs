//! Records emitted by router operations for relayers to observe.

use ibc_lite_host::Packet;

/// A record of a state transition the router performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterEvent {
    /// A packet commitment was written
    SendPacket {
        /// Source-side client identifier
        client_id: String,
        /// Allocated sequence
        sequence: u64,
        /// The full packet
        packet: Packet,
    },
    /// A packet was received and its acknowledgement written
    WriteAcknowledgement {
        /// Destination-side client identifier
        client_id: String,
        /// Packet sequence
        sequence: u64,
        /// The received packet
        packet: Packet,
        /// One acknowledgement per payload
        acknowledgements: Vec<Vec<u8>>,
    },
    /// A packet commitment was settled by an acknowledgement
    AckPacket {
        /// Source-side client identifier
        client_id: String,
        /// Packet sequence
        sequence: u64,
    },
    /// A packet commitment was settled by a timeout
    TimeoutPacket {
        /// Source-side client identifier
        client_id: String,
        /// Packet sequence
        sequence: u64,
    },
    /// A duplicate delivery was tolerated without any state change
    Noop,
    /// A client was registered
    ClientAdded {
        /// Allocated client identifier
        client_id: String,
        /// Counterparty client identifier
        counterparty_client_id: String,
    },
}
