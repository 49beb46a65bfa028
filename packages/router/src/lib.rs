#![doc = "Packet router and client registry for ibc-lite"]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod access;
pub mod app;
pub mod error;
pub mod events;
pub mod msgs;
pub mod registry;
pub mod router;

#[cfg(test)]
use ibc_lite_attestor_client as _;
#[cfg(test)]
use ibc_lite_zk_client as _;

pub use access::AccessController;
pub use app::{AppError, IbcApp};
pub use error::RouterError;
pub use events::RouterEvent;
pub use msgs::{MsgAckPacket, MsgRecvPacket, MsgSendPacket, MsgTimeoutPacket};
pub use registry::{ClientRecord, ClientRegistry, CounterpartyInfo};
pub use router::{AckPacketResult, RecvPacketResult, Router, TimeoutPacketResult};
