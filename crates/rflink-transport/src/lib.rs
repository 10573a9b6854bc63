//! rflink Transport Layer
//!
//! UDP datagram plumbing shared by discovery and command sending. The
//! bridge protocol is UDP-only: broadcast probes out, unicast replies and
//! commands back, no connections and no delivery acknowledgment.

pub mod error;
pub mod traits;
pub mod udp;

pub use error::{Result, TransportError};
pub use traits::{TransportEvent, TransportReceiver, TransportSender};
pub use udp::{UdpConfig, UdpSender, UdpTransport};
