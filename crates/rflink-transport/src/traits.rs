//! Transport trait definitions

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Events that can occur on a transport
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// Datagram received
    Data(Bytes),
    /// Error occurred while receiving
    Error(String),
}

/// Trait for sending datagrams to a fixed peer
#[async_trait]
pub trait TransportSender: Send + Sync {
    /// Send one datagram
    async fn send(&self, data: Bytes) -> Result<()>;

    /// Check if the sender is still usable
    fn is_open(&self) -> bool;

    /// Close the sender
    async fn close(&self) -> Result<()>;
}

/// Trait for receiving datagrams
#[async_trait]
pub trait TransportReceiver: Send {
    /// Receive the next event
    async fn recv(&mut self) -> Option<TransportEvent>;
}
