//! rflink Client
//!
//! Fire-and-forget command sending to RF bridge devices. One call builds
//! one 8-byte command packet and hands it to the transport as a single
//! unicast datagram; UDP gives no delivery acknowledgment, so success only
//! means the packet left this host. The physical RF action cannot be
//! confirmed, and the client never retries — a blind retry could trigger
//! the remote twice.
//!
//! # Example
//!
//! ```ignore
//! use rflink_client::CommandClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CommandClient::new();
//!     client.send_key("192.168.1.40".parse()?, "abcd1234").await?;
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ClientError, Result};

use rflink_core::{wire, KeyCode, BRIDGE_PORT};
use rflink_transport::{TransportSender, UdpTransport};
use std::net::{IpAddr, SocketAddr};
use tracing::{debug, info};

/// Sends key commands to bridge devices
#[derive(Debug, Clone)]
pub struct CommandClient {
    port: u16,
}

impl CommandClient {
    /// Client targeting the standard bridge port
    pub fn new() -> Self {
        Self { port: BRIDGE_PORT }
    }

    /// Client targeting a non-standard port (tests, port-forwarded setups)
    pub fn with_port(port: u16) -> Self {
        Self { port }
    }

    /// Trigger the remote identified by `key_hex` on the bridge at `ip`.
    ///
    /// The key code is validated before any socket is opened; a malformed
    /// hex string fails with [`ClientError::Encoding`] and sends nothing.
    /// The socket lives only for this one send.
    pub async fn send_key(&self, ip: IpAddr, key_hex: &str) -> Result<()> {
        let key = KeyCode::from_hex(key_hex)?;
        self.send_key_code(ip, &key).await
    }

    /// Same as [`send_key`](Self::send_key) with an already-parsed code
    pub async fn send_key_code(&self, ip: IpAddr, key: &KeyCode) -> Result<()> {
        let packet = wire::encode_command(key);
        let target = SocketAddr::new(ip, self.port);

        let transport = UdpTransport::bind("0.0.0.0:0").await?;
        let sender = transport.sender_to(target);

        debug!("Sending key {} to {}", key, target);
        sender.send(packet).await?;
        sender.close().await?;

        info!("Key {} handed to transport for {}", key, target);
        Ok(())
    }
}

impl Default for CommandClient {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience over [`CommandClient::send_key`]
pub async fn send_key(ip: IpAddr, key_hex: &str) -> Result<()> {
    CommandClient::new().send_key(ip, key_hex).await
}
