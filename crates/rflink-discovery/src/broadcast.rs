//! UDP broadcast discovery session and bridge responder

use crate::{DiscoveryConfig, DiscoveryError, DiscoveryEvent, Remote, Result};
use rflink_core::{wire, RemoteEntry, DISCOVERY_PROBE};
use rflink_transport::{TransportEvent, UdpTransport};
use std::net::SocketAddr;
use tokio::sync::mpsc;
use tokio::time::timeout_at;
use tracing::{debug, info, warn};

/// Run one discovery session: broadcast the probe, then decode replies
/// until the window closes.
///
/// Every valid remote entry is sent on `tx` as a [`DiscoveryEvent::Found`]
/// tagged with the replying bridge's address. Datagrams that do not decode
/// are skipped; one misbehaving responder never ends the session. The
/// socket is released when this future returns.
pub async fn discover(config: &DiscoveryConfig, tx: mpsc::Sender<DiscoveryEvent>) -> Result<()> {
    let transport = UdpTransport::bind_broadcast()
        .await
        .map_err(|e| DiscoveryError::Network(e.to_string()))?;

    let target = SocketAddr::new(config.broadcast_addr, config.port);

    info!("Broadcasting discovery probe to {}", target);

    transport
        .send_to(&wire::probe(), target)
        .await
        .map_err(|e| DiscoveryError::Broadcast(e.to_string()))?;

    let mut receiver = transport.start_receiver();
    let deadline = tokio::time::Instant::now() + config.timeout;

    loop {
        match timeout_at(deadline, receiver.recv_from()).await {
            Ok(Some((TransportEvent::Data(data), from))) => match wire::decode_reply(&data) {
                Ok(entries) => {
                    info!("Bridge at {} advertised {} remote(s)", from.ip(), entries.len());

                    for entry in entries {
                        let remote = Remote::from_entry(entry, from.ip());
                        debug!("Found remote {:?} [{}]", remote.name, remote.key);

                        if tx.send(DiscoveryEvent::Found(remote)).await.is_err() {
                            return Ok(());
                        }
                    }
                }
                Err(e) => {
                    debug!("Ignoring datagram from {}: {}", from, e);
                }
            },
            Ok(Some((TransportEvent::Error(e), _))) => {
                warn!("Receive error during discovery: {}", e);
            }
            Ok(None) => break,
            Err(_) => {
                debug!("Discovery window closed");
                break;
            }
        }
    }

    Ok(())
}

/// Answer discovery probes the way a bridge device does.
///
/// Binds the protocol port and replies to every probe with the configured
/// remote list. Used by the CLI `respond` subcommand and integration tests;
/// real bridges speak the identical format.
pub struct BridgeResponder {
    transport: UdpTransport,
    remotes: Vec<RemoteEntry>,
}

impl BridgeResponder {
    /// Bind the responder socket. Port 0 lets the OS choose (tests).
    pub async fn bind(port: u16, remotes: Vec<RemoteEntry>) -> Result<Self> {
        let transport = UdpTransport::bind(&format!("0.0.0.0:{}", port))
            .await
            .map_err(|e| DiscoveryError::Network(e.to_string()))?;

        info!("Bridge responder listening on port {}", port);

        Ok(Self { transport, remotes })
    }

    /// The bound local address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.transport
            .local_addr()
            .map_err(|e| DiscoveryError::Network(e.to_string()))
    }

    /// Serve probes until the socket errors out
    pub async fn run(&self) -> Result<()> {
        let reply = wire::encode_reply(&self.remotes)?;
        let mut receiver = self.transport.start_receiver();

        while let Some((event, from)) = receiver.recv_from().await {
            if let TransportEvent::Data(data) = event {
                if data.as_ref() != DISCOVERY_PROBE.as_slice() {
                    debug!("Ignoring non-probe datagram from {}", from);
                    continue;
                }

                debug!("Received discovery probe from {}", from);

                if let Err(e) = self.transport.send_to(&reply, from).await {
                    warn!("Failed to answer probe from {}: {}", from, e);
                }
            }
        }

        Ok(())
    }
}
