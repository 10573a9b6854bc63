//! rflink Discovery
//!
//! Finds RF bridge devices on the local network and enumerates the remotes
//! they know about. One session = one broadcast probe plus a bounded
//! listening window; bridges reply with their remote list, each entry
//! becoming a [`Remote`] tagged with the sender's address.
//!
//! Sessions do not deduplicate: overlapping replies yield repeated
//! `(name, key)` pairs and the hosting layer decides what to do with them.
//! The [`Discovery`] registry offers that bookkeeping, keyed by
//! [`Remote::stable_id`].

pub mod broadcast;
pub mod error;
pub mod remote;

pub use broadcast::BridgeResponder;
pub use error::{DiscoveryError, Result};
pub use remote::Remote;

use rflink_core::BRIDGE_PORT;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Discovery event
#[derive(Debug, Clone)]
pub enum DiscoveryEvent {
    /// Remote discovered
    Found(Remote),
    /// Error during discovery
    Error(String),
}

/// Discovery configuration
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Protocol port bridges listen on
    pub port: u16,
    /// Address the probe is sent to. Default is the limited broadcast
    /// address; a directed broadcast or unicast address works too.
    pub broadcast_addr: IpAddr,
    /// Listening window after the probe goes out
    pub timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            port: BRIDGE_PORT,
            broadcast_addr: IpAddr::V4(Ipv4Addr::BROADCAST),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Discover bridge remotes and keep track of what has been seen
pub struct Discovery {
    config: DiscoveryConfig,
    remotes: HashMap<Uuid, Remote>,
}

impl Discovery {
    pub fn new() -> Self {
        Self::with_config(DiscoveryConfig::default())
    }

    pub fn with_config(config: DiscoveryConfig) -> Self {
        Self {
            config,
            remotes: HashMap::new(),
        }
    }

    /// Run one discovery session and return every remote it yielded, in
    /// arrival order and without deduplication.
    ///
    /// The known-remote registry is refreshed as a side effect. A bind or
    /// probe send failure fails the whole call before any remote is
    /// returned.
    pub async fn run_once(&mut self) -> Result<Vec<Remote>> {
        let (tx, mut rx) = mpsc::channel(100);
        let config = self.config.clone();

        let session = tokio::spawn(async move { broadcast::discover(&config, tx).await });

        let mut found = Vec::new();
        while let Some(event) = rx.recv().await {
            match event {
                DiscoveryEvent::Found(remote) => {
                    self.remotes.insert(remote.stable_id(), remote.clone());
                    found.push(remote);
                }
                DiscoveryEvent::Error(e) => {
                    tracing::warn!("Discovery error: {}", e);
                }
            }
        }

        session
            .await
            .map_err(|e| DiscoveryError::Other(e.to_string()))??;

        Ok(found)
    }

    /// Remotes seen across all sessions, keyed by stable id
    pub fn remotes(&self) -> impl Iterator<Item = &Remote> {
        self.remotes.values()
    }

    /// Look up a known remote by stable id
    pub fn get(&self, id: &Uuid) -> Option<&Remote> {
        self.remotes.get(id)
    }

    /// Manually add a remote (e.g. one restored from host storage)
    pub fn add(&mut self, remote: Remote) {
        self.remotes.insert(remote.stable_id(), remote);
    }

    /// Forget a known remote
    pub fn remove(&mut self, id: &Uuid) -> Option<Remote> {
        self.remotes.remove(id)
    }
}

impl Default for Discovery {
    fn default() -> Self {
        Self::new()
    }
}
