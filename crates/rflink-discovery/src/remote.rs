//! Discovered remote representation

use rflink_core::{KeyCode, RemoteEntry};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use uuid::Uuid;

/// A remote discovered on a bridge device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    /// Human-readable name advertised by the bridge
    pub name: String,
    /// Key code that triggers this remote
    pub key: KeyCode,
    /// Address of the bridge that advertised it
    pub ip: IpAddr,
}

impl Remote {
    pub fn new(name: impl Into<String>, key: KeyCode, ip: IpAddr) -> Self {
        Self {
            name: name.into(),
            key,
            ip,
        }
    }

    /// Build from a decoded wire entry plus the sender's address
    pub fn from_entry(entry: RemoteEntry, ip: IpAddr) -> Self {
        Self {
            name: entry.name,
            key: entry.key,
            ip,
        }
    }

    /// Deterministic identifier derived from (name, key code).
    ///
    /// Stable across runs and across bridges: the same remote observed
    /// twice maps to the same id, so a hosting layer can use it as a
    /// persistent accessory key. The bridge address is deliberately not
    /// part of the identity (devices can move to a new DHCP lease).
    pub fn stable_id(&self) -> Uuid {
        let seed = format!("{}{}", self.name, self.key.to_hex());
        Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes())
    }

    /// Socket address of the owning bridge on the given port
    pub fn bridge_addr(&self, port: u16) -> SocketAddr {
        SocketAddr::new(self.ip, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_id_deterministic() {
        let ip: IpAddr = "192.168.1.40".parse().unwrap();
        let a = Remote::new("KITCHEN", KeyCode::new([1, 2, 3, 4]), ip);
        let b = Remote::new("KITCHEN", KeyCode::new([1, 2, 3, 4]), "10.0.0.9".parse().unwrap());

        // Same (name, key) means same identity, regardless of address.
        assert_eq!(a.stable_id(), b.stable_id());
    }

    #[test]
    fn test_stable_id_differs_by_key() {
        let ip: IpAddr = "192.168.1.40".parse().unwrap();
        let a = Remote::new("KITCHEN", KeyCode::new([1, 2, 3, 4]), ip);
        let b = Remote::new("KITCHEN", KeyCode::new([1, 2, 3, 5]), ip);

        assert_ne!(a.stable_id(), b.stable_id());
    }
}
