//! Discovery Tests (rflink-discovery)
//!
//! Tests for bridge discovery including:
//! - Remote struct construction and stable identity
//! - DiscoveryConfig defaults
//! - Discovery registry operations
//! - End-to-end probe/reply against a loopback bridge responder

use rflink_core::{KeyCode, RemoteEntry, BRIDGE_PORT};
use rflink_discovery::{BridgeResponder, Discovery, DiscoveryConfig, DiscoveryEvent, Remote};
use std::net::IpAddr;
use std::time::{Duration, Instant};

fn remote(name: &str, key: &str, ip: &str) -> Remote {
    Remote::new(name, KeyCode::from_hex(key).unwrap(), ip.parse().unwrap())
}

// ============================================================================
// Remote Tests
// ============================================================================

#[tokio::test]
async fn test_remote_creation() {
    let r = remote("KITCHEN", "abcd1234", "192.168.1.40");

    assert_eq!(r.name, "KITCHEN");
    assert_eq!(r.key.to_hex(), "abcd1234");
    assert_eq!(r.ip, "192.168.1.40".parse::<IpAddr>().unwrap());
}

#[tokio::test]
async fn test_remote_bridge_addr() {
    let r = remote("KITCHEN", "abcd1234", "192.168.1.40");

    let addr = r.bridge_addr(BRIDGE_PORT);
    assert_eq!(addr.to_string(), "192.168.1.40:26258");
}

#[tokio::test]
async fn test_remote_stable_id_reproducible() {
    let a = remote("KITCHEN", "abcd1234", "192.168.1.40");
    let b = remote("KITCHEN", "abcd1234", "192.168.1.41");
    let c = remote("GARAGE", "abcd1234", "192.168.1.40");

    assert_eq!(
        a.stable_id(),
        b.stable_id(),
        "Identity is (name, key), not the bridge address"
    );
    assert_ne!(a.stable_id(), c.stable_id(), "Name is part of the identity");
}

#[tokio::test]
async fn test_remote_serde_roundtrip() {
    let r = remote("KITCHEN", "abcd1234", "192.168.1.40");

    let json = serde_json::to_string(&r).unwrap();
    assert!(json.contains("\"abcd1234\""), "Key serializes as hex string");

    let back: Remote = serde_json::from_str(&json).unwrap();
    assert_eq!(back, r);
}

// ============================================================================
// DiscoveryConfig Tests
// ============================================================================

#[tokio::test]
async fn test_discovery_config_default() {
    let config = DiscoveryConfig::default();

    assert_eq!(config.port, BRIDGE_PORT, "Default port should be 26258");
    assert_eq!(config.broadcast_addr.to_string(), "255.255.255.255");
    assert_eq!(config.timeout, Duration::from_secs(10));
}

// ============================================================================
// Discovery Registry Tests
// ============================================================================

#[tokio::test]
async fn test_registry_starts_empty() {
    let discovery = Discovery::new();
    assert_eq!(discovery.remotes().count(), 0);
}

#[tokio::test]
async fn test_registry_add_get_remove() {
    let mut discovery = Discovery::new();
    let r = remote("KITCHEN", "abcd1234", "192.168.1.40");
    let id = r.stable_id();

    discovery.add(r.clone());
    assert_eq!(discovery.remotes().count(), 1);
    assert_eq!(discovery.get(&id), Some(&r));

    let removed = discovery.remove(&id);
    assert_eq!(removed, Some(r));
    assert_eq!(discovery.remotes().count(), 0);
    assert!(discovery.get(&id).is_none());
}

#[tokio::test]
async fn test_registry_same_identity_overwrites() {
    let mut discovery = Discovery::new();

    // Same remote seen from two addresses: one registry slot.
    discovery.add(remote("KITCHEN", "abcd1234", "192.168.1.40"));
    discovery.add(remote("KITCHEN", "abcd1234", "192.168.1.99"));

    assert_eq!(discovery.remotes().count(), 1);
    let kept = discovery.remotes().next().unwrap();
    assert_eq!(kept.ip.to_string(), "192.168.1.99");
}

// ============================================================================
// Event Tests
// ============================================================================

#[tokio::test]
async fn test_discovery_event_found() {
    let event = DiscoveryEvent::Found(remote("KITCHEN", "abcd1234", "192.168.1.40"));

    match event {
        DiscoveryEvent::Found(r) => assert_eq!(r.name, "KITCHEN"),
        _ => panic!("Expected Found event variant"),
    }
}

// ============================================================================
// Loopback Network Tests
// ============================================================================

#[tokio::test]
async fn test_responder_bind() {
    let result = BridgeResponder::bind(
        0, // Let OS choose port
        vec![RemoteEntry::new("TEST", KeyCode::new([1, 2, 3, 4]))],
    )
    .await;

    assert!(
        result.is_ok(),
        "Should be able to bind a bridge responder: {:?}",
        result.err()
    );
}

#[tokio::test]
async fn test_discovery_against_loopback_responder() {
    let responder = BridgeResponder::bind(
        0,
        vec![
            RemoteEntry::new("KITCHEN", KeyCode::from_hex("abcd1234").unwrap()),
            RemoteEntry::new("GARAGE", KeyCode::from_hex("00112233").unwrap()),
        ],
    )
    .await
    .unwrap();
    let port = responder.local_addr().unwrap().port();

    let server = tokio::spawn(async move { responder.run().await });

    let mut discovery = Discovery::with_config(DiscoveryConfig {
        port,
        broadcast_addr: "127.0.0.1".parse().unwrap(),
        timeout: Duration::from_millis(500),
    });

    let found = discovery.run_once().await.unwrap();

    assert_eq!(found.len(), 2, "Both advertised remotes should be found");
    assert_eq!(found[0].name, "KITCHEN");
    assert_eq!(found[0].key.to_hex(), "abcd1234");
    assert_eq!(found[0].ip.to_string(), "127.0.0.1");
    assert_eq!(found[1].name, "GARAGE");

    assert_eq!(discovery.remotes().count(), 2);

    server.abort();
}

#[tokio::test]
async fn test_discovery_silence_times_out_empty() {
    // Probe an unused loopback port: nothing answers, the session must
    // return empty once the window elapses rather than blocking.
    let timeout = Duration::from_millis(300);
    let mut discovery = Discovery::with_config(DiscoveryConfig {
        port: 1, // No responder here
        broadcast_addr: "127.0.0.1".parse().unwrap(),
        timeout,
    });

    let started = Instant::now();
    let found = discovery.run_once().await.unwrap();
    let elapsed = started.elapsed();

    assert!(found.is_empty(), "Nothing should be discovered");
    assert!(
        elapsed >= timeout,
        "Session must not end before the window closes ({:?})",
        elapsed
    );
    assert!(
        elapsed < timeout + Duration::from_secs(2),
        "Session must terminate shortly after the window ({:?})",
        elapsed
    );
}

#[tokio::test]
async fn test_responder_ignores_garbage() {
    use rflink_transport::{TransportEvent, UdpTransport};

    let responder = BridgeResponder::bind(
        0,
        vec![RemoteEntry::new("KITCHEN", KeyCode::new([1, 2, 3, 4]))],
    )
    .await
    .unwrap();
    let addr = responder.local_addr().unwrap();
    let target = format!("127.0.0.1:{}", addr.port()).parse().unwrap();

    let server = tokio::spawn(async move { responder.run().await });

    let probe_socket = UdpTransport::bind("127.0.0.1:0").await.unwrap();
    let mut receiver = probe_socket.start_receiver();

    // Garbage first: must be ignored, not answered.
    probe_socket.send_to(b"not a probe", target).await.unwrap();
    // Then a real probe.
    probe_socket
        .send_to(&rflink_core::DISCOVERY_PROBE, target)
        .await
        .unwrap();

    let (event, from) = receiver.recv_from().await.unwrap();
    assert_eq!(from, target, "Reply should come from the responder");
    match event {
        TransportEvent::Data(data) => {
            let entries = rflink_core::wire::decode_reply(&data).unwrap();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].name, "KITCHEN");
        }
        _ => panic!("Expected Data event"),
    }

    server.abort();
}
