//! rflink Core
//!
//! Wire format and protocol primitives for Safemate-class RF-to-IP bridge
//! devices.
//!
//! This crate provides:
//! - Key code parsing and formatting ([`KeyCode`])
//! - Discovery reply decoding and encoding ([`wire`])
//! - Command packet construction ([`wire::encode_command`])
//!
//! All byte offsets in [`wire`] are protocol constants reverse-engineered
//! from observed device behavior; they cannot be changed without breaking
//! compatibility with deployed bridges.

pub mod error;
pub mod keycode;
pub mod wire;

pub use error::{Error, Result};
pub use keycode::KeyCode;
pub use wire::RemoteEntry;

/// UDP port used for both discovery and command traffic
pub const BRIDGE_PORT: u16 = 26258;

/// Broadcast discovery probe payload
pub const DISCOVERY_PROBE: [u8; 6] = [0x01, 0x01, 0x12, 0x00, 0x00, 0x00];

/// Magic byte identifying a discovery reply
pub const REPLY_MAGIC: u8 = 0x02;

/// Fixed header of a command packet
pub const COMMAND_HEADER: [u8; 4] = [0x03, 0x01, 0x00, 0x00];
