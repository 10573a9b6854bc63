//! Bridge wire format
//!
//! Discovery reply layout:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ Byte 0:      Magic (0x02)                                       │
//! │ Bytes 1-6:   Reserved (opaque, ignored)                         │
//! │ Byte 7:      Remote count N (0-255)                             │
//! │ Bytes 8-11:  Reserved (opaque, ignored)                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ N entries of 64 bytes each, starting at offset 12:              │
//! │   Bytes 0-15:  Remote name (UTF-8, NUL padded)                  │
//! │   Bytes 16-19: Key code (4 raw bytes)                           │
//! │   Bytes 20-63: Reserved (opaque, ignored)                       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Command packet layout (8 bytes): `03 01 00 00` + 4 key code bytes.
//!
//! The reserved regions have unknown semantics on real devices; they are
//! ignored on decode and zeroed on encode.

use crate::{Error, KeyCode, Result, COMMAND_HEADER, DISCOVERY_PROBE, REPLY_MAGIC};
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

/// Fixed reply header size; entries start here
pub const REPLY_HEADER_SIZE: usize = 12;

/// Offset of the remote count byte in the reply header
pub const REPLY_COUNT_OFFSET: usize = 7;

/// Size of one remote entry
pub const ENTRY_SIZE: usize = 64;

/// Size of the NUL-padded name field at the start of each entry
pub const ENTRY_NAME_SIZE: usize = 16;

/// Total command packet size
pub const COMMAND_PACKET_SIZE: usize = 8;

/// One named remote advertised in a discovery reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    pub key: KeyCode,
}

impl RemoteEntry {
    pub fn new(name: impl Into<String>, key: KeyCode) -> Self {
        Self {
            name: name.into(),
            key,
        }
    }
}

/// The broadcast discovery probe payload
pub fn probe() -> Bytes {
    Bytes::from_static(&DISCOVERY_PROBE)
}

/// Encode a command packet for one key code
pub fn encode_command(key: &KeyCode) -> Bytes {
    let mut buf = BytesMut::with_capacity(COMMAND_PACKET_SIZE);
    buf.put_slice(&COMMAND_HEADER);
    buf.put_slice(key.as_bytes());
    buf.freeze()
}

/// Decode a discovery reply datagram into its remote entries.
///
/// A declared count that would read past the end of the datagram is
/// clamped: entries that fit fully are returned, the rest are dropped.
/// Entries whose name field trims to an empty string are dropped too.
pub fn decode_reply(buf: &[u8]) -> Result<Vec<RemoteEntry>> {
    if buf.is_empty() {
        return Err(Error::BufferTooSmall {
            needed: REPLY_HEADER_SIZE,
            have: 0,
        });
    }
    if buf[0] != REPLY_MAGIC {
        return Err(Error::InvalidMagic(buf[0]));
    }
    if buf.len() < REPLY_HEADER_SIZE {
        return Err(Error::BufferTooSmall {
            needed: REPLY_HEADER_SIZE,
            have: buf.len(),
        });
    }

    let declared = buf[REPLY_COUNT_OFFSET] as usize;
    let fits = (buf.len() - REPLY_HEADER_SIZE) / ENTRY_SIZE;
    let count = declared.min(fits);

    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let start = REPLY_HEADER_SIZE + i * ENTRY_SIZE;
        let entry = &buf[start..start + ENTRY_SIZE];

        let name = decode_name(&entry[..ENTRY_NAME_SIZE]);
        if name.is_empty() {
            continue;
        }

        let key = KeyCode::new([
            entry[ENTRY_NAME_SIZE],
            entry[ENTRY_NAME_SIZE + 1],
            entry[ENTRY_NAME_SIZE + 2],
            entry[ENTRY_NAME_SIZE + 3],
        ]);
        entries.push(RemoteEntry { name, key });
    }

    Ok(entries)
}

/// Encode a discovery reply advertising the given entries.
///
/// Used by the bridge responder; real devices produce the same layout.
/// Names longer than the 16-byte field are truncated.
pub fn encode_reply(entries: &[RemoteEntry]) -> Result<Bytes> {
    if entries.len() > u8::MAX as usize {
        return Err(Error::TooManyEntries(entries.len()));
    }

    let mut buf = BytesMut::zeroed(REPLY_HEADER_SIZE + entries.len() * ENTRY_SIZE);
    buf[0] = REPLY_MAGIC;
    buf[REPLY_COUNT_OFFSET] = entries.len() as u8;

    for (i, entry) in entries.iter().enumerate() {
        let start = REPLY_HEADER_SIZE + i * ENTRY_SIZE;

        let name_bytes = entry.name.as_bytes();
        let len = name_bytes.len().min(ENTRY_NAME_SIZE);
        buf[start..start + len].copy_from_slice(&name_bytes[..len]);

        let key_start = start + ENTRY_NAME_SIZE;
        buf[key_start..key_start + KeyCode::LEN].copy_from_slice(entry.key.as_bytes());
    }

    Ok(buf.freeze())
}

/// Decode a 16-byte name field: UTF-8, NULs stripped, whitespace trimmed.
fn decode_name(field: &[u8]) -> String {
    String::from_utf8_lossy(field)
        .chars()
        .filter(|&c| c != '\0')
        .collect::<String>()
        .trim()
        .to_string()
}
