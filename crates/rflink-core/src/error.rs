//! Error types for rflink protocol codecs

use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Protocol codec errors
#[derive(Error, Debug)]
pub enum Error {
    /// Reply datagram does not carry the expected magic byte
    #[error("invalid reply magic: expected 0x02, got 0x{0:02x}")]
    InvalidMagic(u8),

    /// Reply datagram shorter than its fixed header
    #[error("buffer too small: need {needed} bytes, have {have}")]
    BufferTooSmall { needed: usize, have: usize },

    /// Key code string is not exactly 8 hex characters
    #[error("invalid key code {0:?}: expected 8 hex characters")]
    InvalidKeyCode(String),

    /// More remote entries than a single reply can carry
    #[error("too many remote entries: {0} (max 255)")]
    TooManyEntries(usize),
}
