//! Client error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Key code could not be encoded; no packet was sent
    #[error("encoding error: {0}")]
    Encoding(#[from] rflink_core::Error),

    /// Transport-level failure handing the datagram off
    #[error("network error: {0}")]
    Network(#[from] rflink_transport::TransportError),
}
