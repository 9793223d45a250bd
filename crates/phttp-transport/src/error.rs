//! Transport-level errors.

use phttp_proto::ProtocolError;
use thiserror::Error;

/// Result alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors surfaced by an [`crate::Endpoint`] implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying socket failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the connection, or this endpoint was closed locally.
    #[error("endpoint closed")]
    Closed,

    /// A block header or payload failed to decode.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
