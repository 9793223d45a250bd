//! Client-side error types.

use phttp_proto::ProtocolError;
use phttp_transport::TransportError;
use thiserror::Error;

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors an [`crate::ClientEndpoint`] can return from [`crate::ClientEndpoint::exec`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint is closed, or was closed while a request was in
    /// flight. Covers both an explicit [`crate::ClientEndpoint::close`]
    /// call and the receive worker observing the transport go away.
    #[error("client endpoint closed")]
    ChannelClosed,

    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A received block failed to decode.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The receive worker observed a response for an id with no registered
    /// promise, or some other state the promise table should never reach.
    /// Indicates a bug rather than a malformed peer.
    #[error("inconsistent client state: {0}")]
    InconsistentState(String),
}
