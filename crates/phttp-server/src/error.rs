//! Server-side error types.

use phttp_proto::ProtocolError;
use phttp_transport::TransportError;
use thiserror::Error;

/// Result alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that terminate a [`crate::ServerEndpoint::run`] loop.
///
/// Handler failures are not represented here: a panicking or erroring
/// handler is absorbed into a synthesized `500` [`phttp_proto::Response`]
/// rather than tearing the connection down.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A received block or triple failed to decode, or the connection
    /// exceeded its staging cap.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
