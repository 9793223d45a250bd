//! The byte-frame transport contract.

use std::net::SocketAddr;

use async_trait::async_trait;
use phttp_proto::Block;

use crate::error::TransportError;

/// A bidirectional channel for sending and receiving [`Block`]s.
///
/// Implementations only need to move whole blocks reliably and in order;
/// everything above this layer (message framing, correlation ids, request
/// dispatch) lives in `phttp-client`/`phttp-server`.
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Send a block. Blocks do not need to be flushed eagerly by callers —
    /// implementations are responsible for their own buffering guarantees.
    async fn put(&self, block: Block) -> Result<(), TransportError>;

    /// Receive the next block. Returns [`TransportError::Closed`] once the
    /// peer has shut its write half down and no more blocks will arrive.
    async fn get(&self) -> Result<Block, TransportError>;

    /// Shut the connection down. Idempotent.
    async fn close(&self) -> Result<(), TransportError>;

    /// The remote address this endpoint is connected to.
    fn peer(&self) -> SocketAddr;
}
