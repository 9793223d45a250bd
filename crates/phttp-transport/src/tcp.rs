//! TCP-backed [`Endpoint`] and listener/connector helpers.

use std::{
    net::SocketAddr,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use phttp_proto::Block;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpListener, TcpStream,
    },
    sync::Mutex,
};

use crate::{endpoint::Endpoint, error::TransportError};

/// A [`Endpoint`] backed by a single `TcpStream`.
///
/// Read and write halves are each behind their own `tokio::sync::Mutex` so
/// `put`/`get` can be called concurrently from different tasks (the client
/// and server endpoints do exactly that: one task reads in a loop while
/// others write under their own serialization discipline).
pub struct TcpEndpoint {
    reader: Mutex<OwnedReadHalf>,
    writer: Mutex<OwnedWriteHalf>,
    peer: SocketAddr,
    closed: AtomicBool,
}

impl TcpEndpoint {
    /// Wrap an already-connected stream.
    #[must_use]
    pub fn new(stream: TcpStream) -> Self {
        let peer = stream.peer_addr().unwrap_or_else(|_| ([0, 0, 0, 0], 0).into());
        let (read, write) = stream.into_split();
        Self { reader: Mutex::new(read), writer: Mutex::new(write), peer, closed: AtomicBool::new(false) }
    }

    /// Connect to `addr` and wrap the resulting stream.
    pub async fn connect(addr: SocketAddr) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }
}

#[async_trait]
impl Endpoint for TcpEndpoint {
    async fn put(&self, block: Block) -> Result<(), TransportError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TransportError::Closed);
        }
        let wire = block.to_bytes();
        let mut writer = self.writer.lock().await;
        writer.write_all(&wire).await?;
        Ok(())
    }

    async fn get(&self) -> Result<Block, TransportError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TransportError::Closed);
        }
        let mut reader = self.reader.lock().await;

        let mut header = [0u8; Block::HEADER_SIZE];
        match reader.read_exact(&mut header).await {
            Ok(_) => {},
            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(TransportError::Closed)
            },
            Err(err) => return Err(err.into()),
        }
        let (id, length) = Block::decode_header(&header)?;

        let mut payload = vec![0u8; length as usize];
        if length > 0 {
            reader.read_exact(&mut payload).await.map_err(|err| {
                if err.kind() == std::io::ErrorKind::UnexpectedEof {
                    TransportError::Closed
                } else {
                    TransportError::Io(err)
                }
            })?;
        }
        Ok(Block::from_parts(id, payload)?)
    }

    async fn close(&self) -> Result<(), TransportError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let mut writer = self.writer.lock().await;
        match writer.shutdown().await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn peer(&self) -> SocketAddr {
        self.peer
    }
}

/// A TCP listener that hands out [`TcpEndpoint`]s.
pub struct PhttpListener {
    inner: TcpListener,
}

impl PhttpListener {
    /// Bind a listener to `addr`.
    pub async fn bind(addr: SocketAddr) -> Result<Self, TransportError> {
        let inner = TcpListener::bind(addr).await?;
        Ok(Self { inner })
    }

    /// The address this listener is actually bound to (useful for `:0`).
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.inner.local_addr()?)
    }

    /// Accept the next inbound connection.
    pub async fn accept(&self) -> Result<TcpEndpoint, TransportError> {
        let (stream, _addr) = self.inner.accept().await?;
        stream.set_nodelay(true)?;
        Ok(TcpEndpoint::new(stream))
    }
}

/// Connect to a PHTTP server at `addr`, returning a ready [`TcpEndpoint`].
pub async fn connect(addr: SocketAddr) -> Result<TcpEndpoint, TransportError> {
    TcpEndpoint::connect(addr).await
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A client endpoint can put a block and the server side of the same
    /// loopback connection can get it back intact.
    #[tokio::test]
    async fn loopback_put_get_round_trip() {
        let listener = PhttpListener::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move { listener.accept().await.unwrap() });
        let client = TcpEndpoint::connect(addr).await.unwrap();
        let server = server.await.unwrap();

        client.put(Block::new(7, b"hello".to_vec())).await.unwrap();
        let received = server.get().await.unwrap();
        assert_eq!(received.id(), 7);
        assert_eq!(received.content(), b"hello");
    }

    #[tokio::test]
    async fn get_after_peer_shutdown_is_closed() {
        let listener = PhttpListener::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move { listener.accept().await.unwrap() });
        let client = TcpEndpoint::connect(addr).await.unwrap();
        let server = server.await.unwrap();

        client.close().await.unwrap();
        let err = server.get().await.unwrap_err();
        assert!(matches!(err, TransportError::Closed));
    }
}
