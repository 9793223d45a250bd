use std::{
    collections::HashMap,
    net::SocketAddr,
    panic::AssertUnwindSafe,
    sync::{Arc, Mutex as StdMutex},
};

use futures::FutureExt;
use phttp_proto::{Block, ProtocolError, Request, Response, StagingSlot};
use phttp_transport::{Endpoint, TransportError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{config::ServerConfig, error::ServerError, handler::Handler};

/// A server-side PHTTP endpoint.
///
/// Reads complete request triples off an [`Endpoint`], dispatches each to
/// a [`Handler`] on its own task, and writes the resulting response back
/// under a send mutex so replies for different ids never interleave their
/// three blocks.
#[derive(Clone)]
pub struct ServerEndpoint {
    endpoint: Arc<dyn Endpoint>,
    handler: Arc<dyn Handler>,
    config: ServerConfig,
    inflight: Arc<StdMutex<HashMap<i32, JoinHandle<()>>>>,
    send_lock: Arc<tokio::sync::Mutex<()>>,
}

impl ServerEndpoint {
    /// Wrap an endpoint and a handler.
    #[must_use]
    pub fn new(endpoint: Arc<dyn Endpoint>, handler: Arc<dyn Handler>, config: ServerConfig) -> Self {
        Self {
            endpoint,
            handler,
            config,
            inflight: Arc::new(StdMutex::new(HashMap::new())),
            send_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// The peer's socket address.
    #[must_use]
    pub fn peer(&self) -> SocketAddr {
        self.endpoint.peer()
    }

    /// Drive the connection until the peer closes it or sends a shutdown
    /// request, dispatching each completed request to the handler.
    pub async fn run(&self) -> Result<(), ServerError> {
        let mut staging: HashMap<i32, StagingSlot> = HashMap::new();

        loop {
            let block = match self.endpoint.get().await {
                Ok(block) => block,
                Err(TransportError::Closed) => break,
                Err(err) => return Err(err.into()),
            };

            if block.is_control() {
                if block.id() == Block::SHUTDOWN_ID {
                    let _ = self.endpoint.put(Block::shutdown_ack()).await;
                    break;
                }
                continue;
            }

            let id = block.id();
            if !staging.contains_key(&id) && staging.len() >= self.config.max_staging_ids {
                return Err(ServerError::Protocol(ProtocolError::TooManyPendingIds {
                    limit: self.config.max_staging_ids,
                }));
            }

            let slot = staging.entry(id).or_default();
            let complete = match slot.push(block) {
                Ok(complete) => complete,
                Err(err) => {
                    warn!(id, ?err, "malformed request triple");
                    staging.remove(&id);
                    continue;
                },
            };
            if !complete {
                continue;
            }
            #[allow(clippy::expect_used)]
            let triple = staging.remove(&id).expect("just completed").take();

            let request = match Request::from_blocks(triple) {
                Ok(request) => request,
                Err(err) => {
                    warn!(id, ?err, "failed to decode request");
                    continue;
                },
            };

            let this = self.clone();
            let task = tokio::spawn(async move { this.dispatch(id, request).await });
            self.inflight.lock().unwrap_or_else(|e| e.into_inner()).insert(id, task);
        }

        self.close().await
    }

    async fn dispatch(&self, id: i32, request: Request) {
        let handler = self.handler.clone();
        let invocation = AssertUnwindSafe(handler.handle(request)).catch_unwind();

        let response = match self.config.handler_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, invocation).await {
                Ok(Ok(response)) => response,
                Ok(Err(_)) => {
                    warn!(id, "handler panicked");
                    Response::internal_error()
                },
                Err(_) => {
                    warn!(id, "handler exceeded its timeout");
                    Response::internal_error()
                },
            },
            None => match invocation.await {
                Ok(response) => response,
                Err(_) => {
                    warn!(id, "handler panicked");
                    Response::internal_error()
                },
            },
        };

        let blocks = response.into_blocks(id);
        {
            let _guard = self.send_lock.lock().await;
            for block in blocks {
                if let Err(err) = self.endpoint.put(block).await {
                    debug!(id, ?err, "failed to send response, peer likely gone");
                    break;
                }
            }
        }

        self.inflight.lock().unwrap_or_else(|e| e.into_inner()).remove(&id);
    }

    /// Send a shutdown control frame, await every in-flight handler to
    /// completion — so a handler that was about to reply still gets to send
    /// its response — and close the underlying transport. Idempotent; safe
    /// to call after [`Self::run`] returns.
    pub async fn close(&self) -> Result<(), ServerError> {
        {
            let _guard = self.send_lock.lock().await;
            if let Err(err) = self.endpoint.put(Block::shutdown()).await {
                debug!(?err, "best-effort shutdown frame failed to send");
            }
        }

        let handles: Vec<_> =
            self.inflight.lock().unwrap_or_else(|e| e.into_inner()).drain().map(|(_, handle)| handle).collect();
        for handle in handles {
            let _ = handle.await;
        }

        self.endpoint.close().await?;
        Ok(())
    }
}
