use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex as StdMutex,
    },
};

use phttp_proto::{Block, ProtocolError, Request, Response, StagingSlot};
use phttp_transport::{connect, Endpoint};
use tokio::{sync::oneshot, task::JoinHandle};
use tracing::{debug, warn};

use crate::{config::ClientConfig, error::ClientError};

type Promise = oneshot::Sender<Result<Response, ClientError>>;

struct PromiseTable {
    next_id: i32,
    promises: HashMap<i32, Promise>,
}

impl PromiseTable {
    fn new() -> Self {
        Self { next_id: 0, promises: HashMap::new() }
    }

    /// Allocate the next correlation id, scanning forward for one with no
    /// registered promise. Ids are never negative — those are reserved for
    /// control frames.
    fn register(&mut self, tx: Promise) -> i32 {
        loop {
            self.next_id = self.next_id.wrapping_add(1);
            if self.next_id < 0 {
                self.next_id = 0;
            }
            if !self.promises.contains_key(&self.next_id) {
                self.promises.insert(self.next_id, tx);
                return self.next_id;
            }
        }
    }

    fn take(&mut self, id: i32) -> Option<Promise> {
        self.promises.remove(&id)
    }

    fn drain(&mut self) -> Vec<Promise> {
        self.promises.drain().map(|(_, tx)| tx).collect()
    }
}

/// A client-side PHTTP endpoint.
///
/// Wraps an [`Endpoint`] with a promise table that correlates outgoing
/// requests to their eventual responses, letting callers `await` on
/// [`ClientEndpoint::exec`] while a single background task drains the
/// connection.
pub struct ClientEndpoint {
    endpoint: Arc<dyn Endpoint>,
    table: Arc<StdMutex<PromiseTable>>,
    send_lock: tokio::sync::Mutex<()>,
    down: AtomicBool,
    receiver: StdMutex<Option<JoinHandle<()>>>,
    shutdown_timeout: std::time::Duration,
}

impl ClientEndpoint {
    /// Connect to a PHTTP server over TCP.
    pub async fn connect(addr: SocketAddr, config: ClientConfig) -> Result<Self, ClientError> {
        let endpoint: Arc<dyn Endpoint> = Arc::new(connect(addr).await?);
        Ok(Self::from_endpoint(endpoint, config))
    }

    /// Wrap an already-connected endpoint, spawning the receive worker.
    #[must_use]
    pub fn from_endpoint(endpoint: Arc<dyn Endpoint>, config: ClientConfig) -> Self {
        let table = Arc::new(StdMutex::new(PromiseTable::new()));
        let receiver = spawn_receive_worker(endpoint.clone(), table.clone(), config.max_staging_ids);
        Self {
            endpoint,
            table,
            send_lock: tokio::sync::Mutex::new(()),
            down: AtomicBool::new(false),
            receiver: StdMutex::new(Some(receiver)),
            shutdown_timeout: config.shutdown_timeout,
        }
    }

    /// The peer's socket address.
    #[must_use]
    pub fn peer(&self) -> SocketAddr {
        self.endpoint.peer()
    }

    /// Send `request` and await its response.
    ///
    /// Returns [`ClientError::ChannelClosed`] if the endpoint is already
    /// closed, or if it closes before a response arrives.
    pub async fn exec(&self, request: Request) -> Result<Response, ClientError> {
        if self.down.load(Ordering::Acquire) {
            return Err(ClientError::ChannelClosed);
        }

        let (tx, rx) = oneshot::channel();
        let id = self.table.lock().unwrap_or_else(|e| e.into_inner()).register(tx);

        let blocks = request.into_blocks(id);
        {
            let _guard = self.send_lock.lock().await;
            for block in blocks {
                if let Err(err) = self.endpoint.put(block).await {
                    self.table.lock().unwrap_or_else(|e| e.into_inner()).take(id);
                    return Err(ClientError::Transport(err));
                }
            }
        }

        rx.await.unwrap_or(Err(ClientError::ChannelClosed))
    }

    /// Shut the connection down.
    ///
    /// Sends a best-effort shutdown control frame, then unconditionally
    /// fails every still-registered promise with
    /// [`ClientError::ChannelClosed`] rather than waiting for the peer's
    /// acknowledgement — a dead transport must never make this hang.
    pub async fn close(&self) -> Result<(), ClientError> {
        if self.down.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        {
            let _guard = self.send_lock.lock().await;
            if let Err(err) = self.endpoint.put(Block::shutdown()).await {
                debug!(?err, "best-effort shutdown frame failed to send");
            }
        }

        for tx in self.table.lock().unwrap_or_else(|e| e.into_inner()).drain() {
            let _ = tx.send(Err(ClientError::ChannelClosed));
        }

        self.endpoint.close().await?;

        if let Some(handle) = self.receiver.lock().unwrap_or_else(|e| e.into_inner()).take() {
            if tokio::time::timeout(self.shutdown_timeout, handle).await.is_err() {
                warn!("receive worker did not finish draining within the shutdown timeout");
            }
        }
        Ok(())
    }
}

fn spawn_receive_worker(
    endpoint: Arc<dyn Endpoint>,
    table: Arc<StdMutex<PromiseTable>>,
    max_staging_ids: usize,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut staging: HashMap<i32, StagingSlot> = HashMap::new();

        loop {
            let block = match endpoint.get().await {
                Ok(block) => block,
                Err(err) => {
                    debug!(?err, "receive worker stopping");
                    break;
                },
            };

            if block.is_control() {
                if block.id() == Block::SHUTDOWN_ID {
                    let _ = endpoint.put(Block::shutdown_ack()).await;
                }
                // Any control id ends the connection: a shutdown request
                // has been acked above, and a shutdown ack (or any other
                // reserved id) means the peer is done talking to us even
                // if it has not yet closed the transport.
                break;
            }

            let id = block.id();
            if !staging.contains_key(&id) && staging.len() >= max_staging_ids {
                warn!(id, "dropping connection: too many pending response ids");
                break;
            }

            let slot = staging.entry(id).or_default();
            let complete = match slot.push(block) {
                Ok(complete) => complete,
                Err(err) => {
                    warn!(id, ?err, "malformed response triple");
                    staging.remove(&id);
                    continue;
                },
            };
            if !complete {
                continue;
            }
            #[allow(clippy::expect_used)]
            let triple = staging.remove(&id).expect("just completed").take();

            let Some(tx) = table.lock().unwrap_or_else(|e| e.into_inner()).take(id) else {
                // A dropped `exec` future only drops its `oneshot::Receiver`;
                // the table entry itself lives on until a response arrives
                // for it, so reaching here means the peer echoed an id this
                // table never registered — a bookkeeping violation, not a
                // benign race.
                let reason = format!("received a response for id {id} with no registered promise");
                warn!(id, %reason, "dropping connection: inconsistent promise table");
                for tx in table.lock().unwrap_or_else(|e| e.into_inner()).drain() {
                    let _ = tx.send(Err(ClientError::InconsistentState(reason.clone())));
                }
                break;
            };
            let resolved = decode_response(triple);
            let _ = tx.send(resolved);
        }

        for tx in table.lock().unwrap_or_else(|e| e.into_inner()).drain() {
            let _ = tx.send(Err(ClientError::ChannelClosed));
        }
    })
}

fn decode_response(triple: [Block; 3]) -> Result<Response, ClientError> {
    Response::from_blocks(triple).map_err(|err: ProtocolError| ClientError::Protocol(err))
}
