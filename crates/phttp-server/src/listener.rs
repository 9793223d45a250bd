use std::{net::SocketAddr, sync::Arc};

use phttp_transport::{Endpoint, PhttpListener};
use tracing::{info, warn};

use crate::{config::ServerConfig, error::ServerError, handler::Handler, server::ServerEndpoint};

/// A bound PHTTP server: accepts connections and runs one
/// [`ServerEndpoint`] per connection, each on its own task.
pub struct PhttpServer {
    listener: PhttpListener,
    handler: Arc<dyn Handler>,
    config: ServerConfig,
}

impl PhttpServer {
    /// Bind to `addr`.
    pub async fn bind(
        addr: SocketAddr,
        handler: Arc<dyn Handler>,
        config: ServerConfig,
    ) -> Result<Self, ServerError> {
        let listener = PhttpListener::bind(addr).await?;
        Ok(Self { listener, handler, config })
    }

    /// The address actually bound (useful when `addr` used port `0`).
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever, spawning a [`ServerEndpoint`] per
    /// connection. Returns only if accepting itself fails.
    pub async fn run(&self) -> Result<(), ServerError> {
        loop {
            let endpoint = self.listener.accept().await?;
            let peer = endpoint.peer();
            let server = ServerEndpoint::new(Arc::new(endpoint), self.handler.clone(), self.config.clone());

            tokio::spawn(async move {
                info!(%peer, "connection accepted");
                if let Err(err) = server.run().await {
                    warn!(%peer, ?err, "connection ended with an error");
                }
            });
        }
    }
}
