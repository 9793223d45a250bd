use std::time::Duration;

/// Tunables for a [`crate::ClientEndpoint`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Upper bound on the number of ids the receive worker will stage
    /// partial triples for at once. Mirrors `phttp_server`'s staging cap,
    /// applied here to responses multiplexed back from the server.
    pub max_staging_ids: usize,
    /// Upper bound on how long [`crate::ClientEndpoint::close`] waits for
    /// the receive worker to finish draining after the shutdown frame and
    /// transport close are sent, before giving up on it.
    pub shutdown_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { max_staging_ids: 4096, shutdown_timeout: Duration::from_secs(5) }
    }
}
