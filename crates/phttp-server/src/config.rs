use std::time::Duration;

/// Tunables for a [`crate::ServerEndpoint`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Upper bound on the number of ids with an incomplete triple staged at
    /// once. A peer that opens more than this many ids without completing
    /// any of them gets its connection torn down rather than allowed to
    /// grow the staging table without bound.
    pub max_staging_ids: usize,
    /// Soft deadline on a single handler invocation. `None` disables the
    /// timeout; a handler that never resolves then holds its request slot
    /// forever, which is the caller's choice to make.
    pub handler_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { max_staging_ids: 4096, handler_timeout: None }
    }
}
