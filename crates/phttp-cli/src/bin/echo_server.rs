//! Demo PHTTP echo server.
//!
//! Replies to every request with `(200, "OK")`, the request's own headers,
//! and the request's own body.

use std::sync::Arc;

use clap::Parser;
use phttp_proto::{Request, Response, ResponseLine};
use phttp_server::{FnHandler, PhttpServer, ServerConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// PHTTP echo server
#[derive(Parser, Debug)]
#[command(name = "phttp-echo-server")]
#[command(about = "Echoes every request back as a 200 response")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0:7878")]
    bind: String,

    /// Maximum number of ids a single connection may stage at once
    #[arg(long, default_value = "4096")]
    max_staging_ids: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let addr = args.bind.parse()?;
    let config = ServerConfig { max_staging_ids: args.max_staging_ids, ..ServerConfig::default() };
    let handler = Arc::new(FnHandler(|request: Request| async move {
        let mut response = Response::new(ResponseLine::new(200, "OK"), request.headers);
        response.body = request.body;
        response
    }));

    let server = PhttpServer::bind(addr, handler, config).await?;
    tracing::info!(addr = %server.local_addr()?, "echo server listening");
    server.run().await?;
    Ok(())
}
