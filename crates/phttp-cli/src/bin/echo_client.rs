//! Demo PHTTP echo client.
//!
//! Sends one `ECHO` request with a given body and prints the response.

use clap::Parser;
use phttp_client::{ClientConfig, ClientEndpoint};
use phttp_proto::{Headers, Request, RequestLine};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// PHTTP echo client
#[derive(Parser, Debug)]
#[command(name = "phttp-echo-client")]
#[command(about = "Sends a single ECHO request and prints the response")]
#[command(version)]
struct Args {
    /// Server address to connect to
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    connect: String,

    /// Body to send
    #[arg(short, long, default_value = "hello, phttp")]
    message: String,

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

    let addr = args.connect.parse()?;
    let client = ClientEndpoint::connect(addr, ClientConfig::default()).await?;

    let mut request = Request::new(RequestLine::new("ECHO", "/"), Headers::new());
    request.body = phttp_proto::Block::unassigned(args.message.clone().into_bytes());

    let response = client.exec(request).await?;
    tracing::info!(
        code = response.line.code,
        message = %response.line.message,
        body = %String::from_utf8_lossy(response.body.content()),
        "received response"
    );

    client.close().await?;
    Ok(())
}
