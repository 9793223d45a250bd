//! TCP byte-frame transport for the PHTTP protocol.
//!
//! This crate owns exactly one concern: moving [`phttp_proto::Block`]s
//! across a socket reliably and in order. It knows nothing about message
//! correlation ids, promise tables, or handlers — that is `phttp-client`
//! and `phttp-server`.

mod endpoint;
mod error;
mod tcp;

pub use endpoint::Endpoint;
pub use error::{Result, TransportError};
pub use tcp::{connect, PhttpListener, TcpEndpoint};
