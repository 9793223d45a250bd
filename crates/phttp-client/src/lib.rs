//! Client-side PHTTP endpoint.
//!
//! [`ClientEndpoint`] sends a [`phttp_proto::Request`] and returns a future
//! that resolves once the correlated [`phttp_proto::Response`] triple has
//! arrived, using a promise table keyed by correlation id. A single
//! background task drains the transport and resolves promises as their
//! triples complete; ordering across distinct requests is not guaranteed,
//! matching the protocol's multiplexing model.

mod client;
mod config;
mod error;

pub use client::ClientEndpoint;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
