//! Wire framing and message codec for the PHTTP protocol.
//!
//! A PHTTP message is three [`Block`]s sharing one correlation id, sent in
//! order `line, headers, body`. This crate owns the byte-level shape of
//! those blocks and the payloads packed into them; it has no opinion about
//! sockets, concurrency, or request/response correlation — that belongs to
//! `phttp-transport`, `phttp-client`, and `phttp-server`.

mod block;
mod codec;
mod errors;
mod headers;
mod line;
mod message;

pub use block::Block;
pub use codec::{get_count, get_i32, get_string, put_string};
pub use errors::{ProtocolError, Result};
pub use headers::Headers;
pub use line::{RequestLine, ResponseLine, DEFAULT_VERSION};
pub use message::{Request, Response, StagingSlot};
