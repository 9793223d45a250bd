//! `Request`/`Response` aggregates and the per-id staging slot used by both
//! endpoints to reassemble a three-block message off the wire.

use crate::{
    block::Block,
    errors::{ProtocolError, Result},
    headers::Headers,
    line::{RequestLine, ResponseLine},
};

/// A complete outgoing or decoded incoming request: line, headers, and an
/// opaque body block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Verb/version/resource line.
    pub line: RequestLine,
    /// Header map.
    pub headers: Headers,
    /// Opaque body bytes, carried as a block so no copy is needed to send it.
    pub body: Block,
}

impl Request {
    /// Build a request with an empty body.
    #[must_use]
    pub fn new(line: RequestLine, headers: Headers) -> Self {
        Self { line, headers, body: Block::unassigned(Vec::new()) }
    }

    /// Pack into the three wire blocks for `id`, in transmission order
    /// `line, headers, body`.
    #[must_use]
    pub fn into_blocks(self, id: i32) -> [Block; 3] {
        let line = self.line.pack(id);
        let headers = self.headers.pack(id);
        let mut body = self.body;
        body.set_id(id);
        [line, headers, body]
    }

    /// Decode from a completed three-block triple.
    pub fn from_blocks(blocks: [Block; 3]) -> Result<Self> {
        let [line_block, headers_block, body] = blocks;
        let line = RequestLine::unpack(&line_block)?;
        let headers = Headers::unpack(&headers_block)?;
        Ok(Self { line, headers, body })
    }
}

/// A complete outgoing or decoded incoming response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status line.
    pub line: ResponseLine,
    /// Header map.
    pub headers: Headers,
    /// Opaque body bytes.
    pub body: Block,
}

impl Response {
    /// Build a response with an empty body.
    #[must_use]
    pub fn new(line: ResponseLine, headers: Headers) -> Self {
        Self { line, headers, body: Block::unassigned(Vec::new()) }
    }

    /// A synthetic `500 Internal Server Error` response with no headers and
    /// an empty body. Sent in place of a reply when a handler fails, so a
    /// client's `exec` resolves instead of waiting forever (spec §4.5/§9).
    #[must_use]
    pub fn internal_error() -> Self {
        Self::new(ResponseLine::new(500, "Internal Server Error"), Headers::new())
    }

    /// Pack into the three wire blocks for `id`, in transmission order
    /// `line, headers, body`.
    #[must_use]
    pub fn into_blocks(self, id: i32) -> [Block; 3] {
        let line = self.line.pack(id);
        let headers = self.headers.pack(id);
        let mut body = self.body;
        body.set_id(id);
        [line, headers, body]
    }

    /// Decode from a completed three-block triple.
    pub fn from_blocks(blocks: [Block; 3]) -> Result<Self> {
        let [line_block, headers_block, body] = blocks;
        let line = ResponseLine::unpack(&line_block)?;
        let headers = Headers::unpack(&headers_block)?;
        Ok(Self { line, headers, body })
    }
}

/// Per-id reassembly buffer on the receiver.
///
/// Created on the first block observed for an id, destroyed (via
/// [`Self::take`]) once the third block arrives. Blocks for the same id
/// arrive in order `line, headers, body`, but blocks for other ids may
/// interleave between them (spec invariant I1).
#[derive(Debug, Default)]
pub struct StagingSlot {
    stage: usize,
    blocks: [Option<Block>; 3],
}

impl StagingSlot {
    /// A fresh, empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the next block for this id. Returns `true` once the third
    /// block has been placed and the triple is ready for [`Self::take`].
    ///
    /// Returns [`ProtocolError::TooManyPendingIds`]-adjacent misuse as a
    /// protocol violation if called a fourth time for the same slot — per
    /// spec §4.5, a peer extending an already-full slot is dropped rather
    /// than accepted.
    pub fn push(&mut self, block: Block) -> Result<bool> {
        if self.stage >= 3 {
            return Err(ProtocolError::Truncated { expected: 3, actual: self.stage + 1 });
        }
        self.blocks[self.stage] = Some(block);
        self.stage += 1;
        Ok(self.stage == 3)
    }

    /// Consume a completed triple. Panics if called before the third block
    /// has been placed — callers only call this after [`Self::push`]
    /// returns `true`.
    #[must_use]
    pub fn take(self) -> [Block; 3] {
        let [a, b, c] = self.blocks;
        #[allow(clippy::expect_used)]
        [a.expect("staged slot complete"), b.expect("staged slot complete"), c.expect("staged slot complete")]
    }
}
