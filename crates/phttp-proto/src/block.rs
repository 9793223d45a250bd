//! `Block`: the on-wire frame unit.
//!
//! A `Block` is an 8-byte little-endian header `(id: i32, length: u32)`
//! followed by `length` bytes of opaque payload. Three `Block`s sharing one
//! id and sent in order `line, headers, body` make up one logical PHTTP
//! message (see [`crate::payloads`]).

use bytes::{BufMut, Bytes};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::errors::{ProtocolError, Result};

/// Fixed 8-byte block header, little-endian `(id, length)`.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
struct BlockHeader {
    id: [u8; 4],
    length: [u8; 4],
}

impl BlockHeader {
    const SIZE: usize = 8;

    fn new(id: i32, length: u32) -> Self {
        Self { id: id.to_le_bytes(), length: length.to_le_bytes() }
    }

    fn id(&self) -> i32 {
        i32::from_le_bytes(self.id)
    }

    fn length(&self) -> u32 {
        u32::from_le_bytes(self.length)
    }

    fn set_id(&mut self, id: i32) {
        self.id = id.to_le_bytes();
    }

    fn to_bytes(self) -> [u8; Self::SIZE] {
        let bytes = IntoBytes::as_bytes(&self);
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(bytes);
        arr
    }
}

/// A framed byte buffer: an 8-byte header plus its payload.
///
/// Single-owner, move-only by Rust's usual value semantics. `id` is mutable
/// until the block is handed to [`crate::Endpoint::put`]; `length` is fixed
/// at construction and always matches `payload.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    header: BlockHeader,
    payload: Bytes,
}

impl Block {
    /// Size of the serialized header in bytes.
    pub const HEADER_SIZE: usize = BlockHeader::SIZE;

    /// Upper bound on a block's payload size. Not part of the wire format —
    /// a defensive cap so a peer cannot force an unbounded allocation by
    /// declaring an enormous length (spec §9's staging-growth concern,
    /// applied to a single block rather than the staging table).
    pub const MAX_PAYLOAD_SIZE: u32 = 64 * 1024 * 1024;

    /// Reserved id for a shutdown request control frame.
    pub const SHUTDOWN_ID: i32 = -1;

    /// Reserved id for a shutdown acknowledgement control frame.
    pub const SHUTDOWN_ACK_ID: i32 = -2;

    /// Build a block with an assigned id.
    ///
    /// # Panics
    ///
    /// Panics if `payload.len()` does not fit in a `u32`. In practice this
    /// cannot happen for payloads under [`Self::MAX_PAYLOAD_SIZE`].
    #[must_use]
    pub fn new(id: i32, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        #[allow(clippy::expect_used)]
        let length = u32::try_from(payload.len()).expect("payload length fits in u32");
        Self { header: BlockHeader::new(id, length), payload }
    }

    /// Build a block with id `0`, to be assigned later via [`Self::set_id`].
    ///
    /// Mirrors the two-argument `(length, memory)` constructor used before a
    /// client endpoint has chosen a correlation id for an outgoing message.
    #[must_use]
    pub fn unassigned(payload: impl Into<Bytes>) -> Self {
        Self::new(0, payload)
    }

    /// A zero-length shutdown-request control block (id `-1`).
    #[must_use]
    pub fn shutdown() -> Self {
        Self::new(Self::SHUTDOWN_ID, Bytes::new())
    }

    /// A zero-length shutdown-acknowledgement control block (id `-2`).
    #[must_use]
    pub fn shutdown_ack() -> Self {
        Self::new(Self::SHUTDOWN_ACK_ID, Bytes::new())
    }

    /// Reassemble a block from an id and already-read payload bytes.
    ///
    /// Used by the transport layer after it has read exactly `length` bytes
    /// off the wire (see spec §4.3); validates the payload against
    /// [`Self::MAX_PAYLOAD_SIZE`].
    pub fn from_parts(id: i32, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        if payload.len() as u64 > u64::from(Self::MAX_PAYLOAD_SIZE) {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload.len(),
                max: Self::MAX_PAYLOAD_SIZE as usize,
            });
        }
        Ok(Self::new(id, payload))
    }

    /// Update the correlation id. Only meaningful before the block is sent.
    pub fn set_id(&mut self, id: i32) {
        self.header.set_id(id);
    }

    /// The correlation id. Negative values are reserved control ids.
    #[must_use]
    pub fn id(&self) -> i32 {
        self.header.id()
    }

    /// True if this block carries a reserved control id (`-1` or `-2`).
    #[must_use]
    pub fn is_control(&self) -> bool {
        self.id() < 0
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.header.length()
    }

    /// True if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.header.length() == 0
    }

    /// Borrowed payload bytes, header excluded.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.payload
    }

    /// Owned payload bytes, header excluded.
    #[must_use]
    pub fn into_content(self) -> Bytes {
        self.payload
    }

    /// Decode an 8-byte header prefix, returning `(id, declared length)`.
    ///
    /// Does not read or validate the payload; callers use the declared
    /// length to know how many more bytes to read from the wire.
    pub fn decode_header(bytes: &[u8]) -> Result<(i32, u32)> {
        let header = BlockHeader::ref_from_bytes(bytes).map_err(|_| ProtocolError::Truncated {
            expected: BlockHeader::SIZE,
            actual: bytes.len(),
        })?;
        let length = header.length();
        if length > Self::MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: length as usize,
                max: Self::MAX_PAYLOAD_SIZE as usize,
            });
        }
        Ok((header.id(), length))
    }

    /// Encode the full wire frame (header + payload) into `dst`.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.header.to_bytes());
        dst.put_slice(&self.payload);
    }

    /// Encode the full wire frame into a freshly allocated buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::HEADER_SIZE + self.payload.len());
        self.encode(&mut buf);
        buf
    }
}
