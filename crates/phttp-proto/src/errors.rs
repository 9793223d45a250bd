//! Error types for wire framing and the message codec.

use thiserror::Error;

/// Result alias for fallible codec/framing operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while decoding a [`crate::Block`] or one of the message
/// payload shapes packed into it (`RequestLine`, `ResponseLine`, `Headers`).
///
/// All variants correspond to the *malformed-frame* error class: they are
/// surfaced to whichever caller triggered the decode and never indicate a
/// bug in this crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A declared length (block payload, or a length-prefixed string/count
    /// inside a payload) claims more bytes than are actually present.
    #[error("truncated frame: expected at least {expected} bytes, found {actual}")]
    Truncated {
        /// Bytes the declared length required.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// A declared block payload length exceeds [`crate::Block::MAX_PAYLOAD_SIZE`].
    #[error("payload too large: {size} bytes exceeds limit of {max} bytes")]
    PayloadTooLarge {
        /// Declared size.
        size: usize,
        /// Configured limit.
        max: usize,
    },

    /// The receiver would need to stage more distinct in-flight ids than its
    /// configured cap allows. Guards against a peer announcing many ids
    /// without ever completing their triples (see spec §9, staging slot
    /// growth).
    #[error("too many pending message ids: limit is {limit}")]
    TooManyPendingIds {
        /// Configured cap.
        limit: usize,
    },

    /// A length-prefixed string field contained bytes that are not valid
    /// UTF-8. The wire format is UTF-8-opaque byte sequences, not arbitrary
    /// binary, so this is a malformed frame rather than something the codec
    /// papers over.
    #[error("field is not valid UTF-8")]
    InvalidUtf8,
}
