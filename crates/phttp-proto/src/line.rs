//! `RequestLine` and `ResponseLine`: the first of the three blocks that make
//! up a PHTTP message.

use crate::{
    block::Block,
    codec::{get_i32, get_string, put_string},
    errors::Result,
};

/// Default protocol version stamped on a `RequestLine` when none is given.
pub const DEFAULT_VERSION: &str = "PHTTP/1.0";

/// `(verb, version, resource)` — the request-side line frame.
///
/// All three fields are UTF-8-opaque byte sequences; the codec preserves
/// them byte for byte (see [`crate::codec`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// HTTP-shaped verb, e.g. `"GET"`, `"ECHO"`.
    pub verb: String,
    /// Protocol version string, defaults to [`DEFAULT_VERSION`].
    pub version: String,
    /// Target resource path.
    pub resource: String,
}

impl RequestLine {
    /// Build a request line with the default version.
    #[must_use]
    pub fn new(verb: impl Into<String>, resource: impl Into<String>) -> Self {
        Self { verb: verb.into(), version: DEFAULT_VERSION.to_string(), resource: resource.into() }
    }

    /// Build a request line with an explicit version.
    #[must_use]
    pub fn with_version(
        verb: impl Into<String>,
        version: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self { verb: verb.into(), version: version.into(), resource: resource.into() }
    }

    /// Pack into a block stamped with `id`. Payload: `pack(verb) ++
    /// pack(version) ++ pack(resource)`.
    #[must_use]
    pub fn pack(&self, id: i32) -> Block {
        let mut buf = Vec::new();
        put_string(&mut buf, &self.verb);
        put_string(&mut buf, &self.version);
        put_string(&mut buf, &self.resource);
        Block::new(id, buf)
    }

    /// Unpack from a block's content.
    pub fn unpack(block: &Block) -> Result<Self> {
        let mut cursor = block.content();
        let verb = get_string(&mut cursor)?;
        let version = get_string(&mut cursor)?;
        let resource = get_string(&mut cursor)?;
        Ok(Self { verb, version, resource })
    }
}

/// `(code, message)` — the response-side line frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseLine {
    /// Status code, HTTP-shaped but not restricted to the HTTP range.
    pub code: i32,
    /// Status message.
    pub message: String,
}

impl ResponseLine {
    /// Build a response line.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Pack into a block stamped with `id`. Payload: `[code] ++
    /// pack(message)`.
    #[must_use]
    pub fn pack(&self, id: i32) -> Block {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.code.to_le_bytes());
        put_string(&mut buf, &self.message);
        Block::new(id, buf)
    }

    /// Unpack from a block's content.
    pub fn unpack(block: &Block) -> Result<Self> {
        let mut cursor = block.content();
        let code = get_i32(&mut cursor)?;
        let message = get_string(&mut cursor)?;
        Ok(Self { code, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line_round_trip() {
        let line = RequestLine::new("POST", "TEST_RESOURCE/A");
        let block = line.pack(0);
        let decoded = RequestLine::unpack(&block).unwrap();
        assert_eq!(decoded.verb, "POST");
        assert_eq!(decoded.resource, "TEST_RESOURCE/A");
        assert_eq!(decoded.version, DEFAULT_VERSION);
    }

    #[test]
    fn response_line_round_trip() {
        let line = ResponseLine::new(20000, "SUCCESS");
        let block = line.pack(0);
        let decoded = ResponseLine::unpack(&block).unwrap();
        assert_eq!(decoded.code, 20000);
        assert_eq!(decoded.message, "SUCCESS");
    }

    #[test]
    fn request_line_with_explicit_version() {
        let line = RequestLine::with_version("GET", "PHTTP/2.0", "/x");
        let block = line.pack(7);
        assert_eq!(block.id(), 7);
        let decoded = RequestLine::unpack(&block).unwrap();
        assert_eq!(decoded.version, "PHTTP/2.0");
    }
}
