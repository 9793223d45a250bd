//! Length-prefixed string primitive shared by every payload shape.
//!
//! Every string on the wire is `[len: u32 little-endian][bytes]`. This is
//! the only primitive the line/header codecs build on; there is no type
//! tag, no padding, no checksum.

use bytes::{Buf, BufMut};

use crate::errors::{ProtocolError, Result};

/// Write `value` as a length-prefixed string.
pub fn put_string(dst: &mut impl BufMut, value: &str) {
    #[allow(clippy::expect_used)]
    let len = u32::try_from(value.len()).expect("string length fits in u32");
    dst.put_u32_le(len);
    dst.put_slice(value.as_bytes());
}

/// Read a length-prefixed string, advancing `src` past it.
///
/// The wire format calls these fields "UTF-8-opaque": bytes are carried
/// through exactly as sent, with no normalization or substitution. A field
/// that is not valid UTF-8 is a malformed frame — [`ProtocolError::InvalidUtf8`]
/// — rather than silently losing bytes to replacement characters.
pub fn get_string(src: &mut impl Buf) -> Result<String> {
    let len = get_len(src)?;
    if src.remaining() < len {
        return Err(ProtocolError::Truncated { expected: len, actual: src.remaining() });
    }
    let mut bytes = vec![0u8; len];
    src.copy_to_slice(&mut bytes);
    String::from_utf8(bytes).map_err(|_| ProtocolError::InvalidUtf8)
}

fn get_len(src: &mut impl Buf) -> Result<usize> {
    if src.remaining() < 4 {
        return Err(ProtocolError::Truncated { expected: 4, actual: src.remaining() });
    }
    Ok(src.get_u32_le() as usize)
}

/// Read a `u32` count prefix (used by the headers payload).
pub fn get_count(src: &mut impl Buf) -> Result<u32> {
    if src.remaining() < 4 {
        return Err(ProtocolError::Truncated { expected: 4, actual: src.remaining() });
    }
    Ok(src.get_u32_le())
}

/// Read a signed `i32` field (used by the response line's status code).
pub fn get_i32(src: &mut impl Buf) -> Result<i32> {
    if src.remaining() < 4 {
        return Err(ProtocolError::Truncated { expected: 4, actual: src.remaining() });
    }
    Ok(src.get_i32_le())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_round_trip() {
        let mut buf = Vec::new();
        put_string(&mut buf, "TEST_RESOURCE/A");
        let mut cursor = &buf[..];
        assert_eq!(get_string(&mut cursor).unwrap(), "TEST_RESOURCE/A");
        assert!(cursor.is_empty());
    }

    #[test]
    fn empty_string_round_trip() {
        let mut buf = Vec::new();
        put_string(&mut buf, "");
        let mut cursor = &buf[..];
        assert_eq!(get_string(&mut cursor).unwrap(), "");
    }

    #[test]
    fn truncated_string_is_rejected() {
        let mut buf = Vec::new();
        put_string(&mut buf, "hello");
        buf.truncate(buf.len() - 1);
        let mut cursor = &buf[..];
        assert!(get_string(&mut cursor).is_err());
    }

    #[test]
    fn non_utf8_bytes_are_rejected_not_replaced() {
        let invalid = [0xFFu8, 0xFE, 0xFD];
        let mut buf = Vec::new();
        buf.put_u32_le(invalid.len() as u32);
        buf.put_slice(&invalid);
        let mut cursor = &buf[..];
        assert_eq!(get_string(&mut cursor), Err(ProtocolError::InvalidUtf8));
    }
}
