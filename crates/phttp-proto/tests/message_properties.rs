//! Property-based tests for the full Request/Response message shape.
//!
//! `block.rs` already covers the bare block round-trip; these exercise the
//! line/headers/body aggregate end to end.

use phttp_proto::{Block, Headers, ProtocolError, Request, RequestLine, Response, ResponseLine};
use proptest::prelude::*;

/// A string field drawn straight from arbitrary bytes rather than a
/// printable-text regex, filtered down to the ones that happen to be valid
/// UTF-8. Exercises the full byte space a wire peer could actually send,
/// not just the narrow slice a `.{0,N}` pattern would generate.
fn arbitrary_utf8_field(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<u8>(), 0..max_len)
        .prop_filter_map("valid utf-8", |bytes| String::from_utf8(bytes).ok())
}

fn arbitrary_headers() -> impl Strategy<Value = Headers> {
    prop::collection::vec((arbitrary_utf8_field(16), arbitrary_utf8_field(64)), 0..8)
        .prop_map(|pairs| pairs.into_iter().collect::<Headers>())
}

fn arbitrary_request() -> impl Strategy<Value = Request> {
    (arbitrary_utf8_field(16), arbitrary_utf8_field(16), arbitrary_headers(), prop::collection::vec(any::<u8>(), 0..256))
        .prop_map(|(verb, resource, headers, body)| {
            let mut request = Request::new(RequestLine::new(verb, resource), headers);
            request.body = Block::unassigned(body);
            request
        })
}

fn arbitrary_response() -> impl Strategy<Value = Response> {
    (any::<i32>(), arbitrary_utf8_field(16), arbitrary_headers(), prop::collection::vec(any::<u8>(), 0..256))
        .prop_map(|(code, message, headers, body)| {
            let mut response = Response::new(ResponseLine::new(code, message), headers);
            response.body = Block::unassigned(body);
            response
        })
}

proptest! {
    /// Packing a request into its three blocks and decoding them back
    /// recovers the original line, headers, and body.
    #[test]
    fn request_round_trip(request in arbitrary_request()) {
        let id = 42;
        let expected_body = request.body.content().to_vec();
        let line = request.line.clone();
        let headers = request.headers.clone();

        let blocks = request.into_blocks(id);
        prop_assert!(blocks.iter().all(|b| b.id() == id));
        let decoded = Request::from_blocks(blocks).unwrap();

        prop_assert_eq!(decoded.line, line);
        prop_assert_eq!(decoded.headers, headers);
        prop_assert_eq!(decoded.body.content(), expected_body.as_slice());
    }

    #[test]
    fn response_round_trip(response in arbitrary_response()) {
        let id = 7;
        let expected_body = response.body.content().to_vec();
        let line = response.line.clone();
        let headers = response.headers.clone();

        let blocks = response.into_blocks(id);
        prop_assert!(blocks.iter().all(|b| b.id() == id));
        let decoded = Response::from_blocks(blocks).unwrap();

        prop_assert_eq!(decoded.line, line);
        prop_assert_eq!(decoded.headers, headers);
        prop_assert_eq!(decoded.body.content(), expected_body.as_slice());
    }

    /// A verb field that is not valid UTF-8 is rejected with
    /// `ProtocolError::InvalidUtf8`, never silently replaced.
    #[test]
    fn invalid_utf8_verb_is_rejected(
        bytes in prop::collection::vec(any::<u8>(), 1..32).prop_filter("not valid utf-8", |b| std::str::from_utf8(b).is_err())
    ) {
        let mut payload = Vec::new();
        payload.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        payload.extend_from_slice(&bytes);
        // empty version, empty resource
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.extend_from_slice(&0u32.to_le_bytes());
        let block = Block::new(0, payload);

        prop_assert_eq!(RequestLine::unpack(&block), Err(ProtocolError::InvalidUtf8));
    }
}
