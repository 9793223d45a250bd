//! Fuzz target for the payload shapes packed into a block: `RequestLine`,
//! `ResponseLine`, and `Headers`. Arbitrary bytes should never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use phttp_proto::{Block, Headers, RequestLine, ResponseLine};

fuzz_target!(|data: &[u8]| {
    let block = Block::from_parts(0, data.to_vec()).unwrap_or_else(|_| Block::new(0, Vec::new()));
    let _ = RequestLine::unpack(&block);
    let _ = ResponseLine::unpack(&block);
    let _ = Headers::unpack(&block);
});
