//! Fuzz target for `Block::decode_header`.
//!
//! Arbitrary bytes should never panic; malformed headers must return an
//! error, never read past the declared length or allocate unboundedly.

#![no_main]

use libfuzzer_sys::fuzz_target;
use phttp_proto::Block;

fuzz_target!(|data: &[u8]| {
    let _ = Block::decode_header(data);
});
