#![no_main]

use flate2::read::DeflateDecoder;
use libfuzzer_sys::fuzz_target;
use std::io::Read;

fuzz_target!(|data: &[u8]| {
    // First byte picks the level, the rest is the payload
    let Some((&level, payload)) = data.split_first() else {
        return;
    };
    let level = level % 9 + 1;

    let compressed = optiflate::compress(payload, level).expect("compression failed");

    let mut decoded = Vec::new();
    DeflateDecoder::new(compressed.as_slice())
        .read_to_end(&mut decoded)
        .expect("stream does not inflate");
    assert_eq!(decoded, payload, "round trip mismatch at level {}", level);
});
