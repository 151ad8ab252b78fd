#![no_main]

use libfuzzer_sys::fuzz_target;
use wolfdev::compression::{CodecParams, LengthPrefix, decompress_plane};

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let (config, stream) = data.split_at(3);
    let params = CodecParams {
        rlew_tag: u16::from_le_bytes([config[0], config[1]]),
        prefix: if config[2] & 1 == 0 {
            LengthPrefix::Word
        } else {
            LengthPrefix::DoubleWord
        },
    };
    // Plane sizes stay small so a huge declared length cannot stall a run.
    let expected = usize::from(config[2] >> 1) * 64;
    if let Ok(plane) = decompress_plane(stream, params, expected) {
        assert!(plane.is_empty() || plane.len() == expected);
    }
});
