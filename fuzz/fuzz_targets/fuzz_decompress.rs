#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(size) = xpk::get_decompressed_size(data) else {
        return;
    };

    // Malformed containers must fail with an error, never panic. The limit
    // keeps the header's size field from asking for huge allocations
    if let Ok((out, consumed)) = xpk::decompress_to_vec_limited(data, 1 << 20) {
        // Word mode drops an odd trailing byte of the size field
        assert!(out.len() <= size as usize);
        assert!(size as usize - out.len() <= 1);
        assert!(consumed <= data.len());
    }
});
