#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The match finder is quadratic; larger inputs only slow the fuzzer down
    if data.len() > 4096 {
        return;
    }

    let packed = xpk::compress(data).expect("compress failed");
    assert!(packed.len() <= xpk::max_compressed_size(data.len()).unwrap());

    let (out, consumed) = xpk::decompress_to_vec(&packed).expect("decompress failed");
    assert_eq!(out, data);
    assert_eq!(consumed, packed.len());
});
