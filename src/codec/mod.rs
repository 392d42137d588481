pub mod decoder;
pub mod encoder;
pub mod select;

pub use decoder::{decode_into, output_len, Decompressed};
pub use encoder::{encode, EncodeStats, Encoded};
pub use select::encode_with;

use crate::error::{Error, Result};

/// Worst-case container size for a `size`-byte input: `size + 64 + size / 4`
///
/// Computed in 32-bit arithmetic to match the container's size fields.
pub fn max_compressed_size(size: usize) -> Result<usize> {
    u32::try_from(size)
        .ok()
        .and_then(|s| s.checked_add(64)?.checked_add(s / 4))
        .map(|bound| bound as usize)
        .ok_or(Error::InputTooLarge(size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_compressed_size() {
        assert_eq!(max_compressed_size(0).unwrap(), 64);
        assert_eq!(max_compressed_size(300).unwrap(), 439);
        assert_eq!(max_compressed_size(3).unwrap(), 67);
    }

    #[test]
    fn test_max_compressed_size_overflow() {
        assert!(matches!(
            max_compressed_size(u32::MAX as usize - 10),
            Err(Error::InputTooLarge(_))
        ));
    }
}
