//! Packer/unpacker for the X-Perts RLE/LZ77 asset format.
//!
//! A container is a 12-byte big-endian header, an MSB-first stream of 32-bit
//! tokens describing alternating literal and match runs, and a pool holding
//! every literal element. The stream codes either bytes or 16-bit words; the
//! encoder tries both and keeps whichever is smaller.
//!
//! ```
//! let data = b"tile tile tile tile".to_vec();
//! let packed = xpk::compress(&data).unwrap();
//! assert_eq!(xpk::get_decompressed_size(&packed).unwrap() as usize, data.len());
//!
//! let (unpacked, consumed) = xpk::decompress_to_vec(&packed).unwrap();
//! assert_eq!(unpacked, data);
//! assert_eq!(consumed, packed.len());
//! ```

pub mod bits;
pub mod code;
pub mod codec;
pub mod container;
pub mod error;
pub mod lz;

pub use codec::{max_compressed_size, Decompressed, EncodeStats, Encoded};
pub use error::{Error, Result};
pub use lz::{ElementWidth, TokenCaps};

/// Element width selection for compression
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WidthPolicy {
    /// Try bytes and (for even lengths) words, keep the smaller result
    #[default]
    Auto,
    /// Always code bytes
    Byte,
    /// Always code 16-bit words; fails on odd-length input
    Word,
}

/// Configuration for compression
#[derive(Clone, Debug)]
pub struct CompressConfig {
    /// Element width selection
    pub width: WidthPolicy,
    /// Ceiling on back-reference distance, stored in the header
    pub max_from: u16,
    /// Ceiling on the match length token, stored in the header
    pub max_count: u16,
    /// Threads for the width trials (0 = auto, 1 = sequential)
    pub num_threads: usize,
}

impl CompressConfig {
    /// Token caps written to the header
    pub fn caps(&self) -> TokenCaps {
        TokenCaps::new(self.max_from, self.max_count)
    }

    /// Threads actually used for the width trials
    pub fn effective_threads(&self) -> usize {
        match self.num_threads {
            0 => num_cpus::get().clamp(1, 2),
            n => n.clamp(1, 2),
        }
    }
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self { width: WidthPolicy::Auto, max_from: u16::MAX, max_count: u16::MAX, num_threads: 1 }
    }
}

/// A compressed container with statistics from the winning trial
#[derive(Clone, Debug)]
pub struct Compressed {
    pub data: Vec<u8>,
    pub stats: EncodeStats,
}

/// Compress `src` with the default configuration
pub fn compress(src: &[u8]) -> Result<Vec<u8>> {
    compress_with(src, &CompressConfig::default()).map(|c| c.data)
}

/// Compress `src` according to `config`
///
/// The result never exceeds [`max_compressed_size`]; an input that would is
/// rejected with [`Error::BoundExceeded`].
pub fn compress_with(src: &[u8], config: &CompressConfig) -> Result<Compressed> {
    let bound = max_compressed_size(src.len())?;
    let Encoded { data, stats } = codec::encode_with(src, config)?;

    if data.len() > bound {
        return Err(Error::BoundExceeded { size: data.len(), bound });
    }
    Ok(Compressed { data, stats })
}

/// Compress `src` into `dst`, returning the container length
///
/// `dst` should hold at least [`max_compressed_size`] bytes.
pub fn compress_into(src: &[u8], dst: &mut [u8]) -> Result<usize> {
    let compressed = compress_with(src, &CompressConfig::default())?;
    let len = compressed.data.len();
    let available = dst.len();
    let out = dst.get_mut(..len).ok_or(Error::OutputTooSmall { needed: len, available })?;
    out.copy_from_slice(&compressed.data);
    Ok(len)
}

/// Decompressed size in bytes, read from the header without decoding
pub fn get_decompressed_size(src: &[u8]) -> Result<u32> {
    container::decompressed_size(src)
}

/// Decompress the container at the start of `src` into `dst`
///
/// `consumed` in the result is where the container ends in `src`; the format
/// does not otherwise mark its end. On error `dst` may be partly written.
pub fn decompress_to_buf(src: &[u8], dst: &mut [u8]) -> Result<Decompressed> {
    codec::decode_into(src, dst)
}

/// Decompress the container at the start of `src`, returning the data and
/// the number of container bytes consumed
///
/// The output is allocated up front from the header's size field, which can
/// ask for up to 4 GiB. Use [`decompress_to_vec_limited`] for untrusted input.
pub fn decompress_to_vec(src: &[u8]) -> Result<(Vec<u8>, usize)> {
    decompress_to_vec_limited(src, usize::MAX)
}

/// Like [`decompress_to_vec`], but fails with [`Error::SizeLimitExceeded`]
/// before allocating when the container decodes to more than `limit` bytes
pub fn decompress_to_vec_limited(src: &[u8], limit: usize) -> Result<(Vec<u8>, usize)> {
    let len = codec::output_len(src)?;
    if len > limit {
        return Err(Error::SizeLimitExceeded { size: len, limit });
    }

    let mut out = Vec::new();
    out.try_reserve_exact(len).map_err(|_| Error::Allocation(len))?;
    out.resize(len, 0);

    let result = codec::decode_into(src, &mut out)?;
    out.truncate(result.written);
    Ok((out, result.consumed))
}
