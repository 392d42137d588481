//! Encoder orchestration: parse the input into blocks and assemble the
//! container.

use tracing::{debug, trace};

use super::max_compressed_size;
use crate::bits::BitWriter;
use crate::code::write_value;
use crate::container::{patch_pool_offset, ContainerHeader};
use crate::error::{Error, Result};
use crate::lz::{Block, ElementWidth, Elements, MatchFinder, TokenCaps, MAX_RUN_MATCHES};

/// Counters collected while encoding one container
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub width: ElementWidth,
    pub literal_runs: u64,
    pub literal_elements: u64,
    pub match_runs: u64,
    pub matches: u64,
    pub matched_elements: u64,
}

/// A finished container and how it was built
#[derive(Clone, Debug)]
pub struct Encoded {
    pub data: Vec<u8>,
    pub stats: EncodeStats,
}

/// Per-call encoder state
struct Encoder<'a> {
    finder: MatchFinder<'a>,
    writer: BitWriter,
    /// Literal pool, appended after the token stream
    literals: Vec<u8>,
    /// Next element to encode
    pos: usize,
    /// Unprocessed-element counter as the decoder will see it
    unp_count: i64,
    stats: EncodeStats,
}

/// Encode `src` with a fixed element width
///
/// Fails with [`Error::OddWordInput`] when word mode is asked for an odd
/// number of bytes.
pub fn encode(src: &[u8], width: ElementWidth, caps: TokenCaps) -> Result<Encoded> {
    let elements = Elements::new(src, width)?;
    let size_field = u32::try_from(src.len()).map_err(|_| Error::InputTooLarge(src.len()))?;

    let capacity = max_compressed_size(src.len())?;
    let mut out = Vec::new();
    out.try_reserve_exact(capacity).map_err(|_| Error::Allocation(capacity))?;
    let mut literals = Vec::new();
    literals.try_reserve_exact(src.len()).map_err(|_| Error::Allocation(src.len()))?;

    ContainerHeader::new(size_field, caps).write(&mut out)?;

    let mut encoder = Encoder {
        finder: MatchFinder::new(elements, caps),
        writer: BitWriter::new(out),
        literals,
        pos: 0,
        unp_count: width.unp_seed(),
        stats: EncodeStats { width, ..Default::default() },
    };

    encoder.writer.put_bit(width.mode_bit());

    while encoder.pos < elements.len() {
        let block = encoder.plan_block()?;
        encoder.emit_block(&block)?;
    }

    encoder.finish()
}

impl<'a> Encoder<'a> {
    fn width(&self) -> ElementWidth {
        self.finder.elements().width()
    }

    /// Choose the next literal run and the match run following it
    fn plan_block(&self) -> Result<Block> {
        let total = self.finder.elements().len();
        let start = self.pos;
        let start_unp = self.unp_count;

        // Nothing can be referenced until `base_offset` elements exist
        let mut literal_len =
            if start == 0 { self.width().base_offset().min(total) } else { 1 };

        while start + literal_len < total
            && !self.finder.has_match(start + literal_len, start_unp + literal_len as i64)
        {
            literal_len += 1;
        }

        if literal_len == 0 {
            return Err(Error::EmptyLiteralRun(start));
        }

        let mut block = Block { start, literal_len, matches: Vec::new() };

        let mut pos = start + literal_len;
        let mut unp = start_unp + literal_len as i64;
        if pos >= total {
            return Ok(block);
        }

        while pos < total && block.matches.len() < MAX_RUN_MATCHES {
            let Some(current) = self.finder.find_best(pos, unp) else {
                break;
            };

            // Hand over to a fresh literal run if skipping one element pays off
            if !block.matches.is_empty() && self.finder.next_is_better(&current, pos, unp) {
                break;
            }

            block.matches.push(current.m);
            pos += current.m.length as usize;
            unp += current.m.length as i64;
        }

        if block.matches.is_empty() {
            return Err(Error::EmptyMatchRun(pos));
        }

        Ok(block)
    }

    /// Serialize a planned block, recomputing token caps from the counter
    fn emit_block(&mut self, block: &Block) -> Result<()> {
        trace!(
            start = block.start,
            literals = block.literal_len,
            matches = block.matches.len(),
            "block"
        );

        let width = self.width();
        let caps = self.finder.caps();
        let elements = *self.finder.elements();

        self.writer.put_unary(block.literal_len as u32 - 1);

        let bytes = elements.bytes(block.start, block.literal_len);
        if self.literals.len() + bytes.len() > elements.len() * width.size() {
            return Err(Error::LiteralOverflow(elements.len() * width.size()));
        }
        self.literals.extend_from_slice(bytes);

        self.pos += block.literal_len;
        self.unp_count += block.literal_len as i64;
        self.stats.literal_runs += 1;
        self.stats.literal_elements += block.literal_len as u64;

        if block.matches.is_empty() {
            return Ok(());
        }

        self.writer.put_unary(block.matches.len() as u32 - 1);

        for m in &block.matches {
            write_value(&mut self.writer, caps.distance_cap(self.unp_count), m.distance)?;

            let length_token = m
                .length
                .checked_sub(width.length_bias())
                .and_then(|t| u16::try_from(t).ok())
                .ok_or(Error::Unrepresentable {
                    value: m.length,
                    cap: caps.length_cap(m.distance),
                })?;
            write_value(&mut self.writer, caps.length_cap(m.distance), length_token)?;

            self.pos += m.length as usize;
            self.unp_count += m.length as i64;
            self.stats.matched_elements += m.length as u64;
        }

        self.stats.match_runs += 1;
        self.stats.matches += block.matches.len() as u64;
        Ok(())
    }

    /// Flush the token stream, point the header at the pool and append it
    fn finish(self) -> Result<Encoded> {
        let pool_offset = self.writer.stream_end();
        let mut data = self.writer.finish();
        patch_pool_offset(&mut data, pool_offset)?;
        data.extend_from_slice(&self.literals);

        debug!(
            width = ?self.stats.width,
            size = data.len(),
            literal_runs = self.stats.literal_runs,
            matches = self.stats.matches,
            "encoded container"
        );

        Ok(Encoded { data, stats: self.stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::HEADER_SIZE;

    #[test]
    fn test_empty_input_is_header_and_mode_token() {
        let encoded = encode(&[], ElementWidth::Byte, TokenCaps::default()).unwrap();
        assert_eq!(encoded.data.len(), HEADER_SIZE + 4);
        assert_eq!(&encoded.data[..4], &[0, 0, 0, 0]);
        // Pool starts right after the single token: 16 - 8
        assert_eq!(&encoded.data[4..8], &[0, 0, 0, 8]);
        assert_eq!(&encoded.data[8..12], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(encoded.stats.literal_runs, 0);
    }

    #[test]
    fn test_single_byte() {
        let encoded = encode(&[0x42], ElementWidth::Byte, TokenCaps::default()).unwrap();
        // Mode bit 0, unary 0 => "01" in the first token
        assert_eq!(&encoded.data[HEADER_SIZE..HEADER_SIZE + 4], &[0b0100_0000, 0, 0, 0]);
        assert_eq!(encoded.data[HEADER_SIZE + 4..], [0x42]);
    }

    #[test]
    fn test_word_mode_rejects_odd_input() {
        let err = encode(&[1, 2, 3], ElementWidth::Word, TokenCaps::default()).unwrap_err();
        assert!(matches!(err, Error::OddWordInput(3)));
    }

    #[test]
    fn test_word_mode_sets_flag_and_doubles_count() {
        let encoded = encode(&[1, 2, 3, 4], ElementWidth::Word, TokenCaps::default()).unwrap();
        assert_eq!(&encoded.data[..4], &[0, 0, 0, 4]);
        assert_eq!(encoded.data[HEADER_SIZE] & 0x80, 0x80);
    }

    #[test]
    fn test_no_repetition_is_all_literals() {
        let src: Vec<u8> = (0..=255u8).collect();
        let encoded = encode(&src, ElementWidth::Byte, TokenCaps::default()).unwrap();
        assert_eq!(encoded.stats.matches, 0);
        assert_eq!(encoded.stats.literal_runs, 1);
        assert_eq!(encoded.stats.literal_elements, 256);
        assert!(encoded.data.ends_with(&src));
    }

    #[test]
    fn test_run_becomes_matches() {
        let src = vec![0u8; 300];
        let encoded = encode(&src, ElementWidth::Byte, TokenCaps::default()).unwrap();
        assert_eq!(encoded.stats.literal_elements + encoded.stats.matched_elements, 300);
        // Match lengths are bounded by their distance, so the copies double up
        // rather than covering the run in one go
        assert!(encoded.stats.literal_elements < 20);
        assert!(encoded.stats.matched_elements > 280);
        assert!(encoded.data.len() < 80);
    }

    #[test]
    fn test_match_runs_respect_limits() {
        let src: Vec<u8> = b"abcabdabcabe".iter().cycle().take(2000).copied().collect();
        let elements = Elements::new(&src, ElementWidth::Byte).unwrap();
        let encoder = Encoder {
            finder: MatchFinder::new(elements, TokenCaps::default()),
            writer: BitWriter::new(Vec::new()),
            literals: Vec::new(),
            pos: 0,
            unp_count: ElementWidth::Byte.unp_seed(),
            stats: EncodeStats::default(),
        };

        let block = encoder.plan_block().unwrap();
        assert!(!block.matches.is_empty());
        assert!(block.matches.len() <= MAX_RUN_MATCHES);
        assert!(block.matches.iter().all(|m| m.length >= 3));
    }

    /// Run the encoder over all of `src`, returning every block it emitted
    fn encode_blocks(src: &[u8], width: ElementWidth, caps: TokenCaps) -> Vec<Block> {
        let elements = Elements::new(src, width).unwrap();
        let mut encoder = Encoder {
            finder: MatchFinder::new(elements, caps),
            writer: BitWriter::new(Vec::new()),
            literals: Vec::new(),
            pos: 0,
            unp_count: width.unp_seed(),
            stats: EncodeStats { width, ..Default::default() },
        };

        let mut blocks = Vec::new();
        while encoder.pos < elements.len() {
            let block = encoder.plan_block().unwrap();
            encoder.emit_block(&block).unwrap();
            blocks.push(block);
        }
        blocks
    }

    #[test]
    fn test_every_match_has_a_nonzero_length_token() {
        let mut src: Vec<u8> = Vec::new();
        for i in 0..600u32 {
            let x = i.wrapping_mul(2_654_435_761) >> 28;
            src.push(if i % 48 < 30 { (i % 6) as u8 } else { x as u8 });
        }

        for width in [ElementWidth::Byte, ElementWidth::Word] {
            for caps in [TokenCaps::default(), TokenCaps::new(16, 3), TokenCaps::new(300, 1)] {
                let blocks = encode_blocks(&src, width, caps);
                let total: usize = blocks.iter().map(Block::element_count).sum();
                assert_eq!(total, src.len() / width.size());

                let mut matches = 0;
                for m in blocks.iter().flat_map(|b| &b.matches) {
                    assert!(m.length >= width.min_match_len(), "{:?} {:?}", width, m);
                    assert!(m.length > width.length_bias(), "{:?} {:?}", width, m);
                    matches += 1;
                }
                assert!(matches > 0, "{:?} {:?} found no matches", width, caps);
            }
        }
    }
}
