//! Decoder orchestration: replay blocks into the output buffer.

use tracing::trace;

use crate::bits::BitReader;
use crate::code::read_value;
use crate::container::{ContainerHeader, HEADER_SIZE};
use crate::error::{Error, Result};
use crate::lz::ElementWidth;

/// Outcome of a successful decode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decompressed {
    /// Bytes written to the output
    pub written: usize,
    /// Bytes of the container consumed, up to the end of the literal pool
    pub consumed: usize,
}

/// Per-call decoder state
///
/// The output buffer is also the dictionary: matches copy from earlier
/// output by index, one element at a time, low to high.
struct Decoder<'a, 'o> {
    src: &'a [u8],
    reader: BitReader<'a>,
    header: ContainerHeader,
    width: ElementWidth,
    /// Next unread byte of the literal pool
    pool_cursor: usize,
    output: &'o mut [u8],
    /// Next byte of `output` to write
    write: usize,
    /// Elements still to produce
    remaining: u32,
    unp_count: i64,
}

/// Bytes `src` decodes to, taking the header's size field and mode flag into
/// account
pub fn output_len(src: &[u8]) -> Result<usize> {
    let header = ContainerHeader::parse(src)?;
    let mut reader = BitReader::new(src, HEADER_SIZE);
    let width = ElementWidth::from_mode_bit(reader.get_bit()?);
    Ok(header.element_count(width) as usize * width.size())
}

/// Decode the container in `src` into `output`
///
/// On error `output` may be partly written and should be discarded.
pub fn decode_into(src: &[u8], output: &mut [u8]) -> Result<Decompressed> {
    let header = ContainerHeader::parse(src)?;
    let mut reader = BitReader::new(src, HEADER_SIZE);
    let width = ElementWidth::from_mode_bit(reader.get_bit()?);

    let remaining = header.element_count(width);
    let needed = remaining as usize * width.size();
    if output.len() < needed {
        return Err(Error::OutputTooSmall { needed, available: output.len() });
    }

    let mut decoder = Decoder {
        src,
        reader,
        header,
        width,
        pool_cursor: header.pool_offset,
        output,
        write: 0,
        remaining,
        unp_count: width.unp_seed(),
    };
    decoder.run()?;

    Ok(Decompressed { written: decoder.write, consumed: decoder.pool_cursor })
}

impl<'a, 'o> Decoder<'a, 'o> {
    fn run(&mut self) -> Result<()> {
        let caps = self.header.caps;
        let bias = self.width.length_bias();

        while self.remaining > 0 {
            let count = self.reader.get_unary()?.saturating_add(1);
            self.take(count)?;
            self.copy_literals(count)?;

            if self.remaining == 0 {
                break;
            }

            let pairs = self.reader.get_unary()?.saturating_add(1);
            trace!(literals = count, pairs, "block");

            for _ in 0..pairs {
                let distance = read_value(&mut self.reader, caps.distance_cap(self.unp_count))?;
                let length_cap = caps.length_cap(distance.min(u16::MAX as u32) as u16);
                let length = read_value(&mut self.reader, length_cap)? + bias;

                self.take(length)?;
                self.copy_match(distance, length)?;
            }
        }

        Ok(())
    }

    /// Account for `count` elements about to be produced
    fn take(&mut self, count: u32) -> Result<()> {
        if count > self.remaining {
            return Err(Error::RunOverflow { count, remaining: self.remaining });
        }
        self.remaining -= count;
        self.unp_count += count as i64;
        Ok(())
    }

    fn copy_literals(&mut self, count: u32) -> Result<()> {
        let len = count as usize * self.width.size();
        let end = self.pool_cursor.checked_add(len).ok_or(Error::UnexpectedEof)?;
        let literals = self.src.get(self.pool_cursor..end).ok_or(Error::UnexpectedEof)?;

        self.output[self.write..self.write + len].copy_from_slice(literals);
        self.write += len;
        self.pool_cursor = end;
        Ok(())
    }

    fn copy_match(&mut self, distance: u32, length: u32) -> Result<()> {
        let size = self.width.size();
        let back = (self.width.base_offset() + distance as usize) * size;
        let mut from = self.write.checked_sub(back).ok_or(Error::InvalidBackReference {
            distance,
            available: self.write / size,
        })?;

        // Element by element so a source overlapping the destination repeats
        for _ in 0..length {
            self.output.copy_within(from..from + size, self.write);
            from += size;
            self.write += size;
        }
        Ok(())
    }
}
