/// Bit-level writer for the token stream
///
/// Bits are packed MSB-first into 32-bit tokens which are stored big-endian.
/// Each token has a 4-byte slot reserved in the output before any of its bits
/// are written, so the container always ends in a whole (possibly partly
/// empty) token.
pub struct BitWriter {
    /// Container bytes, including reserved token slots
    output: Vec<u8>,
    /// Token being built
    token: u32,
    /// Bits already placed in `token` (0-32)
    bits_used: u8,
    /// Offset of the slot reserved for `token`
    token_pos: usize,
}

impl BitWriter {
    /// Start a token stream at the end of `output`
    pub fn new(mut output: Vec<u8>) -> Self {
        let token_pos = output.len();
        output.extend_from_slice(&[0u8; 4]);
        Self { output, token: 0, bits_used: 0, token_pos }
    }

    fn store_token(&mut self) {
        self.output[self.token_pos..self.token_pos + 4].copy_from_slice(&self.token.to_be_bytes());
    }

    /// Store the full token and reserve the slot for the next one
    fn flush_token(&mut self) {
        self.store_token();
        self.token = 0;
        self.bits_used = 0;
        self.token_pos = self.output.len();
        self.output.extend_from_slice(&[0u8; 4]);
    }

    /// Write a single bit
    #[inline]
    pub fn put_bit(&mut self, bit: bool) {
        // Flush lazily so a stream ending on a token boundary has no empty trailer
        if self.bits_used == 32 {
            self.flush_token();
        }
        if bit {
            self.token |= 1 << (31 - self.bits_used);
        }
        self.bits_used += 1;
    }

    /// Write the low `count` bits (0-32) of `value`, most significant first
    pub fn put_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32);

        let mut remaining = count;
        while remaining > 0 {
            if self.bits_used == 32 {
                self.flush_token();
            }

            let space = 32 - self.bits_used;
            let take = remaining.min(space);
            let mask = if take == 32 { u32::MAX } else { (1u32 << take) - 1 };
            let chunk = (value >> (remaining - take)) & mask;

            self.token |= chunk << (space - take);
            self.bits_used += take;
            remaining -= take;
        }
    }

    /// Write `n` as `n` zero bits followed by a one bit
    pub fn put_unary(&mut self, n: u32) {
        for _ in 0..n {
            self.put_bit(false);
        }
        self.put_bit(true);
    }

    /// Byte offset just past the current token's slot
    pub fn stream_end(&self) -> usize {
        self.output.len()
    }

    /// Store the final partial token and return the container bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.store_token();
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_bits_msb_first() {
        let mut writer = BitWriter::new(Vec::new());
        writer.put_bit(true);
        writer.put_bits(0b011, 3);
        let output = writer.finish();
        assert_eq!(output, vec![0b1011_0000, 0, 0, 0]);
    }

    #[test]
    fn test_reserves_after_existing_bytes() {
        let mut writer = BitWriter::new(vec![0xAA, 0xBB]);
        writer.put_bits(0xF, 4);
        let output = writer.finish();
        assert_eq!(output, vec![0xAA, 0xBB, 0xF0, 0, 0, 0]);
    }

    #[test]
    fn test_empty_stream_keeps_one_token() {
        let writer = BitWriter::new(Vec::new());
        assert_eq!(writer.stream_end(), 4);
        assert_eq!(writer.finish(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_full_token_has_no_trailer() {
        let mut writer = BitWriter::new(Vec::new());
        writer.put_bits(0xDEADBEEF, 32);
        assert_eq!(writer.finish(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_cross_token_boundary() {
        let mut writer = BitWriter::new(Vec::new());
        writer.put_bits(0, 28);
        // 8 bits: 4 finish the first token, 4 start the second
        writer.put_bits(0b1010_0101, 8);
        let output = writer.finish();
        assert_eq!(output, vec![0x00, 0x00, 0x00, 0x0A, 0x50, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_put_unary() {
        let mut writer = BitWriter::new(Vec::new());
        writer.put_unary(0);
        writer.put_unary(3);
        let output = writer.finish();
        // 1 then 0001
        assert_eq!(output[0], 0b1000_1000);
    }

    #[test]
    fn test_zero_count_is_noop() {
        let mut writer = BitWriter::new(Vec::new());
        writer.put_bits(0xFFFF, 0);
        assert_eq!(writer.finish(), vec![0, 0, 0, 0]);
    }
}
