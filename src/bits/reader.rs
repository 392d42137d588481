use crate::error::{Error, Result};

/// Bit-level reader for the token stream
///
/// Mirrors [`BitWriter`](super::BitWriter): tokens are 32-bit big-endian
/// words, consumed MSB-first. A new token is loaded only once every bit of
/// the current one has been read.
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Offset of the next token to load
    pos: usize,
    /// Current token
    token: u32,
    /// Unread bits left in `token` (0-32)
    bits_left: u8,
}

impl<'a> BitReader<'a> {
    /// Read tokens from `data` starting at byte offset `pos`
    pub fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos, token: 0, bits_left: 0 }
    }

    fn load_token(&mut self) -> Result<()> {
        let end = self.pos.checked_add(4).ok_or(Error::UnexpectedEof)?;
        let bytes = self.data.get(self.pos..end).ok_or(Error::UnexpectedEof)?;
        self.token = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        self.pos = end;
        self.bits_left = 32;
        Ok(())
    }

    /// Read a single bit
    #[inline]
    pub fn get_bit(&mut self) -> Result<bool> {
        if self.bits_left == 0 {
            self.load_token()?;
        }
        self.bits_left -= 1;
        Ok((self.token >> self.bits_left) & 1 != 0)
    }

    /// Read `count` bits (0-32), most significant first
    pub fn get_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        let mut result = 0u32;
        for _ in 0..count {
            result = (result << 1) | self.get_bit()? as u32;
        }
        Ok(result)
    }

    /// Read a unary value: the number of zero bits before the next one bit
    pub fn get_unary(&mut self) -> Result<u32> {
        let mut value = 0u32;
        while !self.get_bit()? {
            value += 1;
        }
        Ok(value)
    }

    /// Byte offset just past the last token loaded
    pub fn position(&self) -> usize {
        self.pos
    }
}
