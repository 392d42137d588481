use crate::error::{Error, Result};

/// Unit the whole stream is coded in
///
/// Chosen once per container and announced by the first bit of the token
/// stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ElementWidth {
    /// One byte per element
    #[default]
    Byte,
    /// One 16-bit word per element; the input length must be even
    Word,
}

impl ElementWidth {
    /// Width announced by the stream's mode flag
    pub fn from_mode_bit(bit: bool) -> Self {
        if bit {
            Self::Word
        } else {
            Self::Byte
        }
    }

    pub fn mode_bit(self) -> bool {
        self == Self::Word
    }

    /// Bytes per element
    pub fn size(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Word => 2,
        }
    }

    /// Elements between the write position and distance 0
    ///
    /// The decoder addresses back-references from two bytes behind the write
    /// cursor, which is two elements in byte mode and one in word mode.
    pub fn base_offset(self) -> usize {
        match self {
            Self::Byte => 2,
            Self::Word => 1,
        }
    }

    /// Difference between a match length and its length token
    pub fn length_bias(self) -> u32 {
        match self {
            Self::Byte => 2,
            Self::Word => 1,
        }
    }

    /// Shortest match the finder will consider
    pub fn min_match_len(self) -> u32 {
        match self {
            Self::Byte => 2,
            Self::Word => 1,
        }
    }

    /// Starting value of the unprocessed-element counter
    pub fn unp_seed(self) -> i64 {
        match self {
            Self::Byte => -2,
            Self::Word => -1,
        }
    }

    /// Elements in a `byte_len`-byte buffer
    pub fn element_count(self, byte_len: usize) -> Result<usize> {
        match self {
            Self::Byte => Ok(byte_len),
            Self::Word if byte_len % 2 == 0 => Ok(byte_len / 2),
            Self::Word => Err(Error::OddWordInput(byte_len)),
        }
    }
}

/// Input buffer viewed as a sequence of elements
#[derive(Clone, Copy, Debug)]
pub struct Elements<'a> {
    data: &'a [u8],
    width: ElementWidth,
}

impl<'a> Elements<'a> {
    pub fn new(data: &'a [u8], width: ElementWidth) -> Result<Self> {
        width.element_count(data.len())?;
        Ok(Self { data, width })
    }

    pub fn width(&self) -> ElementWidth {
        self.width
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len() / self.width.size()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw bytes of `count` elements starting at element `start`
    pub fn bytes(&self, start: usize, count: usize) -> &'a [u8] {
        let size = self.width.size();
        &self.data[start * size..(start + count) * size]
    }

    /// Number of equal elements (at most `max_len`) starting at `src` and `pos`
    pub fn common_prefix(&self, src: usize, pos: usize, max_len: usize) -> usize {
        let size = self.width.size();
        self.data[src * size..]
            .chunks_exact(size)
            .zip(self.data[pos * size..].chunks_exact(size))
            .take(max_len)
            .take_while(|(a, b)| a == b)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_bit() {
        assert_eq!(ElementWidth::from_mode_bit(true), ElementWidth::Word);
        assert_eq!(ElementWidth::from_mode_bit(false), ElementWidth::Byte);
        assert!(ElementWidth::Word.mode_bit());
        assert!(!ElementWidth::Byte.mode_bit());
    }

    #[test]
    fn test_element_count() {
        assert_eq!(ElementWidth::Byte.element_count(7).unwrap(), 7);
        assert_eq!(ElementWidth::Word.element_count(8).unwrap(), 4);
        assert!(matches!(ElementWidth::Word.element_count(7), Err(Error::OddWordInput(7))));
    }

    #[test]
    fn test_word_view() {
        let data = [1, 2, 3, 4, 1, 2, 3, 5];
        let elements = Elements::new(&data, ElementWidth::Word).unwrap();
        assert_eq!(elements.len(), 4);
        assert_eq!(elements.bytes(1, 2), &[3, 4, 1, 2]);
        assert_eq!(elements.common_prefix(0, 2, 4), 1);
    }

    #[test]
    fn test_common_prefix_respects_limit() {
        let data = [7u8; 10];
        let elements = Elements::new(&data, ElementWidth::Byte).unwrap();
        assert_eq!(elements.common_prefix(0, 2, 3), 3);
        // Runs into the end of the buffer
        assert_eq!(elements.common_prefix(0, 6, 100), 4);
    }
}
