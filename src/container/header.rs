use crate::error::{Error, Result};
use crate::lz::{ElementWidth, TokenCaps};

/// Bytes before the first token
pub const HEADER_SIZE: usize = 12;

/// The stored literal pool offset is relative to this header byte
pub const POOL_OFFSET_BIAS: usize = 8;

const POOL_OFFSET_FIELD: usize = 4;

/// Parsed container header
///
/// All fields are big-endian:
/// `size`(4) · `pool_offset - 8`(4) · `max_from`(2) · `max_count`(2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Decompressed size in bytes (elements, doubled in word mode)
    pub size_field: u32,
    /// Absolute offset of the literal pool
    pub pool_offset: usize,
    pub caps: TokenCaps,
}

impl ContainerHeader {
    /// Header for a container whose pool offset is not known yet
    pub fn new(size_field: u32, caps: TokenCaps) -> Self {
        Self { size_field, pool_offset: POOL_OFFSET_BIAS, caps }
    }

    /// Parse the header at the start of `data`
    pub fn parse(data: &[u8]) -> Result<Self> {
        let buf = data.get(..HEADER_SIZE).ok_or(Error::UnexpectedEof)?;

        let size_field = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let pool_field = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let max_from = u16::from_be_bytes([buf[8], buf[9]]);
        let max_count = u16::from_be_bytes([buf[10], buf[11]]);

        Ok(ContainerHeader {
            size_field,
            pool_offset: pool_field as usize + POOL_OFFSET_BIAS,
            caps: TokenCaps::new(max_from, max_count),
        })
    }

    /// Append the header to `out`
    pub fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&self.size_field.to_be_bytes());
        out.extend_from_slice(&encode_pool_offset(self.pool_offset)?);
        out.extend_from_slice(&self.caps.max_from.to_be_bytes());
        out.extend_from_slice(&self.caps.max_count.to_be_bytes());
        Ok(())
    }

    /// Elements the container decodes to
    pub fn element_count(&self, width: ElementWidth) -> u32 {
        match width {
            ElementWidth::Byte => self.size_field,
            ElementWidth::Word => self.size_field >> 1,
        }
    }
}

fn encode_pool_offset(pool_offset: usize) -> Result<[u8; 4]> {
    let field = pool_offset
        .checked_sub(POOL_OFFSET_BIAS)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or(Error::InputTooLarge(pool_offset))?;
    Ok(field.to_be_bytes())
}

/// Overwrite the pool offset of a header already written to `out`
pub fn patch_pool_offset(out: &mut [u8], pool_offset: usize) -> Result<()> {
    let field = encode_pool_offset(pool_offset)?;
    out[POOL_OFFSET_FIELD..POOL_OFFSET_FIELD + 4].copy_from_slice(&field);
    Ok(())
}

/// Decompressed size in bytes, read from the header without decoding
pub fn decompressed_size(data: &[u8]) -> Result<u32> {
    let buf = data.get(..4).ok_or(Error::UnexpectedEof)?;
    Ok(u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        let data = vec![
            0x00, 0x00, 0x01, 0x2C, // size = 300
            0x00, 0x00, 0x00, 0x10, // pool offset - 8 = 16
            0xFF, 0xFF, // max_from
            0x01, 0x00, // max_count
        ];

        let header = ContainerHeader::parse(&data).unwrap();
        assert_eq!(header.size_field, 300);
        assert_eq!(header.pool_offset, 24);
        assert_eq!(header.caps, TokenCaps::new(0xFFFF, 0x100));
    }

    #[test]
    fn test_write_then_patch() {
        let mut out = Vec::new();
        ContainerHeader::new(6, TokenCaps::default()).write(&mut out).unwrap();
        assert_eq!(out.len(), HEADER_SIZE);
        assert_eq!(&out[4..8], &[0, 0, 0, 0]);

        patch_pool_offset(&mut out, 20).unwrap();
        let header = ContainerHeader::parse(&out).unwrap();
        assert_eq!(header.size_field, 6);
        assert_eq!(header.pool_offset, 20);
    }

    #[test]
    fn test_word_mode_element_count() {
        let header = ContainerHeader::new(8, TokenCaps::default());
        assert_eq!(header.element_count(ElementWidth::Byte), 8);
        assert_eq!(header.element_count(ElementWidth::Word), 4);
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(ContainerHeader::parse(&[0u8; 11]), Err(Error::UnexpectedEof)));
        assert!(matches!(decompressed_size(&[0u8; 3]), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_decompressed_size() {
        assert_eq!(decompressed_size(&[0x00, 0x01, 0x00, 0x00, 0xAA]).unwrap(), 65536);
    }
}
