use super::tables::select_entry;
use crate::bits::BitWriter;
use crate::error::{Error, Result};

/// Write `x` using the entry selected by `cap`
pub fn write_value(writer: &mut BitWriter, cap: u16, x: u16) -> Result<()> {
    let code = select_entry(cap)
        .locate(x)
        .ok_or(Error::Unrepresentable { value: x as u32, cap })?;

    writer.put_bits(code.selector, code.selector_bits);
    writer.put_bits(code.payload, code.extra_bits);
    Ok(())
}

/// Bits [`write_value`] would emit for `x` under `cap`, or `None` if it
/// would fail
#[inline]
pub fn value_cost(cap: u16, x: u16) -> Option<u32> {
    select_entry(cap).locate(x).map(|code| code.bit_len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_direct_entry() {
        let mut writer = BitWriter::new(Vec::new());
        write_value(&mut writer, 7, 0b101).unwrap();
        assert_eq!(writer.finish()[0], 0b1010_0000);
    }

    #[test]
    fn test_zero_bit_entry_writes_nothing() {
        let mut writer = BitWriter::new(Vec::new());
        write_value(&mut writer, 0, 0).unwrap();
        assert_eq!(writer.finish(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_write_ranged_value() {
        // cap 63: selector 01, then 5 - 4 = 1 in three bits
        let mut writer = BitWriter::new(Vec::new());
        write_value(&mut writer, 63, 5).unwrap();
        assert_eq!(writer.finish()[0], 0b0100_1000);
    }

    #[test]
    fn test_value_over_cap_is_an_error() {
        let mut writer = BitWriter::new(Vec::new());
        let err = write_value(&mut writer, 3, 9).unwrap_err();
        assert!(matches!(err, Error::Unrepresentable { value: 9, cap: 3 }));
    }

    #[test]
    fn test_value_cost() {
        assert_eq!(value_cost(0, 0), Some(0));
        assert_eq!(value_cost(0, 1), None);
        assert_eq!(value_cost(7, 6), Some(3));
        assert_eq!(value_cost(15, 2), Some(3));
        assert_eq!(value_cost(15, 12), Some(5));
        assert_eq!(value_cost(u16::MAX, u16::MAX), Some(19));
    }
}
