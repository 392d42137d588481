use super::tables::{mask, select_entry};
use crate::bits::BitReader;
use crate::error::Result;

/// Read a value written by [`write_value`](super::write_value) under the same cap
///
/// The result is not checked against `cap`; a corrupt stream can decode to
/// anything the selected entry can express.
pub fn read_value(reader: &mut BitReader<'_>, cap: u16) -> Result<u32> {
    let entry = select_entry(cap);
    let k = entry.selector_bits;

    if k == 0 {
        return reader.get_bits(entry.items[0].extra_bits);
    }

    let selector = reader.get_bits(k)?;
    let item = entry.items[selector as usize];

    if selector < mask(k) {
        let base = entry.items[selector as usize + 1].base as u32;
        Ok(base + reader.get_bits(item.extra_bits)?)
    } else {
        reader.get_bits(item.extra_bits)
    }
}
