//! The fixed token code table.
//!
//! Every integer in the stream (distances and match lengths) is written
//! against a cap: the largest value the decoder could legally expect at that
//! point. The cap picks one entry of [`CODE_TABLE`]; small caps pick entries
//! with few or no selector bits, so short-range values stay cheap.

/// One selector slot of an entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Item {
    /// First value of the range opened by the *previous* selector
    pub base: u16,
    /// Extra bits following this item's selector
    pub extra_bits: u8,
}

const fn item(base: u16, extra_bits: u8) -> Item {
    Item { base, extra_bits }
}

/// A prefix code for values in `0..=limit`
#[derive(Debug)]
pub struct Entry {
    /// Largest value this entry is meant to carry
    pub limit: u16,
    /// Width of the selector written before the extra bits (0-14)
    pub selector_bits: u8,
    /// `2^selector_bits` items
    pub items: &'static [Item],
}

/// Resolved encoding of a single value under one entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Code {
    pub selector: u32,
    pub selector_bits: u8,
    pub payload: u32,
    pub extra_bits: u8,
}

impl Code {
    /// Total bits this code occupies in the stream
    pub fn bit_len(&self) -> u32 {
        self.selector_bits as u32 + self.extra_bits as u32
    }
}

/// Selectors below this value are ranged (payload is `x - base`); the
/// remaining selectors carry `x` verbatim
#[inline]
pub const fn mask(selector_bits: u8) -> u32 {
    (1u32 << selector_bits) - 1
}

#[inline]
fn max_payload(extra_bits: u8) -> u32 {
    (1u32 << extra_bits) - 1
}

impl Entry {
    /// Find the code for `x`, or `None` if this entry cannot carry it
    pub fn locate(&self, x: u16) -> Option<Code> {
        let x = x as u32;
        let k = self.selector_bits;

        if k == 0 {
            let extra_bits = self.items[0].extra_bits;
            return (x <= max_payload(extra_bits)).then_some(Code {
                selector: 0,
                selector_bits: 0,
                payload: x,
                extra_bits,
            });
        }

        let ranged = mask(k);
        for v in 0..ranged {
            let extra_bits = self.items[v as usize].extra_bits;
            let base = self.items[v as usize + 1].base as u32;
            if x >= base && x - base <= max_payload(extra_bits) {
                return Some(Code { selector: v, selector_bits: k, payload: x - base, extra_bits });
            }
        }

        for v in ranged..(1u32 << k) {
            let extra_bits = self.items[v as usize].extra_bits;
            if x <= max_payload(extra_bits) {
                return Some(Code { selector: v, selector_bits: k, payload: x, extra_bits });
            }
        }

        None
    }
}

/// Entries ordered by increasing `limit`
pub static CODE_TABLE: [Entry; 10] = [
    Entry { limit: 0, selector_bits: 0, items: &[item(0, 0)] },
    Entry { limit: 1, selector_bits: 0, items: &[item(0, 1)] },
    Entry { limit: 3, selector_bits: 0, items: &[item(0, 2)] },
    Entry { limit: 7, selector_bits: 0, items: &[item(0, 3)] },
    // [0,3] | escape
    Entry { limit: 15, selector_bits: 1, items: &[item(0, 2), item(0, 4)] },
    // [0,3] [4,11] [12,27] | escape
    Entry { limit: 63, selector_bits: 2, items: &[item(0, 2), item(0, 3), item(4, 4), item(12, 6)] },
    // [0,3] [4,19] [20,83] | escape
    Entry { limit: 255, selector_bits: 2, items: &[item(0, 2), item(0, 4), item(4, 6), item(20, 8)] },
    // [0,1] [2,3] [4,7] [8,15] [16,31] [32,63] [64,127] | escape
    Entry {
        limit: 1023,
        selector_bits: 3,
        items: &[
            item(0, 1),
            item(0, 1),
            item(2, 2),
            item(4, 3),
            item(8, 4),
            item(16, 5),
            item(32, 6),
            item(64, 10),
        ],
    },
    // [0,1] [2,5] [6,13] [14,29] [30,61] [62,125] [126,381] | escape
    Entry {
        limit: 4095,
        selector_bits: 3,
        items: &[
            item(0, 1),
            item(0, 2),
            item(2, 3),
            item(6, 4),
            item(14, 5),
            item(30, 6),
            item(62, 8),
            item(126, 12),
        ],
    },
    // [0,1] [2,5] [6,13] [14,45] [46,109] [110,365] [366,1389] | escape
    Entry {
        limit: u16::MAX,
        selector_bits: 3,
        items: &[
            item(0, 1),
            item(0, 2),
            item(2, 3),
            item(6, 5),
            item(14, 6),
            item(46, 8),
            item(110, 10),
            item(366, 16),
        ],
    },
];

/// Pick the first entry whose limit covers `cap`, falling back to the widest
pub fn select_entry(cap: u16) -> &'static Entry {
    CODE_TABLE.iter().find(|entry| entry.limit >= cap).unwrap_or(&CODE_TABLE[CODE_TABLE.len() - 1])
}
