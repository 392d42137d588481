/// Most matches a single match run may hold
pub const MAX_RUN_MATCHES: usize = 256;

/// A back-reference: copy `length` elements starting `distance` elements
/// behind the base offset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub distance: u16,
    pub length: u32,
}

/// One literal run followed by its match run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    /// Element index where the literal run starts
    pub start: usize,
    /// Elements copied from the literal pool
    pub literal_len: usize,
    /// Empty only for the final block when the literals reach the end of input
    pub matches: Vec<Match>,
}

impl Block {
    /// Total elements this block produces
    pub fn element_count(&self) -> usize {
        self.literal_len + self.matches.iter().map(|m| m.length as usize).sum::<usize>()
    }
}

/// Global ceilings on distance and length tokens, stored in the header
///
/// Both directions derive per-token caps through these methods only, so the
/// encoder and decoder always pick the same code table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenCaps {
    pub max_from: u16,
    pub max_count: u16,
}

impl TokenCaps {
    pub fn new(max_from: u16, max_count: u16) -> Self {
        Self { max_from, max_count }
    }

    /// Cap for a distance token given the unprocessed-element counter
    #[inline]
    pub fn distance_cap(&self, unp_count: i64) -> u16 {
        let available = unp_count.clamp(0, u16::MAX as i64) as u16;
        self.max_from.min(available)
    }

    /// Cap for the length token following `distance`
    #[inline]
    pub fn length_cap(&self, distance: u16) -> u16 {
        self.max_count.min(distance)
    }
}

impl Default for TokenCaps {
    fn default() -> Self {
        Self { max_from: u16::MAX, max_count: u16::MAX }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_cap_clamps_counter() {
        let caps = TokenCaps::default();
        assert_eq!(caps.distance_cap(-2), 0);
        assert_eq!(caps.distance_cap(-1), 0);
        assert_eq!(caps.distance_cap(0), 0);
        assert_eq!(caps.distance_cap(300), 300);
        // Saturates rather than wrapping
        assert_eq!(caps.distance_cap(70_000), u16::MAX);
    }

    #[test]
    fn test_caps_respect_header_ceilings() {
        let caps = TokenCaps::new(100, 8);
        assert_eq!(caps.distance_cap(500), 100);
        assert_eq!(caps.distance_cap(50), 50);
        assert_eq!(caps.length_cap(3), 3);
        assert_eq!(caps.length_cap(40), 8);
    }

    #[test]
    fn test_block_element_count() {
        let block = Block {
            start: 0,
            literal_len: 3,
            matches: vec![Match { distance: 1, length: 3 }, Match { distance: 0, length: 2 }],
        };
        assert_eq!(block.element_count(), 8);
    }
}
