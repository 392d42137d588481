//! Match finding and the bit-cost model driving the parse.

use super::element::Elements;
use super::tokens::{Match, TokenCaps};
use crate::code::value_cost;

/// Bits per element by which the match one position later must beat the
/// current one before a match run stops early
pub const LOOKAHEAD_MARGIN: f64 = 0.02;

/// A priced match
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub m: Match,
    /// Bits needed for the distance and length tokens
    pub bits: u32,
}

impl Candidate {
    /// Bits spent per element produced
    #[inline]
    pub fn score(&self) -> f64 {
        self.bits as f64 / self.m.length as f64
    }

    fn beats(&self, other: &Candidate) -> bool {
        let (mine, theirs) = (self.score(), other.score());
        mine < theirs || (mine == theirs && self.m.length > other.m.length)
    }
}

/// Exhaustive back-reference search over one input
pub struct MatchFinder<'a> {
    elements: Elements<'a>,
    caps: TokenCaps,
}

impl<'a> MatchFinder<'a> {
    pub fn new(elements: Elements<'a>, caps: TokenCaps) -> Self {
        Self { elements, caps }
    }

    pub fn elements(&self) -> &Elements<'a> {
        &self.elements
    }

    pub fn caps(&self) -> TokenCaps {
        self.caps
    }

    /// Token bits for `m` when encoded with the counter at `unp_count`
    ///
    /// `None` if the pair cannot or should not be emitted: the distance is
    /// over its cap, the match is below the minimum length, or its length
    /// token would be zero.
    pub fn pair_cost(&self, unp_count: i64, m: Match) -> Option<u32> {
        let width = self.elements.width();
        let distance_cap = self.caps.distance_cap(unp_count);
        if m.distance > distance_cap {
            return None;
        }

        let bias = width.length_bias();
        if m.length < width.min_match_len() || m.length <= bias {
            return None;
        }
        let length_token = u16::try_from(m.length - bias).ok()?;

        let distance_bits = value_cost(distance_cap, m.distance)?;
        let length_bits = value_cost(self.caps.length_cap(m.distance), length_token)?;
        Some(distance_bits + length_bits)
    }

    /// Cheapest match (in bits per element) at element `pos`
    pub fn find_best(&self, pos: usize, unp_count: i64) -> Option<Candidate> {
        let width = self.elements.width();
        let base = width.base_offset();
        if pos < base {
            return None;
        }

        let remaining = self.elements.len() - pos;
        let max_distance = (self.caps.distance_cap(unp_count) as usize).min(pos - base);
        let mut best: Option<Candidate> = None;

        for distance in 0..=max_distance {
            let src = pos - base - distance;
            let max_len = (self.caps.length_cap(distance as u16) as usize
                + width.length_bias() as usize)
                .min(remaining);

            let length = self.elements.common_prefix(src, pos, max_len) as u32;
            if length < width.min_match_len() {
                continue;
            }

            let m = Match { distance: distance as u16, length };
            let Some(bits) = self.pair_cost(unp_count, m) else {
                continue;
            };

            let candidate = Candidate { m, bits };
            if best.as_ref().map_or(true, |b| candidate.beats(b)) {
                best = Some(candidate);
            }
        }

        best
    }

    /// Whether any acceptable match starts at `pos`
    pub fn has_match(&self, pos: usize, unp_count: i64) -> bool {
        self.find_best(pos, unp_count).is_some()
    }

    /// Whether a match run should stop before committing `current`
    ///
    /// True when skipping one element would lead to a match cheaper by more
    /// than [`LOOKAHEAD_MARGIN`] bits per element.
    pub fn next_is_better(&self, current: &Candidate, pos: usize, unp_count: i64) -> bool {
        if pos + 1 >= self.elements.len() {
            return false;
        }
        match self.find_best(pos + 1, unp_count + 1) {
            Some(next) => next.score() + LOOKAHEAD_MARGIN < current.score(),
            None => false,
        }
    }
}
