pub mod element;
pub mod matcher;
pub mod tokens;

pub use element::{ElementWidth, Elements};
pub use matcher::{Candidate, MatchFinder, LOOKAHEAD_MARGIN};
pub use tokens::{Block, Match, TokenCaps, MAX_RUN_MATCHES};
