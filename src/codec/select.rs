//! Element width selection.
//!
//! `Auto` encodes the input once per candidate width and keeps the smaller
//! container. The trials are independent calls of [`encode`], so running
//! them on two threads cannot change the outcome.

use tracing::debug;

use super::encoder::{encode, Encoded};
use crate::error::{Error, Result};
use crate::lz::{ElementWidth, TokenCaps};
use crate::{CompressConfig, WidthPolicy};

/// Encode `src` according to `config`
pub fn encode_with(src: &[u8], config: &CompressConfig) -> Result<Encoded> {
    let caps = config.caps();

    match config.width {
        WidthPolicy::Byte => encode(src, ElementWidth::Byte, caps),
        WidthPolicy::Word => encode(src, ElementWidth::Word, caps),
        WidthPolicy::Auto => {
            let (byte, word) = if src.len() % 2 != 0 {
                (encode(src, ElementWidth::Byte, caps), None)
            } else if config.effective_threads() > 1 {
                run_parallel(src, caps)?
            } else {
                (encode(src, ElementWidth::Byte, caps), Some(encode(src, ElementWidth::Word, caps)))
            };
            pick_smaller(byte, word)
        }
    }
}

fn run_parallel(
    src: &[u8],
    caps: TokenCaps,
) -> Result<(Result<Encoded>, Option<Result<Encoded>>)> {
    let result = crossbeam::scope(|scope| {
        let word = scope.spawn(move |_| encode(src, ElementWidth::Word, caps));
        let byte = encode(src, ElementWidth::Byte, caps);
        let word = word.join().map_err(|_| Error::Internal("Thread panicked".to_string()));
        (byte, word)
    });

    let (byte, word) = result.map_err(|_| Error::Internal("Thread panicked".to_string()))?;
    Ok((byte, Some(word?)))
}

/// Keep the smaller container; byte mode wins ties, a failed trial never wins
fn pick_smaller(byte: Result<Encoded>, word: Option<Result<Encoded>>) -> Result<Encoded> {
    if let (Ok(b), Some(Ok(w))) = (&byte, &word) {
        debug!(byte = b.data.len(), word = w.data.len(), "width trials");
    }

    match (byte, word) {
        (Ok(b), Some(Ok(w))) => Ok(if w.data.len() < b.data.len() { w } else { b }),
        (Ok(b), _) => Ok(b),
        (Err(e), Some(Ok(w))) => {
            debug!(error = %e, "byte trial failed, using word mode");
            Ok(w)
        }
        (Err(e), _) => Err(e),
    }
}
