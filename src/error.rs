use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Encoder errors
    #[error("Value {value} cannot be represented under token cap {cap}")]
    Unrepresentable { value: u32, cap: u16 },

    #[error("Literal run of zero elements at element {0}")]
    EmptyLiteralRun(usize),

    #[error("Literal pool would grow past the {0}-byte source")]
    LiteralOverflow(usize),

    #[error("Match run at element {0} found no matches")]
    EmptyMatchRun(usize),

    #[error("Word mode requires an even input length, got {0} bytes")]
    OddWordInput(usize),

    #[error("Input of {0} bytes is too large for the container format")]
    InputTooLarge(usize),

    #[error("Compressed size {size} exceeds worst-case bound {bound}")]
    BoundExceeded { size: usize, bound: usize },

    // Decoder errors
    #[error("Run of {count} elements exceeds the {remaining} elements remaining")]
    RunOverflow { count: u32, remaining: u32 },

    #[error("Back-reference distance {distance} reaches before the start of the output ({available} elements written)")]
    InvalidBackReference { distance: u32, available: usize },

    #[error("Decompressed size {size} exceeds the {limit}-byte limit")]
    SizeLimitExceeded { size: usize, limit: usize },

    #[error("Output buffer too small: need {needed} bytes, have {available}")]
    OutputTooSmall { needed: usize, available: usize },

    // Internal errors
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Failed to allocate {0} bytes of scratch space")]
    Allocation(usize),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
