/// Errors that can occur while reading or writing CSV wire text.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The underlying cursor rejected a read or reposition.
    #[error("cursor error: {0}")]
    Bytes(#[from] csvwire_bytes::BytesError),

    /// Loading input from disk failed.
    #[error("wire I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A field expected to hold an integer did not parse as one.
    #[error("invalid number {text:?} at byte {position}")]
    InvalidNumber { text: String, position: usize },

    /// A structural byte was missing.
    #[error("expected '{expected}' at byte {position}, found {found:?}")]
    UnexpectedByte {
        expected: char,
        found: Option<char>,
        position: usize,
    },

    /// Nested bounded reads went deeper than the configured maximum.
    #[error("nested records exceed maximum depth {max}")]
    NestingTooDeep { max: usize },
}

pub type Result<T> = std::result::Result<T, WireError>;
