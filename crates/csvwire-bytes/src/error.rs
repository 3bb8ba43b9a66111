/// Errors that can occur while reading from or positioning a byte cursor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BytesError {
    /// Fewer bytes remain before the read limit than the read requires.
    #[error("buffer underflow (needed {needed} bytes, {remaining} remaining)")]
    Underflow { needed: usize, remaining: usize },

    /// A stop-bit encoded integer ran past 64 bits of payload.
    #[error("stop-bit integer overflows 64 bits")]
    StopBitOverflow,

    /// A read position was moved outside `0..=limit`.
    #[error("position {position} out of bounds (limit {limit})")]
    PositionOutOfBounds { position: usize, limit: usize },

    /// A read limit was moved past the end of the underlying buffer.
    #[error("limit {limit} out of bounds (capacity {capacity})")]
    LimitOutOfBounds { limit: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, BytesError>;
