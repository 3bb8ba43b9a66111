use std::fmt;

/// Which of the two lineage arrays ran out of room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Sources,
    Timings,
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Sources => f.write_str("sources"),
            Capacity::Timings => f.write_str("timings"),
        }
    }
}

/// Errors that can occur while building or decoding a lineage record.
#[derive(Debug, thiserror::Error)]
pub enum LineageError {
    /// A hop or timing was added to a full record.
    #[error("message lineage {what} exceeded capacity {capacity}")]
    CapacityExceeded { what: Capacity, capacity: usize },

    /// The text encoding could not be read.
    #[error("wire error: {0}")]
    Wire(#[from] csvwire_text::WireError),

    /// The binary encoding could not be read.
    #[error("byte error: {0}")]
    Bytes(#[from] csvwire_bytes::BytesError),

    /// The binary encoding ended in the middle of a value.
    #[error("truncated lineage record (needed {needed} bytes, {remaining} remaining)")]
    Truncated { needed: usize, remaining: usize },
}

pub type Result<T> = std::result::Result<T, LineageError>;
