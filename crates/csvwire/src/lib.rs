//! CSV-flavored wire tokenizer and message lineage codec.
//!
//! # Crate Structure
//!
//! - [`cursor`]: bounded byte cursor, stop conditions, stop-bit integers
//! - [`text`]: the `CsvWire` reader, bounded nested reads and `CsvWriter`
//! - [`lineage`]: the `MessageLineage` provenance record

/// Re-export cursor types.
pub mod cursor {
    pub use csvwire_bytes::*;
}

/// Re-export text reader and writer types.
pub mod text {
    pub use csvwire_text::*;
}

/// Re-export lineage types.
pub mod lineage {
    pub use csvwire_lineage::*;
}

pub use csvwire_bytes::ByteCursor;
pub use csvwire_lineage::{with_thread_lineage, MessageLineage};
pub use csvwire_text::{CsvWire, CsvWriter, SourceContext, WireConfig, WireIn, WireOut};
