//! Interfaces between the CSV reader/writer and the values marshalled
//! through them.

use csvwire_bytes::FieldSink;

use crate::error::WireError;

/// Identity of the stream a document was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceContext {
    pub source_id: u32,
    pub index: i64,
}

impl SourceContext {
    pub fn new(source_id: u32, index: i64) -> Self {
        Self { source_id, index }
    }
}

/// Reading side of a structured text wire.
pub trait WireIn {
    /// Select the value for `key`. Positional wires ignore the key.
    fn read(&mut self, key: &str) -> &mut Self;

    /// Read a `[ ... ]` sequence, handing the reader to `f` for the items.
    fn sequence<T, E>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E>
    where
        E: From<WireError>;

    /// True while another item of the current sequence follows.
    fn has_next_sequence_item(&mut self) -> bool;

    fn int32(&mut self) -> Result<i32, WireError>;

    fn uint32(&mut self) -> Result<u32, WireError>;

    fn int64(&mut self) -> Result<i64, WireError>;

    /// Scan the next field into `sink`.
    fn text_into<S: FieldSink>(&mut self, sink: &mut S);

    /// The stream this document belongs to, if known.
    fn source_context(&self) -> Option<SourceContext>;
}

/// Writing side of a structured text wire.
pub trait WireOut {
    /// Name the next value. Positional wires use the name for headers only.
    fn write(&mut self, key: &str) -> &mut Self;

    /// Write a `[ ... ]` sequence whose items are produced by `f`.
    fn sequence(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self;

    fn uint32(&mut self, value: u32) -> &mut Self;

    fn int64(&mut self, value: i64) -> &mut Self;

    /// Write a 64-bit value in `0x` hex form.
    fn int64_hex(&mut self, value: i64) -> &mut Self;

    fn text(&mut self, value: &str) -> &mut Self;
}
