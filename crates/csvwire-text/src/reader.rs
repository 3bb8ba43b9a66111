use std::path::Path;

use bytes::Bytes;
use csvwire_bytes::{ByteCursor, FieldSink};
use tracing::{debug, trace};

use crate::config::WireConfig;
use crate::error::{Result, WireError};
use crate::number::{is_literal_byte, Literal};
use crate::pool::StopPool;
use crate::state::ParseStateStack;
use crate::wire::{SourceContext, WireIn};

/// Reader for comma/whitespace separated records held in one byte buffer.
///
/// The first line is taken as a header of column names (unless disabled in
/// [`WireConfig`]). Records are positional: the header is informational and
/// never used to look fields up.
#[derive(Debug)]
pub struct CsvWire {
    pub(crate) cursor: ByteCursor,
    pub(crate) config: WireConfig,
    pub(crate) header: Vec<String>,
    pub(crate) line_start: Option<usize>,
    pub(crate) states: ParseStateStack,
    pub(crate) stops: StopPool,
    pub(crate) source: Option<SourceContext>,
}

impl CsvWire {
    /// Create a reader over `cursor` and consume the header line.
    pub fn new(cursor: ByteCursor, config: WireConfig) -> Self {
        let mut wire = Self {
            cursor,
            config,
            header: Vec::new(),
            line_start: None,
            states: ParseStateStack::new(),
            stops: StopPool::new(),
            source: None,
        };
        if config.has_header {
            wire.extract_header();
        }
        wire
    }

    pub fn from_bytes(data: impl Into<Bytes>, config: WireConfig) -> Self {
        Self::new(ByteCursor::new(data), config)
    }

    /// Reader over in-memory text, decoded as UTF-8.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(Bytes::copy_from_slice(text.as_bytes()), WireConfig::default())
    }

    /// Read a whole file and decode it as 8-bit text.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        debug!(?path, bytes = data.len(), "loaded csv file");
        Ok(Self::from_bytes(data, WireConfig::eight_bit()))
    }

    /// Attach the identity of the stream this document came from.
    pub fn with_source_context(mut self, source: SourceContext) -> Self {
        self.source = Some(source);
        self
    }

    pub fn set_source_context(&mut self, source: Option<SourceContext>) {
        self.source = source;
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Position of `name` in the header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column == name)
    }

    /// Byte offset just after the most recent line break consumed as padding.
    pub fn line_start(&self) -> Option<usize> {
        self.line_start
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    pub fn cursor(&self) -> &ByteCursor {
        &self.cursor
    }

    pub fn config(&self) -> &WireConfig {
        &self.config
    }

    /// Number of bounded reads currently open.
    pub fn nesting_depth(&self) -> usize {
        self.states.depth()
    }

    /// Skip padding and report whether any input is left.
    pub fn has_more(&mut self) -> bool {
        self.consume_padding();
        self.cursor.remaining() > 0
    }

    /// Read a field name.
    pub fn read_name(&mut self, name: &mut String) {
        self.consume_padding();
        self.scan_field(name);
    }

    /// CSV carries no comments.
    pub fn read_comment(&mut self, comment: &mut String) {
        comment.clear();
    }

    fn extract_header(&mut self) {
        loop {
            self.consume_padding();
            if self.line_start.is_some() || self.cursor.remaining() == 0 {
                break;
            }
            let column = self.next_field();
            self.header.push(column);
        }
        debug!(columns = self.header.len(), "extracted csv header");
    }

    /// Scan one field, making sure the cursor moves even when it sits on a
    /// byte the tokenizer hands back to an enclosing grammar.
    pub(crate) fn next_field(&mut self) -> String {
        self.consume_padding();
        let before = self.cursor.position();
        let mut field = String::new();
        self.scan_field(&mut field);
        if self.cursor.position() == before {
            if let Some(byte @ (b':' | b'#' | b'}')) = self.cursor.read_u8() {
                field.push(char::from(byte));
            }
        }
        field
    }

    /// Read the fields of the next line. `None` once the input is exhausted.
    pub fn read_row(&mut self) -> Option<Vec<String>> {
        if !self.has_more() {
            return None;
        }
        let line = self.line_start;
        let mut fields = Vec::new();
        loop {
            fields.push(self.next_field());
            self.consume_padding();
            if self.line_start != line || self.cursor.remaining() == 0 {
                break;
            }
        }
        Some(fields)
    }

    /// Iterate over the remaining lines.
    pub fn rows(&mut self) -> Rows<'_> {
        Rows { wire: self }
    }

    /// Consume padding, then report whether another sequence item follows.
    pub fn has_next_sequence_item(&mut self) -> bool {
        self.consume_padding();
        match self.cursor.peek_u8() {
            Some(b',') => {
                self.cursor.read_u8();
                true
            }
            Some(byte) => byte > 0 && byte != b']',
            None => false,
        }
    }

    pub fn sequence<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<WireError>,
    {
        self.expect_byte(b'[')?;
        let value = f(self)?;
        self.expect_byte(b']')?;
        Ok(value)
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        self.consume_padding();
        match self.cursor.peek_u8() {
            Some(byte) if byte == expected => {
                self.cursor.read_u8();
                Ok(())
            }
            found => Err(WireError::UnexpectedByte {
                expected: char::from(expected),
                found: found.map(char::from),
                position: self.cursor.position(),
            }),
        }
    }

    pub fn int32(&mut self) -> Result<i32> {
        self.read_number(Literal::to_i32)
    }

    pub fn uint32(&mut self) -> Result<u32> {
        self.read_number(Literal::to_u32)
    }

    pub fn int64(&mut self) -> Result<i64> {
        self.read_number(Literal::to_i64)
    }

    fn read_number<T>(&mut self, convert: fn(Literal) -> Option<T>) -> Result<T> {
        self.consume_padding();
        let position = self.cursor.position();
        let mut text = String::new();
        match self.cursor.peek_u8() {
            Some(b'"' | b'\'') => self.scan_field(&mut text),
            _ => {
                while let Some(byte) = self.cursor.peek_u8().filter(|b| is_literal_byte(*b)) {
                    text.push(char::from(byte));
                    self.cursor.read_u8();
                }
            }
        }
        match Literal::parse(text.trim()).and_then(convert) {
            Some(value) => Ok(value),
            None => {
                trace!(%text, position, "rejected numeric field");
                Err(WireError::InvalidNumber { text, position })
            }
        }
    }
}

impl WireIn for CsvWire {
    fn read(&mut self, key: &str) -> &mut Self {
        trace!(key, position = self.cursor.position(), "positional read");
        self
    }

    fn sequence<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<WireError>,
    {
        CsvWire::sequence(self, f)
    }

    fn has_next_sequence_item(&mut self) -> bool {
        CsvWire::has_next_sequence_item(self)
    }

    fn int32(&mut self) -> Result<i32> {
        CsvWire::int32(self)
    }

    fn uint32(&mut self) -> Result<u32> {
        CsvWire::uint32(self)
    }

    fn int64(&mut self) -> Result<i64> {
        CsvWire::int64(self)
    }

    fn text_into<S: FieldSink>(&mut self, sink: &mut S) {
        self.scan_field(sink);
    }

    fn source_context(&self) -> Option<SourceContext> {
        self.source
    }
}

/// Iterator over the lines of a [`CsvWire`], see [`CsvWire::rows`].
pub struct Rows<'a> {
    wire: &'a mut CsvWire,
}

impl Iterator for Rows<'_> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.wire.read_row()
    }
}
