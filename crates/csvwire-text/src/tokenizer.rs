use csvwire_bytes::{is_whitespace_byte, FieldSink, ScanEnd, ScanMode};
use tracing::debug;

use crate::reader::CsvWire;

impl CsvWire {
    /// Skip whitespace and commas, recording the start of each new line.
    pub fn consume_padding(&mut self) {
        while let Some(byte) = self.cursor.peek_u8() {
            if !is_whitespace_byte(byte) && byte != b',' {
                break;
            }
            self.cursor.read_u8();
            if byte == b'\n' || byte == b'\r' {
                self.line_start = Some(self.cursor.position());
            }
        }
    }

    /// Scan the next field into `sink`, replacing its contents.
    ///
    /// Quoted fields are unescaped; bare fields lose trailing whitespace. A
    /// trailing `:`, `#` or `}` is left in the input for the enclosing grammar.
    pub fn scan_field<S: FieldSink + ?Sized>(&mut self, sink: &mut S) {
        self.consume_padding();
        sink.clear();
        let bare = match self.cursor.peek_u8() {
            Some(quote @ (b'"' | b'\'')) => {
                self.scan_quoted(sink, quote);
                false
            }
            _ => {
                self.scan_bare(sink);
                true
            }
        };
        if let Some(marker @ (b':' | b'#' | b'}')) = self.cursor.peek_back() {
            if self.cursor.skip(-1).is_ok() && bare {
                sink.pop_if(marker);
            }
        }
    }

    /// Scan the next field as text.
    pub fn text(&mut self) -> String {
        let mut field = String::new();
        self.scan_field(&mut field);
        field
    }

    fn scan_bare<S: FieldSink + ?Sized>(&mut self, sink: &mut S) {
        if self.cursor.remaining() == 0 {
            return;
        }
        let mode = ScanMode::for_sink::<S>(self.config.use_8bit);
        self.cursor.scan_until(sink, mode, self.stops.escaping_comma());
        sink.trim_trailing_whitespace();
    }

    fn scan_quoted<S: FieldSink + ?Sized>(&mut self, sink: &mut S, quote: u8) {
        let mode = ScanMode::for_sink::<S>(self.config.use_8bit);
        let opened_at = self.cursor.position();
        self.cursor.read_u8();
        loop {
            let end = self
                .cursor
                .scan_until(sink, mode, self.stops.escaping_quote(quote));
            if end == ScanEnd::Exhausted {
                debug!(
                    position = opened_at,
                    quote = %char::from(quote),
                    "quoted field not closed before end of input"
                );
                break;
            }
            self.cursor.read_u8();
            // a doubled quote is a literal quote
            if self.cursor.peek_u8() != Some(quote) {
                break;
            }
            self.cursor.read_u8();
            sink.push_latin1(quote);
        }
        sink.unescape();
    }
}
