use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::wire::WireOut;

/// Writer producing text [`CsvWire`](crate::CsvWire) can read back.
///
/// Field names passed to [`WireOut::write`] while the first record is open
/// become the header line. Values are separated by `", "`, sequences are
/// written as `[a, b]` and text is quoted whenever it would not survive a
/// bare scan.
#[derive(Debug)]
pub struct CsvWriter {
    out: String,
    write_header: bool,
    header: Vec<String>,
    header_written: bool,
    line_start: usize,
    fields: usize,
    open_sequences: Vec<usize>,
    records: usize,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvWriter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            write_header: true,
            header: Vec::new(),
            header_written: false,
            line_start: 0,
            fields: 0,
            open_sequences: Vec::new(),
            records: 0,
        }
    }

    /// Writer that emits records only.
    pub fn without_header() -> Self {
        Self {
            write_header: false,
            ..Self::new()
        }
    }

    /// Open a record. It is committed as one line when the returned guard
    /// drops, or discarded if nothing was written to it.
    pub fn start_record(&mut self) -> Record<'_> {
        if self.fields > 0 {
            self.end_record();
        }
        Record {
            writer: self,
            rollback: false,
        }
    }

    /// Terminate the current line.
    pub fn end_record(&mut self) {
        if self.fields == 0 {
            self.discard_record();
            return;
        }
        self.open_sequences.clear();
        self.out.push('\n');
        if self.write_header && !self.header_written {
            let mut line = String::new();
            for (i, name) in self.header.iter().enumerate() {
                if i > 0 {
                    line.push_str(", ");
                }
                push_text(&mut line, name);
            }
            line.push('\n');
            self.out.insert_str(0, &line);
            self.header_written = true;
        }
        self.fields = 0;
        self.line_start = self.out.len();
        self.records += 1;
        trace!(records = self.records, bytes = self.out.len(), "committed csv record");
    }

    fn discard_record(&mut self) {
        self.out.truncate(self.line_start);
        self.fields = 0;
        self.open_sequences.clear();
        if !self.header_written {
            self.header.clear();
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Records committed so far.
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Commit any open line and return the document.
    pub fn finish(mut self) -> String {
        if self.fields > 0 {
            self.end_record();
        }
        self.out
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.finish().into_bytes()
    }

    fn separate(&mut self) {
        let count = match self.open_sequences.last_mut() {
            Some(items) => items,
            None => &mut self.fields,
        };
        if *count > 0 {
            self.out.push_str(", ");
        }
        *count += 1;
    }
}

impl WireOut for CsvWriter {
    fn write(&mut self, key: &str) -> &mut Self {
        if self.write_header && !self.header_written && self.open_sequences.is_empty() {
            self.header.push(key.to_owned());
        }
        self
    }

    fn sequence(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        self.separate();
        self.out.push('[');
        self.open_sequences.push(0);
        f(self);
        self.open_sequences.pop();
        self.out.push(']');
        self
    }

    fn uint32(&mut self, value: u32) -> &mut Self {
        self.separate();
        self.out.push_str(&value.to_string());
        self
    }

    fn int64(&mut self, value: i64) -> &mut Self {
        self.separate();
        self.out.push_str(&value.to_string());
        self
    }

    fn int64_hex(&mut self, value: i64) -> &mut Self {
        self.separate();
        self.out.push_str(&format!("0x{:x}", value as u64));
        self
    }

    fn text(&mut self, value: &str) -> &mut Self {
        self.separate();
        push_text(&mut self.out, value);
        self
    }
}

/// An open record of a [`CsvWriter`].
pub struct Record<'a> {
    writer: &'a mut CsvWriter,
    rollback: bool,
}

impl Record<'_> {
    /// Discard everything written to this record when it closes.
    pub fn rollback_on_close(&mut self) {
        self.rollback = true;
    }

    pub fn is_empty(&self) -> bool {
        self.writer.fields == 0
    }
}

impl Deref for Record<'_> {
    type Target = CsvWriter;

    fn deref(&self) -> &CsvWriter {
        self.writer
    }
}

impl DerefMut for Record<'_> {
    fn deref_mut(&mut self) -> &mut CsvWriter {
        self.writer
    }
}

impl Drop for Record<'_> {
    fn drop(&mut self) {
        if self.rollback {
            trace!("rolled back csv record");
            self.writer.discard_record();
        } else {
            self.writer.end_record();
        }
    }
}

fn is_bare(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| {
            b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'/' | b'+' | b'@')
        })
}

fn push_text(out: &mut String, value: &str) {
    if is_bare(value) {
        out.push_str(value);
        return;
    }
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if u32::from(c) < 0x20 => out.push_str(&format!("\\x{:02x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
}
