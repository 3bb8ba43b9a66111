//! Destinations for scanned text.
//!
//! A scan writes either into a textual sink ([`String`]) or a raw byte sink
//! ([`Vec<u8>`]). Which one is in use is known at compile time through
//! [`FieldSink::RAW`], so the tokenizer can pick a scan mode without any
//! runtime type inspection.

use std::iter::Peekable;

/// How bytes are decoded into characters during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// One byte is one character (ISO-8859-1).
    Latin1,
    /// Bytes are decoded as UTF-8; malformed sequences become U+FFFD.
    Utf8,
}

impl ScanMode {
    /// Mode to use for a destination, given the configured 8-bit flag.
    pub fn for_sink<S: FieldSink + ?Sized>(use_8bit: bool) -> Self {
        if S::RAW || use_8bit {
            ScanMode::Latin1
        } else {
            ScanMode::Utf8
        }
    }

    pub fn from_8bit(use_8bit: bool) -> Self {
        if use_8bit {
            ScanMode::Latin1
        } else {
            ScanMode::Utf8
        }
    }
}

/// A growable buffer a field can be scanned into.
pub trait FieldSink {
    /// True for byte sinks, false for text sinks.
    const RAW: bool;

    fn clear(&mut self);

    fn is_empty(&self) -> bool;

    /// Append a byte read in [`ScanMode::Latin1`].
    fn push_latin1(&mut self, byte: u8);

    /// Append a character read in [`ScanMode::Utf8`].
    fn push_char(&mut self, ch: char);

    /// Drop trailing whitespace.
    fn trim_trailing_whitespace(&mut self);

    /// Remove the last byte if it equals `byte`. Returns whether it did.
    fn pop_if(&mut self, byte: u8) -> bool;

    /// Translate backslash escape sequences in place.
    fn unescape(&mut self);
}

impl FieldSink for String {
    const RAW: bool = false;

    fn clear(&mut self) {
        String::clear(self);
    }

    fn is_empty(&self) -> bool {
        String::is_empty(self)
    }

    fn push_latin1(&mut self, byte: u8) {
        self.push(char::from(byte));
    }

    fn push_char(&mut self, ch: char) {
        self.push(ch);
    }

    fn trim_trailing_whitespace(&mut self) {
        let len = self
            .trim_end_matches(|c: char| c.is_ascii() && is_whitespace_byte(c as u8))
            .len();
        self.truncate(len);
    }

    fn pop_if(&mut self, byte: u8) -> bool {
        if self.as_bytes().last() == Some(&byte) && byte.is_ascii() {
            self.pop();
            true
        } else {
            false
        }
    }

    fn unescape(&mut self) {
        if !self.contains('\\') {
            return;
        }
        let mut out = String::with_capacity(self.len());
        let mut chars = self.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch != '\\' {
                out.push(ch);
                continue;
            }
            let Some(code) = chars.next() else {
                out.push(ch);
                break;
            };
            match resolve_escape(code, &mut chars) {
                Unescaped::Char(c) => out.push(c),
                Unescaped::Byte(b) => out.push(char::from(b)),
                Unescaped::Verbatim => out.push(code),
            }
        }
        *self = out;
    }
}

impl FieldSink for Vec<u8> {
    const RAW: bool = true;

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }

    fn push_latin1(&mut self, byte: u8) {
        self.push(byte);
    }

    fn push_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }

    fn trim_trailing_whitespace(&mut self) {
        while self.last().is_some_and(|b| is_whitespace_byte(*b)) {
            self.pop();
        }
    }

    fn pop_if(&mut self, byte: u8) -> bool {
        if self.last() == Some(&byte) {
            self.pop();
            true
        } else {
            false
        }
    }

    fn unescape(&mut self) {
        if !self.contains(&b'\\') {
            return;
        }
        let mut out = Vec::with_capacity(self.len());
        let mut bytes = self.iter().copied().peekable();
        while let Some(byte) = bytes.next() {
            if byte != b'\\' {
                out.push(byte);
                continue;
            }
            let Some(code) = bytes.next() else {
                out.push(byte);
                break;
            };
            match resolve_escape(char::from(code), &mut bytes) {
                Unescaped::Char(c) => out.push_char(c),
                Unescaped::Byte(b) => out.push(b),
                Unescaped::Verbatim => out.push(code),
            }
        }
        *self = out;
    }
}

/// Whitespace as understood by padding and trimming: space, `\t`, `\n`,
/// `\x0B`, `\x0C`, `\r` and the separators `\x1C`..=`\x1F`.
pub fn is_whitespace_byte(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r' | 0x1C..=0x1F)
}

enum Unescaped {
    Char(char),
    Byte(u8),
    Verbatim,
}

fn resolve_escape<I, T>(code: char, rest: &mut Peekable<I>) -> Unescaped
where
    I: Iterator<Item = T>,
    T: Copy + Into<u32>,
{
    let ch = match code {
        '0' => '\0',
        'a' => '\u{7}',
        'b' => '\u{8}',
        't' => '\t',
        'n' => '\n',
        'v' => '\u{B}',
        'f' => '\u{C}',
        'r' => '\r',
        'e' => '\u{1B}',
        'N' => '\u{85}',
        '_' => '\u{A0}',
        'L' => '\u{2028}',
        'P' => '\u{2029}',
        'x' => {
            return match take_hex(rest, 2) {
                Some(value) => Unescaped::Byte(value as u8),
                None => Unescaped::Verbatim,
            }
        }
        'u' => {
            return match take_hex(rest, 4) {
                Some(value) => {
                    Unescaped::Char(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER))
                }
                None => Unescaped::Verbatim,
            }
        }
        _ => return Unescaped::Verbatim,
    };
    Unescaped::Char(ch)
}

/// Consume up to `digits` hex digits. `None` if there was not even one.
fn take_hex<I, T>(it: &mut Peekable<I>, digits: usize) -> Option<u32>
where
    I: Iterator<Item = T>,
    T: Copy + Into<u32>,
{
    let mut value = 0u32;
    let mut taken = 0;
    while taken < digits {
        let Some(digit) = it
            .peek()
            .and_then(|t| char::from_u32((*t).into()))
            .and_then(|c| c.to_digit(16))
        else {
            break;
        };
        it.next();
        value = value * 16 + digit;
        taken += 1;
    }
    (taken > 0).then_some(value)
}
