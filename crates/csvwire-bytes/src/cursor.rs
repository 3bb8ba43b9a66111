use bytes::{Buf, Bytes};
use tracing::trace;

use crate::error::{BytesError, Result};
use crate::sink::{FieldSink, ScanMode};
use crate::stop::StopCondition;
use crate::stopbit;

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEnd {
    /// A stop character was found; the cursor sits on it.
    Stopped(char),
    /// The read limit was reached.
    Exhausted,
}

/// A read cursor over an immutable byte buffer.
///
/// Reads happen in `position..limit`. The limit can be narrowed and widened
/// again, which is how nested records are fenced off from the rest of the
/// input.
#[derive(Debug, Clone)]
pub struct ByteCursor {
    data: Bytes,
    position: usize,
    limit: usize,
}

impl ByteCursor {
    /// Cursor over the whole of `data`.
    pub fn new(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let limit = data.len();
        Self {
            data,
            position: 0,
            limit,
        }
    }

    pub fn from_static(data: &'static [u8]) -> Self {
        Self::new(Bytes::from_static(data))
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the read position. It must stay within `0..=limit`.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.limit {
            return Err(BytesError::PositionOutOfBounds {
                position,
                limit: self.limit,
            });
        }
        self.position = position;
        Ok(())
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Move the read limit. It must not exceed the buffer length. If the
    /// position lies beyond the new limit it is pulled back to it.
    pub fn set_limit(&mut self, limit: usize) -> Result<()> {
        if limit > self.data.len() {
            trace!(limit, capacity = self.data.len(), "rejected read limit");
            return Err(BytesError::LimitOutOfBounds {
                limit,
                capacity: self.data.len(),
            });
        }
        self.limit = limit;
        self.position = self.position.min(limit);
        Ok(())
    }

    /// Length of the underlying buffer, independent of the limit.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes left before the limit.
    pub fn remaining(&self) -> usize {
        self.limit - self.position
    }

    /// Fail with [`BytesError::Underflow`] unless `needed` bytes remain.
    pub fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(BytesError::Underflow { needed, remaining });
        }
        Ok(())
    }

    /// Next byte, without consuming it.
    pub fn peek_u8(&self) -> Option<u8> {
        (self.position < self.limit).then(|| self.data[self.position])
    }

    /// The byte just before the position, if any.
    pub fn peek_back(&self) -> Option<u8> {
        self.position
            .checked_sub(1)
            .and_then(|p| self.data.get(p).copied())
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        let byte = self.peek_u8()?;
        self.position += 1;
        Some(byte)
    }

    /// Move the position by `delta` bytes. Negative values un-read.
    pub fn skip(&mut self, delta: isize) -> Result<()> {
        let target = self
            .position
            .checked_add_signed(delta)
            .filter(|p| *p <= self.limit)
            .ok_or(BytesError::PositionOutOfBounds {
                position: self.position.saturating_add_signed(delta),
                limit: self.limit,
            })?;
        self.position = target;
        Ok(())
    }

    /// Decode the next character without consuming it, along with its width
    /// in bytes.
    pub fn peek_char(&self, mode: ScanMode) -> Option<(char, usize)> {
        let rest = &self.data[self.position..self.limit];
        let first = *rest.first()?;
        match mode {
            ScanMode::Latin1 => Some((char::from(first), 1)),
            ScanMode::Utf8 => Some(decode_utf8(rest)),
        }
    }

    /// Append characters to `sink` until `stop` fires or the limit is hit.
    ///
    /// The stop character is left unconsumed.
    pub fn scan_until<S, C>(&mut self, sink: &mut S, mode: ScanMode, stop: &mut C) -> ScanEnd
    where
        S: FieldSink + ?Sized,
        C: StopCondition + ?Sized,
    {
        while let Some((ch, width)) = self.peek_char(mode) {
            if stop.test(ch) {
                return ScanEnd::Stopped(ch);
            }
            match mode {
                ScanMode::Latin1 => sink.push_latin1(self.data[self.position]),
                ScanMode::Utf8 => sink.push_char(ch),
            }
            self.position += width;
        }
        ScanEnd::Exhausted
    }

    /// Read a stop-bit encoded unsigned integer.
    pub fn read_stop_bit(&mut self) -> Result<u64> {
        stopbit::read_stop_bit(self)
    }

    /// The bytes between position and limit.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.position..self.limit]
    }
}

impl Buf for ByteCursor {
    fn remaining(&self) -> usize {
        self.limit - self.position
    }

    fn chunk(&self) -> &[u8] {
        &self.data[self.position..self.limit]
    }

    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= Buf::remaining(self),
            "cannot advance past the read limit"
        );
        self.position += cnt;
    }
}

/// Decode one UTF-8 scalar from the front of `bytes` (non-empty).
fn decode_utf8(bytes: &[u8]) -> (char, usize) {
    let width = match bytes[0] {
        0x00..=0x7F => return (char::from(bytes[0]), 1),
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return (char::REPLACEMENT_CHARACTER, 1),
    };
    bytes
        .get(..width)
        .and_then(|b| std::str::from_utf8(b).ok())
        .and_then(|s| s.chars().next())
        .map_or((char::REPLACEMENT_CHARACTER, 1), |ch| (ch, width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stop::StopChars;

    #[test]
    fn peek_does_not_consume() {
        let mut cursor = ByteCursor::from_static(b"ab");
        assert_eq!(cursor.peek_u8(), Some(b'a'));
        assert_eq!(cursor.peek_u8(), Some(b'a'));
        assert_eq!(cursor.read_u8(), Some(b'a'));
        assert_eq!(cursor.peek_back(), Some(b'a'));
        assert_eq!(cursor.read_u8(), Some(b'b'));
        assert_eq!(cursor.read_u8(), None);
    }

    #[test]
    fn skip_backwards_and_bounds() {
        let mut cursor = ByteCursor::from_static(b"abc");
        cursor.skip(3).unwrap();
        cursor.skip(-1).unwrap();
        assert_eq!(cursor.peek_u8(), Some(b'c'));
        assert!(cursor.skip(-5).is_err());
        assert!(cursor.skip(2).is_err());
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn limit_fences_reads() {
        let mut cursor = ByteCursor::from_static(b"hello world");
        cursor.set_limit(5).unwrap();
        let mut out = String::new();
        let end = cursor.scan_until(&mut out, ScanMode::Utf8, &mut StopChars::Comma);
        assert_eq!(end, ScanEnd::Exhausted);
        assert_eq!(out, "hello");
        assert_eq!(cursor.peek_u8(), None);

        cursor.set_limit(11).unwrap();
        assert_eq!(cursor.peek_u8(), Some(b' '));
    }

    #[test]
    fn narrowing_limit_pulls_position_back() {
        let mut cursor = ByteCursor::from_static(b"abcdef");
        cursor.set_position(5).unwrap();
        cursor.set_limit(3).unwrap();
        assert_eq!(cursor.position(), 3);
        assert!(cursor.set_limit(7).is_err());
        assert!(cursor.set_position(4).is_err());
    }

    #[test]
    fn scan_leaves_stop_char_unconsumed() {
        let mut cursor = ByteCursor::from_static(b"abc,def");
        let mut out = String::new();
        let end = cursor.scan_until(&mut out, ScanMode::Latin1, &mut StopChars::Comma);
        assert_eq!(end, ScanEnd::Stopped(','));
        assert_eq!(out, "abc");
        assert_eq!(cursor.peek_u8(), Some(b','));
    }

    #[test]
    fn utf8_and_latin1_modes_differ() {
        let text = "né,x";
        let mut utf8 = ByteCursor::new(text.as_bytes().to_vec());
        let mut out = String::new();
        utf8.scan_until(&mut out, ScanMode::Utf8, &mut StopChars::Comma);
        assert_eq!(out, "né");

        let mut latin1 = ByteCursor::new(text.as_bytes().to_vec());
        out.clear();
        latin1.scan_until(&mut out, ScanMode::Latin1, &mut StopChars::Comma);
        assert_eq!(out, "nÃ©");
    }

    #[test]
    fn raw_sink_keeps_bytes() {
        let mut cursor = ByteCursor::new("né,x".as_bytes().to_vec());
        let mut out = Vec::new();
        cursor.scan_until(&mut out, ScanMode::Latin1, &mut StopChars::Comma);
        assert_eq!(out, "né".as_bytes());
    }

    #[test]
    fn malformed_utf8_becomes_replacement() {
        let mut cursor = ByteCursor::new(vec![b'a', 0xFF, b'b']);
        let mut out = String::new();
        cursor.scan_until(&mut out, ScanMode::Utf8, &mut StopChars::Comma);
        assert_eq!(out, "a\u{FFFD}b");
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn truncated_multibyte_at_limit() {
        let bytes = "é".as_bytes().to_vec();
        let mut cursor = ByteCursor::new(bytes);
        cursor.set_limit(1).unwrap();
        assert_eq!(
            cursor.peek_char(ScanMode::Utf8),
            Some((char::REPLACEMENT_CHARACTER, 1))
        );
    }

    #[test]
    fn buf_reads_respect_limit() {
        let mut cursor = ByteCursor::new(vec![1, 0, 0, 0, 9, 9]);
        cursor.set_limit(4).unwrap();
        assert_eq!(cursor.ensure(4), Ok(()));
        assert_eq!(cursor.get_u32_le(), 1);
        assert_eq!(
            cursor.ensure(1),
            Err(BytesError::Underflow {
                needed: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn stop_bit_through_cursor() {
        let mut cursor = ByteCursor::from_static(&[0x80, 0x01, 0x2A]);
        assert_eq!(cursor.read_stop_bit().unwrap(), 128);
        assert_eq!(cursor.read_stop_bit().unwrap(), 42);
        assert!(cursor.read_stop_bit().is_err());
    }
}
