//! Record boundaries and reads fenced to a single record.

use tracing::trace;

use crate::error::{Result, WireError};
use crate::reader::CsvWire;
use crate::state::ParseState;

impl CsvWire {
    /// Length of the record starting at the current position, leading
    /// padding included.
    ///
    /// A record ends at `\r`, `\n`, NUL or the end of input. The cursor and
    /// line-start marker are left exactly where they were.
    pub fn record_length(&mut self) -> usize {
        let mut lookahead = Lookahead::new(self);
        let start = lookahead.wire.cursor.position();
        lookahead.wire.consume_padding();
        while let Some(byte) = lookahead.wire.cursor.read_u8() {
            if matches!(byte, b'\r' | b'\n' | 0) {
                return lookahead.wire.cursor.position() - 1 - start;
            }
        }
        lookahead.wire.cursor.position() - start
    }

    /// Run `f` with reads fenced to the next record.
    ///
    /// Afterwards the cursor sits at the end of that record (followed by
    /// padding) whatever `f` consumed, and whether or not it succeeded.
    pub fn read_marshallable<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<WireError>,
    {
        let max = self.config.max_nesting_depth;
        if self.states.depth() >= max {
            return Err(WireError::NestingTooDeep { max }.into());
        }
        self.states.push(ParseState::capture(&self.cursor));
        self.consume_padding();
        let len = self.record_length();
        let end = self.cursor.position() + len;
        trace!(
            start = self.cursor.position(),
            end,
            depth = self.states.depth(),
            "entering bounded record"
        );

        let result = match self.cursor.set_limit(end) {
            Ok(()) => {
                self.consume_padding();
                f(self)
            }
            Err(err) => Err(WireError::from(err).into()),
        };

        let restored = self.leave_bounded(end);
        self.consume_padding();
        match (result, restored) {
            (Err(err), _) => Err(err),
            (Ok(_), Err(err)) => Err(err.into()),
            (Ok(value), Ok(())) => Ok(value),
        }
    }

    fn leave_bounded(&mut self, end: usize) -> Result<()> {
        let outer_limit = self
            .states
            .peek()
            .map_or(self.cursor.capacity(), |state| state.limit);
        let restored = self
            .cursor
            .set_limit(outer_limit)
            .and_then(|()| self.cursor.set_position(end));
        self.states.pop();
        trace!(end, depth = self.states.depth(), "left bounded record");
        restored.map_err(WireError::from)
    }
}

/// Puts the cursor and line-start marker back when dropped.
struct Lookahead<'a> {
    wire: &'a mut CsvWire,
    position: usize,
    line_start: Option<usize>,
}

impl<'a> Lookahead<'a> {
    fn new(wire: &'a mut CsvWire) -> Self {
        let position = wire.cursor.position();
        let line_start = wire.line_start;
        Self {
            wire,
            position,
            line_start,
        }
    }
}

impl Drop for Lookahead<'_> {
    fn drop(&mut self) {
        // position was valid under the same limit, so this cannot fail
        let _ = self.wire.cursor.set_position(self.position);
        self.wire.line_start = self.line_start;
    }
}
