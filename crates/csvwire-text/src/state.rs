use csvwire_bytes::ByteCursor;

/// Snapshot of a cursor's visible range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseState {
    pub position: usize,
    pub limit: usize,
}

impl ParseState {
    pub fn capture(cursor: &ByteCursor) -> Self {
        Self {
            position: cursor.position(),
            limit: cursor.limit(),
        }
    }
}

/// Saved ranges of the bounded reads currently open, innermost last.
#[derive(Debug, Default)]
pub struct ParseStateStack {
    states: Vec<ParseState>,
}

impl ParseStateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, state: ParseState) {
        self.states.push(state);
    }

    pub fn pop(&mut self) -> Option<ParseState> {
        self.states.pop()
    }

    pub fn peek(&self) -> Option<&ParseState> {
        self.states.last()
    }

    pub fn depth(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_is_lifo() {
        let mut stack = ParseStateStack::new();
        stack.push(ParseState {
            position: 0,
            limit: 10,
        });
        stack.push(ParseState {
            position: 3,
            limit: 7,
        });
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop().map(|s| s.limit), Some(7));
        assert_eq!(stack.peek().map(|s| s.position), Some(0));
        assert_eq!(stack.pop().map(|s| s.limit), Some(10));
        assert!(stack.pop().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn capture_reads_cursor_range() {
        let mut cursor = ByteCursor::from_static(b"0123456789");
        cursor.set_limit(8).unwrap();
        cursor.set_position(2).unwrap();
        assert_eq!(
            ParseState::capture(&cursor),
            ParseState {
                position: 2,
                limit: 8
            }
        );
    }
}
