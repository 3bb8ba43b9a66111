//! Stop conditions that terminate a text scan.
//!
//! A scan feeds every decoded character to a [`StopCondition`] before it is
//! appended to the destination. The built-in [`StopChars`] cover the three
//! delimiters the CSV tokenizer needs; [`Escaping`] wraps any of them so that a
//! backslash disables the test for exactly the following character.

/// Escape character recognised by [`Escaping`].
pub const ESCAPE: char = '\\';

/// Predicate deciding whether a character ends a scan.
pub trait StopCondition {
    /// Returns true if `ch` terminates the scan. The character is not consumed.
    fn test(&mut self, ch: char) -> bool;

    /// Clear any internal state before the condition is reused.
    fn reset(&mut self) {}
}

impl<C: StopCondition + ?Sized> StopCondition for &mut C {
    fn test(&mut self, ch: char) -> bool {
        (**self).test(ch)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Stateless built-in stop conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopChars {
    /// Stops on `,` and on any control character (line breaks, NUL).
    Comma,
    /// Stops on `"`.
    DoubleQuote,
    /// Stops on `'`.
    SingleQuote,
}

impl StopChars {
    /// Wrap this condition with backslash escaping.
    pub fn escaping(self) -> Escaping<Self> {
        Escaping::new(self)
    }
}

impl StopCondition for StopChars {
    fn test(&mut self, ch: char) -> bool {
        match self {
            StopChars::Comma => ch == ',' || (ch as u32) < 0x20,
            StopChars::DoubleQuote => ch == '"',
            StopChars::SingleQuote => ch == '\'',
        }
    }
}

/// Decorator that lets a backslash protect the next character from the
/// wrapped condition.
///
/// Both the backslash and the protected character are still passed through
/// to the destination; translating escape sequences is the caller's job.
#[derive(Debug, Clone)]
pub struct Escaping<S> {
    inner: S,
    escaped: bool,
}

impl<S: StopCondition> Escaping<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            escaped: false,
        }
    }

    /// Whether the previous character was an unconsumed escape.
    pub fn is_escape_pending(&self) -> bool {
        self.escaped
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: StopCondition> StopCondition for Escaping<S> {
    fn test(&mut self, ch: char) -> bool {
        if self.escaped {
            self.escaped = false;
            return false;
        }
        if ch == ESCAPE {
            self.escaped = true;
            return false;
        }
        self.inner.test(ch)
    }

    fn reset(&mut self) {
        self.escaped = false;
        self.inner.reset();
    }
}
