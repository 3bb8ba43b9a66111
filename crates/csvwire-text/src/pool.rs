use csvwire_bytes::{Escaping, StopChars, StopCondition};

/// Reusable escaping stop conditions owned by one reader.
///
/// Every accessor resets the instance it hands out, so a pending escape from
/// an earlier scan can never leak into the next one.
#[derive(Debug, Clone)]
pub struct StopPool {
    comma: Escaping<StopChars>,
    double_quote: Escaping<StopChars>,
    single_quote: Escaping<StopChars>,
}

impl Default for StopPool {
    fn default() -> Self {
        Self {
            comma: StopChars::Comma.escaping(),
            double_quote: StopChars::DoubleQuote.escaping(),
            single_quote: StopChars::SingleQuote.escaping(),
        }
    }
}

impl StopPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn escaping_comma(&mut self) -> &mut Escaping<StopChars> {
        self.comma.reset();
        &mut self.comma
    }

    pub fn escaping_double_quote(&mut self) -> &mut Escaping<StopChars> {
        self.double_quote.reset();
        &mut self.double_quote
    }

    pub fn escaping_single_quote(&mut self) -> &mut Escaping<StopChars> {
        self.single_quote.reset();
        &mut self.single_quote
    }

    /// The escaping condition closing a field opened with `quote`.
    pub fn escaping_quote(&mut self, quote: u8) -> &mut Escaping<StopChars> {
        if quote == b'\'' {
            self.escaping_single_quote()
        } else {
            self.escaping_double_quote()
        }
    }
}
