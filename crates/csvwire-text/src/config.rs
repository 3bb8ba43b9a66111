/// Reader configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireConfig {
    /// Decode unquoted and quoted text one byte per character (ISO-8859-1)
    /// instead of UTF-8.
    pub use_8bit: bool,
    /// Treat the first line as a header of column names.
    pub has_header: bool,
    /// Maximum number of nested bounded reads open at once.
    pub max_nesting_depth: usize,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            use_8bit: false,
            has_header: true,
            max_nesting_depth: 64,
        }
    }
}

impl WireConfig {
    /// Default configuration with 8-bit text decoding, as used for files.
    pub fn eight_bit() -> Self {
        Self {
            use_8bit: true,
            ..Self::default()
        }
    }
}
