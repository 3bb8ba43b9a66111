//! Integer literals: optional sign, then decimal digits or `0x` hex digits.

/// A parsed literal before range checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Literal {
    pub negative: bool,
    pub magnitude: u64,
    pub hex: bool,
}

impl Literal {
    pub fn parse(text: &str) -> Option<Self> {
        let (negative, body) = match text.as_bytes().first()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };
        let (hex, digits) = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
            Some(rest) => (true, rest),
            None => (false, body),
        };
        let valid = if hex {
            digits.bytes().all(|b| b.is_ascii_hexdigit())
        } else {
            digits.bytes().all(|b| b.is_ascii_digit())
        };
        if digits.is_empty() || !valid {
            return None;
        }
        let magnitude = u64::from_str_radix(digits, if hex { 16 } else { 10 }).ok()?;
        Some(Self {
            negative,
            magnitude,
            hex,
        })
    }

    /// Hex literals carry raw two's complement bits; decimal ones are range
    /// checked.
    pub fn to_i64(self) -> Option<i64> {
        if self.hex {
            let bits = self.magnitude as i64;
            return Some(if self.negative {
                bits.wrapping_neg()
            } else {
                bits
            });
        }
        if self.negative {
            (self.magnitude <= 1u64 << 63).then(|| (self.magnitude as i64).wrapping_neg())
        } else {
            i64::try_from(self.magnitude).ok()
        }
    }

    pub fn to_i32(self) -> Option<i32> {
        if self.hex && !self.negative {
            return u32::try_from(self.magnitude).ok().map(|v| v as i32);
        }
        i32::try_from(self.to_i64()?).ok()
    }

    pub fn to_u32(self) -> Option<u32> {
        if self.negative {
            return (self.magnitude == 0).then_some(0);
        }
        u32::try_from(self.magnitude).ok()
    }
}

/// Bytes that may appear in an unquoted integer literal.
pub(crate) fn is_literal_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'+'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(text: &str) -> Literal {
        Literal::parse(text).unwrap()
    }

    #[test]
    fn decimal_values() {
        assert_eq!(lit("42").to_i64(), Some(42));
        assert_eq!(lit("-42").to_i64(), Some(-42));
        assert_eq!(lit("+7").to_i32(), Some(7));
        assert_eq!(lit("-9223372036854775808").to_i64(), Some(i64::MIN));
        assert_eq!(lit("9223372036854775808").to_i64(), None);
    }

    #[test]
    fn hex_values_are_bit_patterns() {
        assert_eq!(lit("0x64").to_i64(), Some(100));
        assert_eq!(lit("0xffffffffffffffff").to_i64(), Some(-1));
        assert_eq!(lit("0xFFFFFFFF").to_i32(), Some(-1));
        assert_eq!(lit("0xFFFFFFFF").to_u32(), Some(u32::MAX));
    }

    #[test]
    fn unsigned_range() {
        assert_eq!(lit("4294967295").to_u32(), Some(u32::MAX));
        assert_eq!(lit("4294967296").to_u32(), None);
        assert_eq!(lit("-1").to_u32(), None);
    }

    #[test]
    fn rejects_malformed() {
        assert!(Literal::parse("").is_none());
        assert!(Literal::parse("-").is_none());
        assert!(Literal::parse("0x").is_none());
        assert!(Literal::parse("12ab").is_none());
        assert!(Literal::parse("]").is_none());
    }
}
