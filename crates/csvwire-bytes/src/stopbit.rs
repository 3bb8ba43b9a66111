//! Stop-bit (variable-length) unsigned integers.
//!
//! Each byte carries 7 payload bits, low group first. A set high bit means
//! another byte follows.
//!
//! ```text
//! 0x7f      -> 7f
//! 0x80      -> 80 01
//! 0x3fff    -> ff 7f
//! u64::MAX  -> ff ff ff ff ff ff ff ff ff 01
//! ```

use bytes::{Buf, BufMut};
use tracing::debug;

use crate::error::{BytesError, Result};

/// Longest possible encoding of a `u64`.
pub const MAX_STOP_BIT_LEN: usize = 10;

/// Append `value` to `dst`.
pub fn write_stop_bit<B: BufMut + ?Sized>(dst: &mut B, mut value: u64) {
    while value & !0x7F != 0 {
        dst.put_u8((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    dst.put_u8(value as u8);
}

/// Read one value from `src`, consuming exactly its encoded bytes.
pub fn read_stop_bit<B: Buf + ?Sized>(src: &mut B) -> Result<u64> {
    let mut value = 0u64;
    let mut shift = 0u32;
    loop {
        if !src.has_remaining() {
            return Err(BytesError::Underflow {
                needed: 1,
                remaining: 0,
            });
        }
        let byte = src.get_u8();
        let payload = u64::from(byte & 0x7F);
        if shift == 63 && payload > 1 {
            debug!(byte, "stop-bit integer overflows 64 bits");
            return Err(BytesError::StopBitOverflow);
        }
        value |= payload << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
        if shift > 63 {
            debug!(bytes = MAX_STOP_BIT_LEN, "stop-bit integer has too many continuation bytes");
            return Err(BytesError::StopBitOverflow);
        }
    }
}

/// Number of bytes [`write_stop_bit`] emits for `value`.
pub fn stop_bit_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn encode(value: u64) -> Vec<u8> {
        let mut buf = BytesMut::new();
        write_stop_bit(&mut buf, value);
        buf.to_vec()
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(0x7F), vec![0x7F]);
        assert_eq!(encode(0x80), vec![0x80, 0x01]);
        assert_eq!(encode(0x3FFF), vec![0xFF, 0x7F]);
        assert_eq!(encode(0x4000), vec![0x80, 0x80, 0x01]);
        assert_eq!(encode(u64::MAX).len(), MAX_STOP_BIT_LEN);
    }

    #[test]
    fn length_matches_encoding() {
        for value in [0, 1, 127, 128, 16_383, 16_384, 1 << 35, u64::MAX] {
            assert_eq!(stop_bit_len(value), encode(value).len(), "value {value}");
        }
    }

    #[test]
    fn read_consumes_only_its_bytes() {
        let mut src: &[u8] = &[0x80, 0x01, 0x05];
        assert_eq!(read_stop_bit(&mut src).unwrap(), 128);
        assert_eq!(src, &[0x05]);
        assert_eq!(read_stop_bit(&mut src).unwrap(), 5);
        assert!(src.is_empty());
    }

    #[test]
    fn read_max_value() {
        let encoded = encode(u64::MAX);
        let mut src = encoded.as_slice();
        assert_eq!(read_stop_bit(&mut src).unwrap(), u64::MAX);
    }

    #[test]
    fn truncated_input_underflows() {
        let mut src: &[u8] = &[0x80, 0x80];
        assert!(matches!(
            read_stop_bit(&mut src),
            Err(BytesError::Underflow { .. })
        ));
    }

    #[test]
    fn eleven_byte_input_overflows() {
        let mut src: &[u8] = &[0xFF; 11];
        assert_eq!(read_stop_bit(&mut src), Err(BytesError::StopBitOverflow));
    }

    #[test]
    fn tenth_byte_payload_above_one_overflows() {
        let mut bytes = vec![0xFF; 9];
        bytes.push(0x02);
        let mut src = bytes.as_slice();
        assert_eq!(read_stop_bit(&mut src), Err(BytesError::StopBitOverflow));
    }
}
