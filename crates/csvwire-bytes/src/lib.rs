//! Position/limit-bounded byte cursor for text and binary codecs.
//!
//! This is the lowest layer of csvwire. It provides:
//! - [`ByteCursor`], a read cursor whose visible range can be narrowed and
//!   restored, with peek, un-read and scan-until-stop operations
//! - [`StopCondition`] predicates, including the backslash [`Escaping`]
//!   decorator
//! - [`FieldSink`] destinations, text ([`String`]) or raw ([`Vec<u8>`])
//! - stop-bit variable-length integers
//!
//! The cursor also implements [`bytes::Buf`], so fixed-width little-endian
//! reads come from the `bytes` crate.

pub mod cursor;
pub mod error;
pub mod sink;
pub mod stop;
pub mod stopbit;

pub use cursor::{ByteCursor, ScanEnd};
pub use error::{BytesError, Result};
pub use sink::{is_whitespace_byte, FieldSink, ScanMode};
pub use stop::{Escaping, StopChars, StopCondition, ESCAPE};
pub use stopbit::{read_stop_bit, stop_bit_len, write_stop_bit, MAX_STOP_BIT_LEN};
