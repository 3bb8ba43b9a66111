//! CSV-flavored field tokenizer with bounded nested record reads.
//!
//! [`CsvWire`] reads comma and whitespace separated fields straight out of a
//! [`ByteCursor`](csvwire_bytes::ByteCursor):
//! - bare, `"double"` and `'single'` quoted fields with backslash escapes
//! - a header line of column names consumed at construction
//! - [`CsvWire::read_marshallable`], which fences a nested reader to one
//!   record and always leaves the cursor at that record's end
//! - `[a, b, c]` sequences and integer fields
//!
//! [`CsvWriter`] produces the same format. Values travel through the
//! [`WireIn`] and [`WireOut`] traits.

pub mod boundary;
pub mod config;
pub mod error;
mod number;
pub mod pool;
pub mod reader;
pub mod state;
pub mod tokenizer;
pub mod wire;
pub mod writer;

pub use config::WireConfig;
pub use error::{Result, WireError};
pub use pool::StopPool;
pub use reader::{CsvWire, Rows};
pub use state::{ParseState, ParseStateStack};
pub use wire::{SourceContext, WireIn, WireOut};
pub use writer::{CsvWriter, Record};
