//! Message lineage: the chain of sources and timing stamps a message
//! collected on its way through a pipeline.
//!
//! A [`MessageLineage`] holds up to [`MAX_SOURCES`] hops and [`MAX_TIMINGS`]
//! stamps and has two encodings:
//! - text, through any [`WireIn`](csvwire_text::WireIn) /
//!   [`WireOut`](csvwire_text::WireOut), as a `sources` sequence of id/index
//!   pairs and a `timings` sequence
//! - binary: a stop-bit hop count, little-endian `(u32, i64)` hops, a stop-bit
//!   stamp count and little-endian `i64` stamps
//!
//! Every thread also has a default record, see [`with_thread_lineage`].

pub mod error;
pub mod lineage;
pub mod thread;

pub use error::{Capacity, LineageError, Result};
pub use lineage::{wall_clock_nanos, Clock, MessageLineage, MAX_SOURCES, MAX_TIMINGS};
pub use thread::{set_thread_lineage, with_thread_lineage};
