use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use csvwire_bytes::{read_stop_bit, stop_bit_len, write_stop_bit};
use csvwire_text::{WireIn, WireOut};
use tracing::warn;

use crate::error::{Capacity, LineageError, Result};

/// Maximum number of hops a record can carry.
pub const MAX_SOURCES: usize = 20;

/// Maximum number of timing stamps a record can carry.
pub const MAX_TIMINGS: usize = MAX_SOURCES * 2;

/// Encoded size of one hop in the binary form.
const HOP_LEN: usize = 4 + 8;

const TIMING_LEN: usize = 8;

/// Source of timing stamps.
pub type Clock = fn() -> i64;

/// Wall-clock nanoseconds since the Unix epoch.
pub fn wall_clock_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX))
}

/// The path a message took through a pipeline.
///
/// Each stage appends a hop (source id and index within that source) and a
/// timing stamp. Capacity is fixed at [`MAX_SOURCES`] hops and
/// [`MAX_TIMINGS`] stamps; both only grow until the next reset.
#[derive(Clone)]
pub struct MessageLineage {
    source_ids: [u32; MAX_SOURCES],
    source_indices: [i64; MAX_SOURCES],
    sources: usize,
    timings: [i64; MAX_TIMINGS],
    timing_count: usize,
    auto_capture: bool,
    clock: Clock,
}

impl Default for MessageLineage {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLineage {
    pub fn new() -> Self {
        Self::with_clock(wall_clock_nanos)
    }

    /// Empty record whose timing stamps come from `clock`.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            source_ids: [0; MAX_SOURCES],
            source_indices: [0; MAX_SOURCES],
            sources: 0,
            timings: [0; MAX_TIMINGS],
            timing_count: 0,
            auto_capture: false,
            clock,
        }
    }

    /// When enabled, decoding the text form appends the reading wire's
    /// source hop and a fresh timing stamp.
    pub fn set_auto_capture(&mut self, enabled: bool) {
        self.auto_capture = enabled;
    }

    pub fn auto_capture(&self) -> bool {
        self.auto_capture
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    pub fn reset(&mut self) {
        self.sources = 0;
        self.timing_count = 0;
    }

    /// Start over with a single hop, stamped now.
    pub fn reset_to(&mut self, source_id: u32, source_index: i64) {
        self.source_ids[0] = source_id;
        self.source_indices[0] = source_index;
        self.sources = 1;
        self.timings[0] = (self.clock)();
        self.timing_count = 1;
    }

    pub fn add_source(&mut self, source_id: u32, source_index: i64) -> Result<()> {
        if self.sources >= MAX_SOURCES {
            return Err(self.exceeded(Capacity::Sources, MAX_SOURCES));
        }
        self.source_ids[self.sources] = source_id;
        self.source_indices[self.sources] = source_index;
        self.sources += 1;
        Ok(())
    }

    pub fn add_timing(&mut self, stamp: i64) -> Result<()> {
        if self.timing_count >= MAX_TIMINGS {
            return Err(self.exceeded(Capacity::Timings, MAX_TIMINGS));
        }
        self.timings[self.timing_count] = stamp;
        self.timing_count += 1;
        Ok(())
    }

    /// Append a stamp taken from the record's clock.
    pub fn capture_timing(&mut self) -> Result<()> {
        self.add_timing((self.clock)())
    }

    fn exceeded(&self, what: Capacity, capacity: usize) -> LineageError {
        warn!(%what, capacity, lineage = ?self, "message lineage capacity exceeded");
        LineageError::CapacityExceeded { what, capacity }
    }

    /// Number of hops.
    pub fn sources(&self) -> usize {
        self.sources
    }

    /// Number of timing stamps.
    pub fn timings(&self) -> usize {
        self.timing_count
    }

    pub fn source_id(&self, n: usize) -> Option<u32> {
        self.source_ids().get(n).copied()
    }

    pub fn source_index(&self, n: usize) -> Option<i64> {
        self.source_indices().get(n).copied()
    }

    pub fn timing(&self, n: usize) -> Option<i64> {
        self.timing_values().get(n).copied()
    }

    pub fn last_source_id(&self) -> Option<u32> {
        self.source_ids().last().copied()
    }

    pub fn last_source_index(&self) -> Option<i64> {
        self.source_indices().last().copied()
    }

    pub fn source_ids(&self) -> &[u32] {
        &self.source_ids[..self.sources]
    }

    pub fn source_indices(&self) -> &[i64] {
        &self.source_indices[..self.sources]
    }

    pub fn timing_values(&self) -> &[i64] {
        &self.timings[..self.timing_count]
    }

    /// Hops as `(source id, source index)` pairs.
    pub fn hops(&self) -> impl Iterator<Item = (u32, i64)> + '_ {
        self.source_ids()
            .iter()
            .copied()
            .zip(self.source_indices().iter().copied())
    }

    /// Decode the text form: a `sources` sequence of id/index pairs and a
    /// `timings` sequence. On failure the record is left empty.
    pub fn read_marshallable<W: WireIn>(&mut self, wire: &mut W) -> Result<()> {
        self.reset();
        let decoded = self.decode_text(wire);
        if decoded.is_err() {
            self.reset();
        }
        decoded
    }

    fn decode_text<W: WireIn>(&mut self, wire: &mut W) -> Result<()> {
        wire.read("sources").sequence(|w| {
            while w.has_next_sequence_item() {
                let source_id = w.uint32()?;
                let source_index = w.int64()?;
                self.add_source(source_id, source_index)?;
            }
            Ok::<_, LineageError>(())
        })?;

        wire.read("timings").sequence(|w| {
            while w.has_next_sequence_item() {
                self.add_timing(w.int64()?)?;
            }
            Ok::<_, LineageError>(())
        })?;

        if self.auto_capture {
            if let Some(source) = wire.source_context() {
                self.add_source(source.source_id, source.index)?;
            }
            self.capture_timing()?;
        }
        Ok(())
    }

    /// Encode the text form. The timings gain one stamp taken at write time.
    pub fn write_marshallable<W: WireOut>(&self, wire: &mut W) {
        wire.write("sources").sequence(|w| {
            for (source_id, source_index) in self.hops() {
                w.uint32(source_id).int64_hex(source_index);
            }
        });
        wire.write("timings").sequence(|w| {
            for stamp in self.timing_values() {
                w.int64(*stamp);
            }
            w.int64((self.clock)());
        });
    }

    /// Decode the binary form, replacing the current contents. On failure
    /// the record is left empty.
    pub fn read_bytes<B: Buf>(&mut self, buf: &mut B) -> Result<()> {
        self.reset();
        let decoded = self.decode_bytes(buf);
        if decoded.is_err() {
            self.reset();
        }
        decoded
    }

    fn decode_bytes<B: Buf>(&mut self, buf: &mut B) -> Result<()> {
        let hops = read_stop_bit(buf)?;
        for _ in 0..hops {
            ensure(buf, HOP_LEN)?;
            let source_id = buf.get_u32_le();
            let source_index = buf.get_i64_le();
            self.add_source(source_id, source_index)?;
        }

        let stamps = read_stop_bit(buf)?;
        for _ in 0..stamps {
            ensure(buf, TIMING_LEN)?;
            self.add_timing(buf.get_i64_le())?;
        }
        Ok(())
    }

    /// Encode the binary form: stop-bit hop count, `(u32, i64)` per hop,
    /// stop-bit timing count, `i64` per stamp, all little-endian.
    pub fn write_bytes<B: BufMut>(&self, buf: &mut B) {
        write_stop_bit(buf, self.sources as u64);
        for (source_id, source_index) in self.hops() {
            buf.put_u32_le(source_id);
            buf.put_i64_le(source_index);
        }
        write_stop_bit(buf, self.timing_count as u64);
        for stamp in self.timing_values() {
            buf.put_i64_le(*stamp);
        }
    }

    /// Size of the binary form.
    pub fn encoded_len(&self) -> usize {
        stop_bit_len(self.sources as u64)
            + self.sources * HOP_LEN
            + stop_bit_len(self.timing_count as u64)
            + self.timing_count * TIMING_LEN
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.write_bytes(&mut buf);
        buf.freeze()
    }

    pub fn from_bytes<B: Buf>(buf: &mut B) -> Result<Self> {
        let mut lineage = Self::new();
        lineage.read_bytes(buf)?;
        Ok(lineage)
    }
}

fn ensure<B: Buf>(buf: &B, needed: usize) -> Result<()> {
    let remaining = buf.remaining();
    if remaining < needed {
        return Err(LineageError::Truncated { needed, remaining });
    }
    Ok(())
}

impl PartialEq for MessageLineage {
    fn eq(&self, other: &Self) -> bool {
        self.source_ids() == other.source_ids()
            && self.source_indices() == other.source_indices()
            && self.timing_values() == other.timing_values()
    }
}

impl Eq for MessageLineage {}

impl fmt::Debug for MessageLineage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageLineage")
            .field("sources", &self.hops().collect::<Vec<_>>())
            .field("timings", &self.timing_values())
            .field("auto_capture", &self.auto_capture)
            .finish()
    }
}
