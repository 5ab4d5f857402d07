//! The reader-writer pair and its role handles.
//!
//! `Exchanger<T>` composes one ring, one write cursor and one read
//! cursor. Writers reserve, fill and publish slot ranges; readers
//! reserve, walk and release them. `Disruptor<T>` is the front door that
//! owns the shared pair and hands out clonable `Writer`/`Reader` handles.

use std::sync::Arc;

use crate::disruptor::cursor::{ReadCursor, Reservation, WriteCursor};
use crate::disruptor::engine::{CursorEngine, PublishStatus};
use crate::disruptor::ring::Ring;
use crate::disruptor::slot::Slot;
use crate::disruptor::{ExchangerConfig, Sequence};
use crate::error::Result;
use crate::insights;
use crate::metrics::METRICS;

/// Report `[begin, end)` to an engine, retrying only while the Buffered
/// pending table is full. A stale status is a caller bug already logged
/// by the engine and is never retried.
fn publish_span(engine: &CursorEngine, span: Reservation) {
    loop {
        match engine.publish(span.begin, span.end) {
            PublishStatus::Success | PublishStatus::Stale => return,
            PublishStatus::NoSpace => std::hint::spin_loop(),
        }
    }
}

/// One ring shared by a writer group and a reader group.
///
/// The write-visible cursor gates readers and the read-visible cursor
/// gates writers, so the two claim sequences stay within one ring length
/// of each other and no slot is ever touched by both roles at once.
pub struct Exchanger<T> {
    ring: Ring<T>,
    write_cursor: WriteCursor,
    read_cursor: ReadCursor,
}

impl<T: Default> Exchanger<T> {
    pub fn new(config: ExchangerConfig) -> Result<Self> {
        Ok(Self {
            ring: Ring::new(config.capacity)?,
            write_cursor: WriteCursor::new(CursorEngine::new(
                config.write_policy,
                config.pending_slots,
            )),
            read_cursor: ReadCursor::new(CursorEngine::new(
                config.read_policy,
                config.pending_slots,
            )),
        })
    }
}

impl<T> Exchanger<T> {
    /// Write one value, spinning while the ring is full.
    ///
    /// Returns true iff the reservation failed (true = error, the
    /// convention callers retry on). The only failure is an overrun,
    /// i.e. readers leading writers.
    pub fn write(&self, value: T, is_eof: bool) -> bool {
        let gate = self.read_cursor.engine();
        let Some(span) = self.write_cursor.reserve(gate, self.ring.capacity(), 1) else {
            return true;
        };
        // Safety: [begin, end) is exclusively ours until published.
        unsafe {
            self.ring.write_slot(span.begin, value, is_eof);
        }
        METRICS.record_write(span.len());
        publish_span(self.write_cursor.engine(), span);
        false
    }

    /// Reserve up to `max` published slots for reading.
    ///
    /// Non-blocking: returns `None` when nothing is available. The batch
    /// releases its range back to writers when dropped.
    pub fn read(&self, max: usize) -> Option<ReadBatch<'_, T>> {
        let gate = self.write_cursor.engine();
        let span = self.read_cursor.reserve(gate, max as u64)?;
        METRICS.record_read(span.len());
        Some(ReadBatch {
            exchanger: self,
            span,
        })
    }

    /// Write-visible cursor: everything below it is published.
    pub fn write_cursor(&self) -> Sequence {
        self.write_cursor.visible()
    }

    /// Read-visible cursor: everything below it has been released.
    pub fn read_cursor(&self) -> Sequence {
        self.read_cursor.visible()
    }

    /// Zero both claims and both engines.
    ///
    /// Phase boundary only: callers must guarantee no reservation is in
    /// flight on either side, e.g. by gating every party through a
    /// [`Rendezvous`](crate::rendezvous::Rendezvous).
    pub fn reset(&self) {
        self.write_cursor.reset();
        self.read_cursor.reset();
        METRICS.record_reset();
        insights::record_reset();
    }
}

/// A reserved, readable range of slots.
///
/// Iterates the range in sequence order; dropping the batch releases the
/// capacity back to writers. `release` names the bulk call site
/// explicitly.
pub struct ReadBatch<'a, T> {
    exchanger: &'a Exchanger<T>,
    span: Reservation,
}

impl<'a, T> ReadBatch<'a, T> {
    pub fn begin(&self) -> Sequence {
        self.span.begin
    }

    pub fn end(&self) -> Sequence {
        self.span.end
    }

    pub fn len(&self) -> usize {
        self.span.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Walk the reserved slots in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot<T>> {
        // Safety: the span is exclusively held by this batch.
        unsafe { self.exchanger.ring.range(self.span.begin, self.span.end) }
    }

    /// Release the range back to writers.
    pub fn release(self) {
        drop(self);
    }
}

impl<T> Drop for ReadBatch<'_, T> {
    fn drop(&mut self) {
        publish_span(self.exchanger.read_cursor.engine(), self.span);
    }
}

/// Front door: owns the shared pair and hands out role handles.
pub struct Disruptor<T> {
    pair: Arc<Exchanger<T>>,
}

impl<T: Default> Disruptor<T> {
    pub fn new(config: ExchangerConfig) -> Result<Self> {
        Ok(Self {
            pair: Arc::new(Exchanger::new(config)?),
        })
    }
}

impl<T> Disruptor<T> {
    pub fn create_writer(&self) -> Writer<T> {
        Writer {
            pair: self.pair.clone(),
        }
    }

    pub fn create_reader(&self) -> Reader<T> {
        Reader {
            pair: self.pair.clone(),
        }
    }

    /// Write-visible cursor of the shared pair.
    pub fn write_cursor(&self) -> Sequence {
        self.pair.write_cursor()
    }

    /// Phase boundary only; not safe concurrently with live traffic.
    pub fn reset(&self) {
        self.pair.reset();
    }
}

impl<T> Clone for Disruptor<T> {
    fn clone(&self) -> Self {
        Self {
            pair: self.pair.clone(),
        }
    }
}

/// Clonable producer handle.
pub struct Writer<T> {
    pair: Arc<Exchanger<T>>,
}

impl<T> Writer<T> {
    /// Write one value. Returns true iff the reservation failed
    /// (true = error); spins while the ring is full.
    pub fn write(&self, value: T) -> bool {
        self.pair.write(value, false)
    }

    /// Write one value carrying the end-of-stream marker.
    pub fn write_eof(&self, value: T) -> bool {
        self.pair.write(value, true)
    }

    /// Write-visible cursor of the shared pair.
    pub fn cursor(&self) -> Sequence {
        self.pair.write_cursor()
    }
}

impl<T> Clone for Writer<T> {
    fn clone(&self) -> Self {
        Self {
            pair: self.pair.clone(),
        }
    }
}

/// Clonable consumer handle.
pub struct Reader<T> {
    pair: Arc<Exchanger<T>>,
}

impl<T> Reader<T> {
    /// Reserve up to `max` published slots. `None` means nothing is
    /// available right now.
    pub fn read(&self, max: usize) -> Option<ReadBatch<'_, T>> {
        self.pair.read(max)
    }
}

impl<T> Clone for Reader<T> {
    fn clone(&self) -> Self {
        Self {
            pair: self.pair.clone(),
        }
    }
}
