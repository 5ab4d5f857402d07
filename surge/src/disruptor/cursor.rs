//! Claim-sequence owners for the two roles.
//!
//! Each cursor owns a claim sequence (the next free sequence it will hand
//! out) and a cursor-advance engine (its visible cursor, gating the
//! opposing role). Reservation is a concrete operation on each type; the
//! two differ only in their gating direction and their behavior when no
//! capacity is available.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

use crate::disruptor::engine::CursorEngine;
use crate::disruptor::Sequence;
use crate::insights;
use crate::metrics::METRICS;

/// An exclusively owned half-open sequence range `[begin, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub begin: Sequence,
    pub end: Sequence,
}

impl Reservation {
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.begin
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.begin
    }
}

/// Claim-sequence owner for producers, gated by the readers' visible
/// cursor.
pub(crate) struct WriteCursor {
    claim: CachePadded<AtomicU64>,
    engine: CursorEngine,
}

impl WriteCursor {
    pub(crate) fn new(engine: CursorEngine) -> Self {
        Self {
            claim: CachePadded::new(AtomicU64::new(0)),
            engine,
        }
    }

    /// Visible cursor: everything below it is published.
    #[inline]
    pub(crate) fn visible(&self) -> Sequence {
        self.engine.cursor()
    }

    #[inline]
    pub(crate) fn engine(&self) -> &CursorEngine {
        &self.engine
    }

    /// Reserve up to `want` slots against a ring of `capacity` slots.
    ///
    /// Spins while the ring is full (backpressure from slow readers).
    /// Returns `None` only when readers lead writers, which means an
    /// invariant is broken; callers should abort.
    pub(crate) fn reserve(
        &self,
        gate: &CursorEngine,
        capacity: u64,
        want: u64,
    ) -> Option<Reservation> {
        loop {
            let expected = self.claim.load(Ordering::Acquire);
            let read_visible = gate.cursor();
            if expected < read_visible {
                return None;
            }
            let free = capacity - (expected - read_visible);
            if free == 0 {
                METRICS.record_backpressure();
                insights::record_backpressure();
                std::hint::spin_loop();
                continue;
            }
            let new = expected + want.min(free);
            match self
                .claim
                .compare_exchange_weak(expected, new, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    return Some(Reservation {
                        begin: expected,
                        end: new,
                    })
                }
                Err(_) => std::hint::spin_loop(),
            }
        }
    }

    pub(crate) fn reset(&self) {
        self.engine.reset();
        self.claim.store(0, Ordering::Release);
    }
}

/// Claim-sequence owner for consumers, gated by the writers' visible
/// cursor.
pub(crate) struct ReadCursor {
    claim: CachePadded<AtomicU64>,
    engine: CursorEngine,
}

impl ReadCursor {
    pub(crate) fn new(engine: CursorEngine) -> Self {
        Self {
            claim: CachePadded::new(AtomicU64::new(0)),
            engine,
        }
    }

    /// Visible cursor: everything below it has been released.
    #[inline]
    pub(crate) fn visible(&self) -> Sequence {
        self.engine.cursor()
    }

    #[inline]
    pub(crate) fn engine(&self) -> &CursorEngine {
        &self.engine
    }

    /// Reserve up to `want` published slots.
    ///
    /// Non-blocking: returns `None` when nothing is available, so callers
    /// pick their own backoff.
    pub(crate) fn reserve(&self, gate: &CursorEngine, want: u64) -> Option<Reservation> {
        if want == 0 {
            return None;
        }
        loop {
            let expected = self.claim.load(Ordering::Acquire);
            let write_visible = gate.cursor();
            debug_assert!(write_visible >= expected, "writers never trail readers");
            let available = write_visible.saturating_sub(expected);
            if available == 0 {
                return None;
            }
            let new = expected + want.min(available);
            match self
                .claim
                .compare_exchange_weak(expected, new, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    return Some(Reservation {
                        begin: expected,
                        end: new,
                    })
                }
                Err(_) => std::hint::spin_loop(),
            }
        }
    }

    pub(crate) fn reset(&self) {
        self.engine.reset();
        self.claim.store(0, Ordering::Release);
    }
}
