//! Cursor-advance engines.
//!
//! An engine turns an unordered stream of `(begin, end)` completion
//! reports into a monotonically advancing visible cursor:
//!
//! - `Block` - CAS discipline; publishers land in strict reservation
//!   order, a slow publisher blocks all later ones
//! - `Buffered` - reports arriving ahead of the cursor park in a bounded
//!   pending table; the report that closes the gap merges the whole
//!   contiguous chain in one advance
//!
//! The cursor is written with release ordering and read with acquire
//! ordering, so payload stores made before a publish are observable to
//! the opposing role once it sees the new cursor.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

use crate::disruptor::{PublishPolicy, Sequence};
use crate::insights;
use crate::metrics::METRICS;
use crate::rendezvous::FlagGuard;

/// Outcome of a publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    /// Cursor advanced, or the report was parked for a later merge.
    Success,
    /// `end <= cursor`: the range was already visible. Publishing a
    /// completed range is a caller bug; never retried.
    Stale,
    /// Pending table exhausted; retry once slower peers catch up.
    NoSpace,
}

/// Engine selected at construction from the role's publish policy.
pub(crate) enum CursorEngine {
    Block(BlockEngine),
    Buffered(BufferedEngine),
}

impl CursorEngine {
    pub(crate) fn new(policy: PublishPolicy, pending_slots: usize) -> Self {
        match policy {
            PublishPolicy::Block => Self::Block(BlockEngine::new()),
            PublishPolicy::Buffered => Self::Buffered(BufferedEngine::new(pending_slots)),
        }
    }

    /// Current visible cursor.
    #[inline]
    pub(crate) fn cursor(&self) -> Sequence {
        match self {
            Self::Block(engine) => engine.cursor(),
            Self::Buffered(engine) => engine.cursor(),
        }
    }

    /// Report the completion of the reservation `[begin, end)`.
    pub(crate) fn publish(&self, begin: Sequence, end: Sequence) -> PublishStatus {
        match self {
            Self::Block(engine) => engine.publish(begin, end),
            Self::Buffered(engine) => engine.publish(begin, end),
        }
    }

    /// Return to the initial state. Phase boundary only.
    pub(crate) fn reset(&self) {
        match self {
            Self::Block(engine) => engine.reset(),
            Self::Buffered(engine) => engine.reset(),
        }
    }
}

// ============================================================================
// Block
// ============================================================================

/// Strict-order engine: a publisher spins until the cursor reaches its
/// `begin`, then swaps it to `end`.
pub(crate) struct BlockEngine {
    cursor: CachePadded<AtomicU64>,
}

impl BlockEngine {
    fn new() -> Self {
        Self {
            cursor: CachePadded::new(AtomicU64::new(0)),
        }
    }

    #[inline]
    fn cursor(&self) -> Sequence {
        self.cursor.load(Ordering::Acquire)
    }

    fn publish(&self, begin: Sequence, end: Sequence) -> PublishStatus {
        loop {
            let current = self.cursor.load(Ordering::Acquire);
            if end <= current {
                insights::record_stale_publish(begin, end);
                METRICS.record_stale_publish();
                return PublishStatus::Stale;
            }
            match self
                .cursor
                .compare_exchange_weak(begin, end, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return PublishStatus::Success,
                Err(_) => std::hint::spin_loop(),
            }
        }
    }

    fn reset(&self) {
        self.cursor.store(0, Ordering::Release);
    }
}

// ============================================================================
// Buffered
// ============================================================================

/// A parked completion report awaiting its predecessors.
#[derive(Debug, Clone, Copy, Default)]
struct PendingSpan {
    begin: Sequence,
    end: Sequence,
    live: bool,
}

/// Buffering engine: out-of-order reports park in a bounded table until
/// the prefix below them completes, so a slow publisher never blocks its
/// peers until the table fills.
pub(crate) struct BufferedEngine {
    cursor: CachePadded<AtomicU64>,
    sync_flag: AtomicBool,
    // Touched only with the flag held.
    pending: UnsafeCell<Box<[PendingSpan]>>,
}

// The pending table is serialized by `sync_flag`.
unsafe impl Sync for BufferedEngine {}

impl BufferedEngine {
    fn new(pending_slots: usize) -> Self {
        Self {
            cursor: CachePadded::new(AtomicU64::new(0)),
            sync_flag: AtomicBool::new(false),
            pending: UnsafeCell::new(
                vec![PendingSpan::default(); pending_slots].into_boxed_slice(),
            ),
        }
    }

    #[inline]
    fn cursor(&self) -> Sequence {
        self.cursor.load(Ordering::Acquire)
    }

    fn publish(&self, begin: Sequence, end: Sequence) -> PublishStatus {
        let _guard = FlagGuard::acquire(&self.sync_flag);
        // Safety: the flag serializes every access to the table.
        let table = unsafe { &mut *self.pending.get() };

        let current = self.cursor.load(Ordering::Acquire);
        if end <= current {
            insights::record_stale_publish(begin, end);
            METRICS.record_stale_publish();
            return PublishStatus::Stale;
        }

        if begin == current {
            // Mergeable: chase the contiguous chain through the table.
            // The scan restarts after every merge so entries freed by
            // one hop are seen by the next.
            let mut target = end;
            loop {
                let Some(entry) = table.iter_mut().find(|e| e.live && e.begin == target) else {
                    break;
                };
                target = entry.end;
                *entry = PendingSpan::default();
            }
            self.cursor.store(target, Ordering::Release);
            return PublishStatus::Success;
        }

        // Out of order: park until the gap below closes.
        match table.iter_mut().find(|e| !e.live) {
            Some(free) => {
                *free = PendingSpan { begin, end, live: true };
                PublishStatus::Success
            }
            None => {
                insights::record_pending_full();
                METRICS.record_pending_full();
                PublishStatus::NoSpace
            }
        }
    }

    fn reset(&self) {
        let _guard = FlagGuard::acquire(&self.sync_flag);
        let table = unsafe { &mut *self.pending.get() };
        table.fill(PendingSpan::default());
        self.cursor.store(0, Ordering::Release);
    }
}
