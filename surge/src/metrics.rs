//! Metrics for surge exchangers.
//!
//! Lightweight counters for observability

use std::sync::atomic::{ AtomicU64, Ordering };

/// Global metrics counters
pub struct Metrics {
    pub slots_written: AtomicU64,
    pub slots_read: AtomicU64,
    pub backpressure_events: AtomicU64,
    pub stale_publishes: AtomicU64,
    pub pending_full_events: AtomicU64,
    pub resets: AtomicU64,
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            slots_written: AtomicU64::new(0),
            slots_read: AtomicU64::new(0),
            backpressure_events: AtomicU64::new(0),
            stale_publishes: AtomicU64::new(0),
            pending_full_events: AtomicU64::new(0),
            resets: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_write(&self, slots: u64) {
        self.slots_written.fetch_add(slots, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_read(&self, slots: u64) {
        self.slots_read.fetch_add(slots, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_backpressure(&self) {
        self.backpressure_events.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_stale_publish(&self) {
        self.stale_publishes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_pending_full(&self) {
        self.pending_full_events.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            slots_written: self.slots_written.load(Ordering::Relaxed),
            slots_read: self.slots_read.load(Ordering::Relaxed),
            backpressure_events: self.backpressure_events.load(Ordering::Relaxed),
            stale_publishes: self.stale_publishes.load(Ordering::Relaxed),
            pending_full_events: self.pending_full_events.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.slots_written.store(0, Ordering::Relaxed);
        self.slots_read.store(0, Ordering::Relaxed);
        self.backpressure_events.store(0, Ordering::Relaxed);
        self.stale_publishes.store(0, Ordering::Relaxed);
        self.pending_full_events.store(0, Ordering::Relaxed);
        self.resets.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub slots_written: u64,
    pub slots_read: u64,
    pub backpressure_events: u64,
    pub stale_publishes: u64,
    pub pending_full_events: u64,
    pub resets: u64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "written={} read={} backpressure={} stale={} pending_full={} resets={}",
            self.slots_written,
            self.slots_read,
            self.backpressure_events,
            self.stale_publishes,
            self.pending_full_events,
            self.resets
        )
    }
}

/// Global metrics instance
pub static METRICS: Metrics = Metrics::new();
