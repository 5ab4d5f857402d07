//! Insights - Observability for surge.
//!
//! Feature-gated tracing hooks. Zero-cost when disabled.
//!
//! # Usage
//!
//! ```toml
//! surge = { version = "0.1", features = ["tracing"] }
//! ```
//! ```rust,ignore
//! tracing_subscriber::fmt::init();
//! ```

/// Record a full-ring spin (writers waiting on readers)
#[cfg(feature = "tracing")]
#[inline]
pub fn record_backpressure() {
    let _span = tracing::warn_span!("backpressure").entered();
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_backpressure() {}

/// Record a publish of an already-visible range (caller bug)
#[cfg(feature = "tracing")]
#[inline]
pub fn record_stale_publish(begin: u64, end: u64) {
    let _span = tracing::warn_span!("stale_publish", begin, end).entered();
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_stale_publish(_begin: u64, _end: u64) {}

/// Record a pending-table overflow (publisher throttling itself)
#[cfg(feature = "tracing")]
#[inline]
pub fn record_pending_full() {
    let _span = tracing::debug_span!("pending_full").entered();
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_pending_full() {}

/// Record a phase-boundary reset of the exchanger
#[cfg(feature = "tracing")]
#[inline]
pub fn record_reset() {
    let _span = tracing::debug_span!("reset").entered();
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_reset() {}
