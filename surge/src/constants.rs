//! Surge tuning constants.
//!
//! Defaults used by the exchanger configuration.

/// Default ring capacity in slots (must be power of 2)
pub const DEFAULT_RING_CAPACITY: usize = 512;

/// Default size of the Buffered engine's pending-reservations table.
/// Must be at least the number of concurrently publishing parties.
pub const DEFAULT_PENDING_SLOTS: usize = 20;
