//! Bounded MPMC exchanger (LMAX Disruptor pattern).
//!
//! - `Disruptor<T>` - front door handing out role handles
//! - `Writer<T>` / `Reader<T>` - clonable role handles over one shared pair
//! - `PublishPolicy` - cursor-advance discipline per role: `Block`
//!   (strict order) or `Buffered` (out-of-order completion buffering)

pub mod engine;
pub mod exchanger;
pub mod slot;

mod cursor;
mod ring;

pub use cursor::Reservation;
pub use engine::PublishStatus;
pub use exchanger::{Disruptor, Exchanger, ReadBatch, Reader, Writer};
pub use slot::Slot;

use crate::constants::{DEFAULT_PENDING_SLOTS, DEFAULT_RING_CAPACITY};
use crate::error::{Result, SurgeError};

/// Sequence number type for ring positions. Sequences grow monotonically
/// and never wrap at the type level; wrap-around is an addressing detail
/// inside the ring.
pub type Sequence = u64;

/// Cursor-advance discipline for one role's publish path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishPolicy {
    /// Publishers land in strict reservation order; a slow publisher
    /// blocks all later ones. Simplest and most predictable.
    Block,
    /// Out-of-order completions park in a bounded table and merge once
    /// the prefix below them lands; the visible cursor may jump.
    #[default]
    Buffered,
}

/// Configuration for an exchanger.
#[derive(Debug, Clone)]
pub struct ExchangerConfig {
    /// Ring capacity in slots (must be power of 2)
    pub capacity: usize,
    /// Publish discipline of the writer group
    pub write_policy: PublishPolicy,
    /// Publish discipline of the reader group
    pub read_policy: PublishPolicy,
    /// Pending-table size for Buffered engines; must be at least the
    /// number of concurrently publishing parties of the role
    pub pending_slots: usize,
}

impl Default for ExchangerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_RING_CAPACITY,
            write_policy: PublishPolicy::default(),
            read_policy: PublishPolicy::default(),
            pending_slots: DEFAULT_PENDING_SLOTS,
        }
    }
}

impl ExchangerConfig {
    /// Create a new configuration with the specified ring capacity
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 || !capacity.is_power_of_two() {
            return Err(SurgeError::config("Ring capacity must be a non-zero power of 2"));
        }
        Ok(Self {
            capacity,
            ..Default::default()
        })
    }

    /// Set the writer group's publish discipline
    pub fn with_write_policy(mut self, policy: PublishPolicy) -> Self {
        self.write_policy = policy;
        self
    }

    /// Set the reader group's publish discipline
    pub fn with_read_policy(mut self, policy: PublishPolicy) -> Self {
        self.read_policy = policy;
        self
    }

    /// Set the Buffered engines' pending-table size
    pub fn with_pending_slots(mut self, slots: usize) -> Result<Self> {
        if slots == 0 {
            return Err(SurgeError::config("Pending table needs at least one slot"));
        }
        self.pending_slots = slots;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = ExchangerConfig::new(1024).unwrap();
        assert_eq!(config.capacity, 1024);
        assert_eq!(config.write_policy, PublishPolicy::Buffered);
        assert_eq!(config.pending_slots, DEFAULT_PENDING_SLOTS);
    }

    #[test]
    fn test_config_invalid_capacity() {
        assert!(ExchangerConfig::new(0).is_err());
        assert!(ExchangerConfig::new(1000).is_err()); // Not power of 2
    }

    #[test]
    fn test_config_builder() {
        let config = ExchangerConfig::new(1024)
            .unwrap()
            .with_write_policy(PublishPolicy::Block)
            .with_pending_slots(32)
            .unwrap();

        assert_eq!(config.write_policy, PublishPolicy::Block);
        assert_eq!(config.read_policy, PublishPolicy::Buffered);
        assert_eq!(config.pending_slots, 32);
    }

    #[test]
    fn test_config_invalid_pending_slots() {
        assert!(ExchangerConfig::new(1024).unwrap().with_pending_slots(0).is_err());
    }
}
