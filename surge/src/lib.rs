//! Surge - a bounded MPMC ring-buffer exchanger (LMAX Disruptor pattern).
//!
//! Writers reserve contiguous slot ranges against a claim sequence, fill
//! them, and publish; readers reserve published ranges, walk them, and
//! release the capacity back. Each role's visible cursor gates the other
//! role, so the two claim sequences always stay within one ring length of
//! each other. All waiting is bounded busy-spin; no call enters a kernel
//! wait.
//!
//! # Example
//!
//! ```
//! use surge::{Disruptor, ExchangerConfig};
//!
//! let disruptor = Disruptor::<u64>::new(ExchangerConfig::default())?;
//! let writer = disruptor.create_writer();
//! let reader = disruptor.create_reader();
//!
//! assert!(!writer.write(7)); // true would mean the reservation failed
//! let batch = reader.read(16).expect("published value is visible");
//! assert_eq!(*batch.iter().next().unwrap().get(), 7);
//! batch.release();
//! # Ok::<(), surge::SurgeError>(())
//! ```

pub mod constants;
pub mod disruptor;
pub mod error;
pub mod insights;
pub mod metrics;
pub mod rendezvous;

pub use disruptor::{
    Disruptor, Exchanger, ExchangerConfig, PublishPolicy, PublishStatus, ReadBatch, Reader,
    Reservation, Sequence, Slot, Writer,
};
pub use error::{Result, SurgeError};
pub use rendezvous::{FlagGuard, Rendezvous};
