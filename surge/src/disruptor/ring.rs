//! Ring storage addressed by monotonic sequences.

use std::cell::UnsafeCell;

use crate::disruptor::slot::Slot;
use crate::disruptor::Sequence;
use crate::error::{Result, SurgeError};

/// Fixed-capacity ring of cache-line-isolated slots.
///
/// Sequences never wrap at the type level; `index(seq) = seq & mask` is
/// purely an addressing detail. The ring performs no synchronization of
/// its own: a slot may be touched only while the caller holds a
/// reservation covering its sequence.
pub(crate) struct Ring<T> {
    slots: Box<[UnsafeCell<Slot<T>>]>,
    mask: u64,
}

// Slots are reached only through disjoint reservations.
unsafe impl<T: Send> Send for Ring<T> {}
unsafe impl<T: Send> Sync for Ring<T> {}

impl<T: Default> Ring<T> {
    pub(crate) fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 || !capacity.is_power_of_two() {
            return Err(SurgeError::config("Ring capacity must be a non-zero power of 2"));
        }
        let slots = (0..capacity)
            .map(|_| UnsafeCell::new(Slot::default()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Ok(Self {
            slots,
            mask: (capacity - 1) as u64,
        })
    }
}

impl<T> Ring<T> {
    #[inline]
    pub(crate) fn capacity(&self) -> u64 {
        self.slots.len() as u64
    }

    #[inline]
    fn index(&self, seq: Sequence) -> usize {
        (seq & self.mask) as usize
    }

    /// # Safety
    ///
    /// The caller must hold an unpublished write reservation covering
    /// `seq`.
    #[inline]
    pub(crate) unsafe fn write_slot(&self, seq: Sequence, value: T, eof: bool) {
        (*self.slots[self.index(seq)].get()).fill(value, eof);
    }

    /// # Safety
    ///
    /// The caller must hold an unreleased read reservation covering
    /// `seq`.
    #[inline]
    pub(crate) unsafe fn slot(&self, seq: Sequence) -> &Slot<T> {
        &*self.slots[self.index(seq)].get()
    }

    /// Walk the slots of a reserved half-open range in sequence order.
    ///
    /// # Safety
    ///
    /// The caller must hold an unreleased read reservation covering
    /// `[begin, end)`.
    pub(crate) unsafe fn range(
        &self,
        begin: Sequence,
        end: Sequence,
    ) -> impl Iterator<Item = &Slot<T>> {
        (begin..end).map(move |seq| unsafe { self.slot(seq) })
    }
}
