//! N-party rendezvous barrier and the scoped spin flag.
//!
//! `Rendezvous` lets a fixed party of threads meet repeatedly: the last
//! arriver of each generation runs a callback (e.g. a phase reset) before
//! the others are released. `FlagGuard` is the scoped acquisition of a
//! spinning boolean flag used inside the Buffered engine's critical
//! region.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

/// Reusable N-party barrier with a last-arriver callback.
///
/// Exactly `parties` threads must arrive per generation. Waiting is a
/// bounded busy-spin; no kernel wait is entered.
pub struct Rendezvous {
    parties: i64,
    go_signal: AtomicI64,
    current: AtomicI64,
}

impl Rendezvous {
    pub fn new(parties: usize) -> Self {
        Self {
            parties: parties as i64,
            go_signal: AtomicI64::new(0),
            current: AtomicI64::new(parties as i64),
        }
    }

    /// Arrive and wait for the rest of the party.
    ///
    /// Returns true for the last arriver, which runs `callback` before
    /// the other parties are released.
    pub fn wait_with<F: FnOnce()>(&self, callback: F) -> bool {
        let current_seq = self.current.fetch_sub(1, Ordering::AcqRel) - 1;
        if current_seq == self.go_signal.load(Ordering::Acquire) {
            callback();
            // Rearm for the next generation, then open the gate.
            self.current.store(
                2 * self.parties + self.go_signal.load(Ordering::Acquire),
                Ordering::Release,
            );
            self.go_signal.fetch_add(self.parties, Ordering::AcqRel);
            true
        } else {
            // The second condition handles the generational jump: once
            // go_signal advances by a full party count the waiter exits.
            while self.go_signal.load(Ordering::Acquire) < current_seq
                && (current_seq - self.go_signal.load(Ordering::Acquire)) < self.parties
            {
                std::hint::spin_loop();
            }
            false
        }
    }

    /// Arrive and wait without a last-arriver callback.
    pub fn wait(&self) -> bool {
        self.wait_with(|| {})
    }
}

/// Scoped acquisition of a spinning boolean flag.
///
/// Construction spins on compare-exchange-weak until the flag flips
/// `false -> true`; dropping the guard stores `false` with release.
/// Never held across external calls.
pub struct FlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlagGuard<'a> {
    pub fn acquire(flag: &'a AtomicBool) -> Self {
        while flag
            .compare_exchange_weak(false, true, Ordering::AcqRel, Ordering::Relaxed)
            .is_err()
        {
            std::hint::spin_loop();
        }
        Self { flag }
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
