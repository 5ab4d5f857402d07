//! Cross-thread scenarios for the surge exchanger.
//!
//! These tests verify the cursor-coordination protocol end to end:
//! exactly-once delivery under concurrent writers, ring-capacity
//! backpressure, and barrier-gated phase resets.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use surge::{Disruptor, ExchangerConfig, PublishPolicy, Rendezvous};
use surge_test_support::{wait_until, ValueLedger};

/// Five writers, no reader. Every iteration is gated by a rendezvous
/// whose last arriver resets the exchanger, so each generation starts
/// from zero and the final visible cursor equals the writer count.
#[test]
fn test_writers_with_phase_resets() {
    const WRITERS: usize = 5;
    const WRITES_PER_WRITER: usize = 100;

    let disruptor = Disruptor::<u64>::new(ExchangerConfig::default()).unwrap();
    let barrier = Arc::new(Rendezvous::new(WRITERS));

    let mut handles = Vec::with_capacity(WRITERS);
    for w in 0..WRITERS {
        let writer = disruptor.create_writer();
        let barrier = barrier.clone();
        let reset_handle = disruptor.clone();
        handles.push(thread::spawn(move || {
            let mut value = (w * WRITES_PER_WRITER) as u64;
            for _ in 0..WRITES_PER_WRITER {
                // All writers are parked here while the leader resets,
                // so the reset never races a write.
                barrier.wait_with(|| reset_handle.reset());
                assert!(!writer.write(value));
                value += 1;
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(
        wait_until(Duration::from_secs(1), || {
            disruptor.write_cursor() == WRITERS as u64
        }),
        "write cursor stuck at {} instead of {}",
        disruptor.write_cursor(),
        WRITERS
    );
}

/// Three writers race 500k unique values each through a 512-slot ring
/// while one reader drains in batches of up to 128. Every value must
/// arrive exactly once.
#[test]
fn test_three_writers_single_reader_exactly_once() {
    const WRITERS: usize = 3;
    const WRITES_PER_WRITER: u64 = 500_000;
    const TOTAL: u64 = WRITERS as u64 * WRITES_PER_WRITER;

    let disruptor = Disruptor::<u64>::new(
        ExchangerConfig::default()
            .with_write_policy(PublishPolicy::Block)
            .with_read_policy(PublishPolicy::Buffered),
    )
    .unwrap();

    let mut handles = Vec::with_capacity(WRITERS);
    for w in 0..WRITERS {
        let writer = disruptor.create_writer();
        handles.push(thread::spawn(move || {
            let base = w as u64 * WRITES_PER_WRITER;
            for i in 0..WRITES_PER_WRITER {
                while writer.write(base + i) {
                    std::hint::spin_loop();
                }
            }
        }));
    }

    let reader = disruptor.create_reader();
    let mut ledger = ValueLedger::new(TOTAL as usize);
    let mut seen = 0u64;
    while seen < TOTAL {
        let Some(batch) = reader.read(128) else {
            std::hint::spin_loop();
            continue;
        };
        for slot in batch.iter() {
            let value = *slot.get();
            assert!(ledger.record(value), "duplicate or out-of-range value {value}");
        }
        seen += batch.len() as u64;
        batch.release();
    }

    for handle in handles {
        handle.join().unwrap();
    }

    println!("delivered {} values, {} duplicates", ledger.delivered(), ledger.duplicates());
    assert_eq!(seen, TOTAL);
    assert!(ledger.is_complete(), "some value was lost or fabricated");
}

/// Two writers and two readers share one ring; the merged sinks must
/// hold every value exactly once.
#[test]
fn test_two_writers_two_readers_exactly_once() {
    const WRITERS: usize = 2;
    const READERS: usize = 2;
    const WRITES_PER_WRITER: u64 = 100_000;
    const TOTAL: u64 = WRITERS as u64 * WRITES_PER_WRITER;

    let disruptor = Disruptor::<u64>::new(ExchangerConfig::default()).unwrap();

    let mut writer_handles = Vec::with_capacity(WRITERS);
    for w in 0..WRITERS {
        let writer = disruptor.create_writer();
        writer_handles.push(thread::spawn(move || {
            let base = w as u64 * WRITES_PER_WRITER;
            for i in 0..WRITES_PER_WRITER {
                while writer.write(base + i) {
                    std::hint::spin_loop();
                }
            }
        }));
    }

    let consumed = Arc::new(AtomicU64::new(0));
    let mut reader_handles = Vec::with_capacity(READERS);
    for _ in 0..READERS {
        let reader = disruptor.create_reader();
        let consumed = consumed.clone();
        reader_handles.push(thread::spawn(move || {
            let mut sink = Vec::new();
            while consumed.load(Ordering::Relaxed) < TOTAL {
                let Some(batch) = reader.read(64) else {
                    std::hint::spin_loop();
                    continue;
                };
                sink.extend(batch.iter().map(|slot| *slot.get()));
                consumed.fetch_add(batch.len() as u64, Ordering::Relaxed);
                batch.release();
            }
            sink
        }));
    }

    for handle in writer_handles {
        handle.join().unwrap();
    }

    let mut ledger = ValueLedger::new(TOTAL as usize);
    let mut merged = 0u64;
    for handle in reader_handles {
        for value in handle.join().unwrap() {
            assert!(ledger.record(value), "duplicate or out-of-range value {value}");
            merged += 1;
        }
    }
    assert_eq!(merged, TOTAL);
    assert!(ledger.is_complete());
}

/// With no reader releasing capacity, a writer's claim cannot pass the
/// ring capacity: the write after the ring fills stalls until a slot is
/// released.
#[test]
fn test_ring_capacity_backpressure() {
    const CAPACITY: usize = 512;

    let disruptor = Disruptor::<u64>::new(ExchangerConfig::new(CAPACITY).unwrap()).unwrap();
    let writer = disruptor.create_writer();
    let progress = Arc::new(AtomicU64::new(0));

    let writer_progress = progress.clone();
    let handle = thread::spawn(move || {
        for i in 0..=CAPACITY as u64 {
            while writer.write(i) {
                std::hint::spin_loop();
            }
            writer_progress.store(i + 1, Ordering::Release);
        }
    });

    // The first 512 writes fill the ring.
    assert!(wait_until(Duration::from_secs(5), || {
        progress.load(Ordering::Acquire) == CAPACITY as u64
    }));
    // The 513th reservation spins: no progress while the ring is full.
    assert!(
        !wait_until(Duration::from_millis(300), || {
            progress.load(Ordering::Acquire) > CAPACITY as u64
        }),
        "writer advanced past a full ring"
    );
    assert_eq!(disruptor.write_cursor(), CAPACITY as u64);

    // Releasing one slot unblocks the stalled write.
    let reader = disruptor.create_reader();
    reader.read(1).unwrap().release();
    assert!(wait_until(Duration::from_secs(5), || {
        progress.load(Ordering::Acquire) == CAPACITY as u64 + 1
    }));
    handle.join().unwrap();
}

/// An EOF slot is delivered as an ordinary element with its flag set; the
/// core enforces no early termination.
#[test]
fn test_eof_marker_passes_through() {
    let disruptor = Disruptor::<u64>::new(ExchangerConfig::default()).unwrap();
    let writer = disruptor.create_writer();
    let reader = disruptor.create_reader();

    assert!(!writer.write(10));
    assert!(!writer.write(20));
    assert!(!writer.write_eof(30));

    let batch = reader.read(16).unwrap();
    let seen: Vec<(u64, bool)> = batch.iter().map(|s| (*s.get(), s.is_eof())).collect();
    assert_eq!(seen, vec![(10, false), (20, false), (30, true)]);
    batch.release();
}
