#![cfg(not(feature = "loom"))]

//! `locks[i]` guards `values[i]` and, implicitly, every value after it. Writers increment every
//! value from their target index onward, so the values must stay nondecreasing.

use std::sync::Arc;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering::Relaxed;
use std::thread;
use std::time::{Duration, Instant};

use intention_lock::{IntentionLock, Mode};
use rand::Rng;

const NUM_NODES: usize = 10;

struct Branch {
    locks: [IntentionLock; NUM_NODES],
    values: [AtomicU32; NUM_NODES],
}

impl Branch {
    fn new() -> Self {
        Self {
            locks: std::array::from_fn(|_| IntentionLock::new()),
            values: std::array::from_fn(|_| AtomicU32::new(0)),
        }
    }

    /// Holds `ancestor` on `locks[..offset]` and `target` on `locks[offset]`.
    fn with_path<R>(
        &self,
        offset: usize,
        ancestor: Mode,
        target: Mode,
        f: impl FnOnce() -> R,
    ) -> R {
        for lock in &self.locks[..offset] {
            lock.lock(ancestor);
        }
        self.locks[offset].lock(target);

        let result = f();

        self.locks[offset].unlock(target);
        for lock in self.locks[..offset].iter().rev() {
            lock.unlock(ancestor);
        }
        result
    }

    fn write(&self, offset: usize) {
        self.with_path(offset, Mode::IntentionExclusive, Mode::Exclusive, || {
            for value in &self.values[offset..] {
                // A lost update would break the ordering.
                value.store(value.load(Relaxed) + 1, Relaxed);
            }
        });
    }

    fn read(&self, offset: usize) -> Vec<u32> {
        self.with_path(offset, Mode::IntentionShared, Mode::Shared, || {
            self.values[offset..]
                .iter()
                .map(|v| v.load(Relaxed))
                .collect()
        })
    }

    fn intend(&self, offset: usize, mode: Mode) {
        self.with_path(offset, mode, mode, || ());
    }

    fn snapshot(&self) -> Vec<u32> {
        let _root = self.locks[0].guard(Mode::Exclusive);
        self.values.iter().map(|v| v.load(Relaxed)).collect()
    }
}

fn assert_nondecreasing(values: &[u32]) {
    for pair in values.windows(2) {
        assert!(pair[0] <= pair[1], "decreasing values: {values:?}");
    }
}

fn run_workload(concurrency: usize, write_ratio: f64, duration: Duration) {
    let branch = Arc::new(Branch::new());
    let deadline = Instant::now() + duration;

    let threads: Vec<_> = (0..concurrency)
        .map(|_| {
            let branch = branch.clone();
            thread::spawn(move || {
                let mut rng = rand::rng();
                let mut writes = 0_u32;
                while Instant::now() < deadline {
                    let offset = rng.random_range(0..NUM_NODES);
                    if rng.random_bool(write_ratio) {
                        branch.write(offset);
                        writes += 1;
                    } else {
                        match rng.random_range(0..3) {
                            0 => branch.intend(offset, Mode::IntentionExclusive),
                            1 => branch.intend(offset, Mode::IntentionShared),
                            _ => assert_nondecreasing(&branch.read(offset)),
                        }
                    }
                    thread::sleep(Duration::from_micros(rng.random_range(0..50)));
                }
                writes
            })
        })
        .collect();

    let writes: u32 = threads.into_iter().map(|t| t.join().unwrap()).sum();

    let values = branch.snapshot();
    assert_nondecreasing(&values);
    // Every write covers the last value.
    assert_eq!(values[NUM_NODES - 1], writes);
}

#[test]
fn serial() {
    run_workload(1, 0.1, Duration::from_millis(500));
}

#[test]
fn serial_heavy_writes() {
    run_workload(1, 0.5, Duration::from_millis(500));
}

#[test]
fn low_concurrency() {
    run_workload(2, 0.1, Duration::from_millis(500));
}

#[test]
fn medium_concurrency() {
    run_workload(10, 0.1, Duration::from_secs(1));
}

#[test]
fn high_concurrency() {
    run_workload(20, 0.1, Duration::from_secs(3));
}

#[test]
fn high_concurrency_heavy_writes() {
    run_workload(20, 0.5, Duration::from_secs(3));
}
