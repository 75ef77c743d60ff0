use criterion::{Criterion, criterion_group, criterion_main};
use intention_lock::{IntentionLock, Mode};

fn lock_unlock(c: &mut Criterion) {
    for mode in Mode::ALL {
        c.bench_function(&format!("lock-unlock-{mode}"), |b| {
            let lock = IntentionLock::new();
            b.iter(|| {
                lock.lock(mode);
                lock.unlock(mode);
            });
        });
    }
}

fn shared_intention_unlock_unlock(c: &mut Criterion) {
    c.bench_function("lock-s-is-unlock-unlock", |b| {
        let lock = IntentionLock::new();
        b.iter(|| {
            lock.lock_s();
            lock.lock_is();
            lock.unlock_is();
            lock.unlock_s();
        });
    });
}

fn path(c: &mut Criterion) {
    let locks: Vec<IntentionLock> = (0..10).map(|_| IntentionLock::new()).collect();
    let (target, ancestors) = locks.split_last().unwrap();

    c.bench_function("path-write-depth-10", |b| {
        b.iter(|| {
            for lock in ancestors {
                lock.lock_ix();
            }
            target.lock_x();
            target.unlock_x();
            for lock in ancestors.iter().rev() {
                lock.unlock_ix();
            }
        });
    });

    c.bench_function("path-read-depth-10", |b| {
        b.iter(|| {
            let guards: Vec<_> = ancestors
                .iter()
                .map(|lock| lock.guard(Mode::IntentionShared))
                .chain(std::iter::once(target.guard(Mode::Shared)))
                .collect();
            drop(guards);
        });
    });
}

criterion_group!(lock, lock_unlock, shared_intention_unlock_unlock, path);
criterion_main!(lock);
