//! Implementations of locking traits from the [`lock_api`](https://crates.io/crates/lock_api)
//! crate.
//!
//! Shared access maps to [`Mode::Shared`] and exclusive access to [`Mode::Exclusive`], so the data
//! protected by an [`RwLock`] belongs to a single tree node; the ancestors still have to be held in
//! the matching intention mode through their own [`IntentionLock`].

use super::{IntentionLock, Mode};

/// A reader-writer lock for protecting the data of a tree node of type `T`.
///
/// # Examples
///
/// ```
/// use intention_lock::RwLock;
///
/// let node: RwLock<usize> = RwLock::new(0);
/// ```
pub type RwLock<T> = lock_api::RwLock<IntentionLock, T>;

/// An RAII implementation of a scoped [`Shared`](Mode::Shared) hold.
///
/// # Examples
///
/// ```
/// use intention_lock::{IntentionLock, RwLock, RwLockReadGuard};
///
/// let root = IntentionLock::new();
/// let node: RwLock<usize> = RwLock::new(0);
///
/// root.lock_is();
/// let guard: RwLockReadGuard<usize> = node.read();
/// assert_eq!(*guard, 0);
/// drop(guard);
/// root.unlock_is();
/// ```
pub type RwLockReadGuard<'a, T> = lock_api::RwLockReadGuard<'a, IntentionLock, T>;

/// An RAII implementation of a scoped [`Exclusive`](Mode::Exclusive) hold.
///
/// # Examples
///
/// ```
/// use intention_lock::{IntentionLock, RwLock, RwLockWriteGuard};
///
/// let root = IntentionLock::new();
/// let node: RwLock<usize> = RwLock::new(0);
///
/// root.lock_ix();
/// let mut guard: RwLockWriteGuard<usize> = node.write();
/// *guard += 1;
/// drop(guard);
/// root.unlock_ix();
///
/// assert_eq!(*node.read(), 1);
/// ```
pub type RwLockWriteGuard<'a, T> = lock_api::RwLockWriteGuard<'a, IntentionLock, T>;

unsafe impl lock_api::RawRwLock for IntentionLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = IntentionLock::new();

    type GuardMarker = lock_api::GuardSend;

    #[inline]
    fn lock_shared(&self) {
        self.lock(Mode::Shared);
    }

    #[inline]
    fn try_lock_shared(&self) -> bool {
        self.try_lock(Mode::Shared)
    }

    #[inline]
    unsafe fn unlock_shared(&self) {
        self.unlock(Mode::Shared);
    }

    #[inline]
    fn lock_exclusive(&self) {
        self.lock(Mode::Exclusive);
    }

    #[inline]
    fn try_lock_exclusive(&self) -> bool {
        self.try_lock(Mode::Exclusive)
    }

    #[inline]
    unsafe fn unlock_exclusive(&self) {
        self.unlock(Mode::Exclusive);
    }
}
