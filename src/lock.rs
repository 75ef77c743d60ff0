//! [`IntentionLock`] is a hierarchical lock guarding a single node of a tree-shaped data structure.

#![deny(unsafe_code)]

use std::fmt;
use std::sync::PoisonError;
#[cfg(not(feature = "loom"))]
use std::sync::{Condvar, Mutex, MutexGuard};

#[cfg(feature = "loom")]
use loom::sync::{Condvar, Mutex, MutexGuard};
use tracing::trace;

use crate::error::Error;
use crate::guard::Guard;
use crate::mode::Mode;
use crate::state::State;

/// [`IntentionLock`] is a hierarchical lock guarding a single node of a tree-shaped data structure.
///
/// [`IntentionLock`] only provides low-level acquiring and releasing methods, hence the caller is
/// responsible for releasing exactly what it acquired.
///
/// To read a node, acquire [`IntentionShared`](Mode::IntentionShared) on every ancestor from the
/// root down, then [`Shared`](Mode::Shared) on the node; to write a node, substitute
/// [`IntentionExclusive`](Mode::IntentionExclusive) and [`Exclusive`](Mode::Exclusive). Release in
/// the reverse order.
///
/// Waiting callers are not served in any particular order, and an exclusive request can be
/// overtaken indefinitely by compatible requests.
pub struct IntentionLock {
    /// Holder counts.
    state: Mutex<State>,
    /// Signaled whenever the holder count of a mode drops to zero.
    released: Condvar,
}

impl IntentionLock {
    /// Maximum number of holders per mode.
    pub const MAX_HOLDERS: u16 = State::MAX_HOLDERS;

    /// Creates a new unlocked [`IntentionLock`].
    ///
    /// # Examples
    ///
    /// ```
    /// use intention_lock::{IntentionLock, Mode};
    ///
    /// static ROOT: IntentionLock = IntentionLock::new();
    ///
    /// assert!(ROOT.try_lock(Mode::Exclusive));
    /// ROOT.unlock_x();
    /// ```
    #[cfg(not(feature = "loom"))]
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(State::EMPTY),
            released: Condvar::new(),
        }
    }

    /// Creates a new unlocked [`IntentionLock`].
    #[cfg(feature = "loom")]
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::EMPTY),
            released: Condvar::new(),
        }
    }

    /// Acquires the lock in [`IntentionShared`](Mode::IntentionShared) mode.
    ///
    /// Blocks while the lock is held in [`Exclusive`](Mode::Exclusive) mode.
    ///
    /// # Panics
    ///
    /// Panics if the number of holders would exceed [`MAX_HOLDERS`](Self::MAX_HOLDERS).
    ///
    /// # Examples
    ///
    /// ```
    /// use intention_lock::{IntentionLock, Mode};
    ///
    /// let lock = IntentionLock::new();
    ///
    /// lock.lock_is();
    /// assert!(lock.try_lock(Mode::IntentionExclusive));
    /// assert!(!lock.try_lock(Mode::Exclusive));
    ///
    /// lock.unlock_ix();
    /// lock.unlock_is();
    /// ```
    #[inline]
    pub fn lock_is(&self) {
        self.lock(Mode::IntentionShared);
    }

    /// Acquires the lock in [`IntentionExclusive`](Mode::IntentionExclusive) mode.
    ///
    /// Blocks while the lock is held in [`Shared`](Mode::Shared) or [`Exclusive`](Mode::Exclusive)
    /// mode.
    ///
    /// # Panics
    ///
    /// Panics if the number of holders would exceed [`MAX_HOLDERS`](Self::MAX_HOLDERS).
    ///
    /// # Examples
    ///
    /// ```
    /// use intention_lock::{IntentionLock, Mode};
    ///
    /// let lock = IntentionLock::new();
    ///
    /// lock.lock_ix();
    /// assert!(lock.try_lock(Mode::IntentionExclusive));
    /// assert!(!lock.try_lock(Mode::Shared));
    ///
    /// lock.unlock_ix();
    /// lock.unlock_ix();
    /// ```
    #[inline]
    pub fn lock_ix(&self) {
        self.lock(Mode::IntentionExclusive);
    }

    /// Acquires the lock in [`Shared`](Mode::Shared) mode.
    ///
    /// Blocks while the lock is held in [`IntentionExclusive`](Mode::IntentionExclusive) or
    /// [`Exclusive`](Mode::Exclusive) mode.
    ///
    /// # Panics
    ///
    /// Panics if the number of holders would exceed [`MAX_HOLDERS`](Self::MAX_HOLDERS).
    ///
    /// # Examples
    ///
    /// ```
    /// use intention_lock::{IntentionLock, Mode};
    ///
    /// let lock = IntentionLock::new();
    ///
    /// lock.lock_s();
    /// assert!(lock.try_lock(Mode::Shared));
    /// assert!(!lock.try_lock(Mode::IntentionExclusive));
    ///
    /// lock.unlock_s();
    /// lock.unlock_s();
    /// ```
    #[inline]
    pub fn lock_s(&self) {
        self.lock(Mode::Shared);
    }

    /// Acquires the lock in [`Exclusive`](Mode::Exclusive) mode.
    ///
    /// Blocks while the lock is held in any mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use intention_lock::{IntentionLock, Mode};
    ///
    /// let lock = IntentionLock::new();
    ///
    /// lock.lock_x();
    /// assert!(!lock.try_lock(Mode::IntentionShared));
    ///
    /// lock.unlock_x();
    /// ```
    #[inline]
    pub fn lock_x(&self) {
        self.lock(Mode::Exclusive);
    }

    /// Releases an [`IntentionShared`](Mode::IntentionShared) hold.
    ///
    /// # Panics
    ///
    /// Panics if the lock is not held in the mode.
    #[inline]
    pub fn unlock_is(&self) {
        self.unlock(Mode::IntentionShared);
    }

    /// Releases an [`IntentionExclusive`](Mode::IntentionExclusive) hold.
    ///
    /// # Panics
    ///
    /// Panics if the lock is not held in the mode.
    #[inline]
    pub fn unlock_ix(&self) {
        self.unlock(Mode::IntentionExclusive);
    }

    /// Releases a [`Shared`](Mode::Shared) hold.
    ///
    /// # Panics
    ///
    /// Panics if the lock is not held in the mode.
    #[inline]
    pub fn unlock_s(&self) {
        self.unlock(Mode::Shared);
    }

    /// Releases an [`Exclusive`](Mode::Exclusive) hold.
    ///
    /// # Panics
    ///
    /// Panics if the lock is not held in the mode.
    ///
    /// # Examples
    ///
    /// ```should_panic
    /// use intention_lock::IntentionLock;
    ///
    /// let lock = IntentionLock::new();
    ///
    /// lock.lock_x();
    /// lock.unlock_x();
    /// lock.unlock_x();
    /// ```
    #[inline]
    pub fn unlock_x(&self) {
        self.unlock(Mode::Exclusive);
    }

    /// Acquires the lock in the specified mode, blocking until it is compatible with the current
    /// holders.
    ///
    /// # Panics
    ///
    /// Panics if the number of holders would exceed [`MAX_HOLDERS`](Self::MAX_HOLDERS).
    #[inline]
    pub fn lock(&self, mode: Mode) {
        if let Err(error) = self.checked_lock(mode) {
            panic!("{error}");
        }
    }

    /// Acquires the lock in the specified mode, blocking until it is compatible with the current
    /// holders.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] without acquiring the lock if the number of holders of the mode
    /// is already [`MAX_HOLDERS`](Self::MAX_HOLDERS).
    ///
    /// # Examples
    ///
    /// ```
    /// use intention_lock::{IntentionLock, Mode};
    ///
    /// let lock = IntentionLock::new();
    ///
    /// assert_eq!(lock.checked_lock(Mode::Shared), Ok(()));
    /// assert_eq!(lock.checked_unlock(Mode::Shared), Ok(()));
    /// ```
    pub fn checked_lock(&self, mode: Mode) -> Result<(), Error> {
        let mut state = self.state();
        while !state.is_compatible(mode) {
            trace!(%mode, state = ?*state, "waiting for conflicting holders to release");
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *state = state.register(mode).ok_or(Error::Overflow(mode))?;
        Ok(())
    }

    /// Tries to acquire the lock in the specified mode without blocking.
    ///
    /// Returns `false` if the mode is not compatible with the current holders or the number of
    /// holders has reached [`MAX_HOLDERS`](Self::MAX_HOLDERS).
    ///
    /// # Examples
    ///
    /// ```
    /// use intention_lock::{IntentionLock, Mode};
    ///
    /// let lock = IntentionLock::new();
    ///
    /// assert!(lock.try_lock(Mode::Shared));
    /// assert!(lock.try_lock(Mode::IntentionShared));
    /// assert!(!lock.try_lock(Mode::IntentionExclusive));
    ///
    /// lock.unlock_s();
    /// assert!(lock.try_lock(Mode::IntentionExclusive));
    /// ```
    pub fn try_lock(&self, mode: Mode) -> bool {
        let mut state = self.state();
        if !state.is_compatible(mode) {
            return false;
        }
        match state.register(mode) {
            Some(next) => {
                *state = next;
                true
            }
            None => false,
        }
    }

    /// Releases a hold in the specified mode.
    ///
    /// # Panics
    ///
    /// Panics if the lock is not held in the mode.
    #[inline]
    pub fn unlock(&self, mode: Mode) {
        if let Err(error) = self.checked_unlock(mode) {
            panic!("{error}");
        }
    }

    /// Releases a hold in the specified mode.
    ///
    /// All the waiting threads are woken up if the last holder of the mode is gone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotHeld`] if the lock is not held in the mode; the lock is left intact.
    ///
    /// # Examples
    ///
    /// ```
    /// use intention_lock::{Error, IntentionLock, Mode};
    ///
    /// let lock = IntentionLock::new();
    ///
    /// lock.lock_is();
    /// assert_eq!(lock.checked_unlock(Mode::IntentionShared), Ok(()));
    /// assert_eq!(
    ///     lock.checked_unlock(Mode::IntentionShared),
    ///     Err(Error::NotHeld(Mode::IntentionShared))
    /// );
    /// ```
    pub fn checked_unlock(&self, mode: Mode) -> Result<(), Error> {
        let mut state = self.state();
        let next = state.deregister(mode).ok_or(Error::NotHeld(mode))?;
        *state = next;
        if next.count(mode) == 0 {
            trace!(%mode, "last holder released, waking up all waiters");
            self.released.notify_all();
        }
        Ok(())
    }

    /// Acquires the lock in the specified mode and returns a [`Guard`] releasing it when dropped.
    ///
    /// # Panics
    ///
    /// Panics if the number of holders would exceed [`MAX_HOLDERS`](Self::MAX_HOLDERS).
    ///
    /// # Examples
    ///
    /// ```
    /// use intention_lock::{IntentionLock, Mode};
    ///
    /// let lock = IntentionLock::new();
    ///
    /// let guard = lock.guard(Mode::IntentionExclusive);
    /// assert!(!lock.try_lock(Mode::Shared));
    /// drop(guard);
    ///
    /// assert!(lock.try_lock(Mode::Shared));
    /// ```
    #[inline]
    pub fn guard(&self, mode: Mode) -> Guard<'_> {
        self.lock(mode);
        Guard::new(self, mode)
    }

    /// Tries to acquire the lock in the specified mode without blocking, and returns a [`Guard`]
    /// releasing it when dropped.
    #[inline]
    pub fn try_guard(&self, mode: Mode) -> Option<Guard<'_>> {
        self.try_lock(mode).then(|| Guard::new(self, mode))
    }

    /// Returns a copy of the holder counts.
    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> State {
        *self.state()
    }

    /// Locks the holder counts.
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for IntentionLock {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IntentionLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = *self.state();
        f.debug_struct("IntentionLock")
            .field("is", &state.count(Mode::IntentionShared))
            .field("ix", &state.count(Mode::IntentionExclusive))
            .field("s", &state.count(Mode::Shared))
            .field("x", &state.count(Mode::Exclusive))
            .finish()
    }
}
