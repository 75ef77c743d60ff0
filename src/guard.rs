//! [`Guard`] releases a hold on an [`IntentionLock`] when dropped.

use std::fmt;

use crate::lock::IntentionLock;
use crate::mode::Mode;

/// An RAII implementation of a scoped hold on an [`IntentionLock`].
///
/// # Examples
///
/// ```
/// use intention_lock::{IntentionLock, Mode};
///
/// let root = IntentionLock::new();
/// let node = IntentionLock::new();
///
/// {
///     let _root = root.guard(Mode::IntentionExclusive);
///     let node_guard = node.guard(Mode::Exclusive);
///     assert_eq!(node_guard.mode(), Mode::Exclusive);
///     assert!(!root.try_lock(Mode::Shared));
/// }
///
/// assert!(root.try_lock(Mode::Exclusive));
/// ```
#[must_use = "the lock is released immediately if the guard is not used"]
pub struct Guard<'l> {
    lock: &'l IntentionLock,
    mode: Mode,
}

impl<'l> Guard<'l> {
    /// The caller must hold `lock` in `mode`.
    #[inline]
    pub(crate) fn new(lock: &'l IntentionLock, mode: Mode) -> Self {
        Self { lock, mode }
    }

    /// Returns the mode held by the guard.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the lock held by the guard.
    #[inline]
    #[must_use]
    pub fn lock(&self) -> &'l IntentionLock {
        self.lock
    }
}

impl fmt::Debug for Guard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("mode", &self.mode).finish()
    }
}

impl Drop for Guard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.lock.unlock(self.mode);
    }
}
