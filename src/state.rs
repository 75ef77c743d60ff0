//! Packed holder counts of an [`IntentionLock`](crate::IntentionLock).

use std::fmt;

use crate::mode::Mode;

/// Holder counts of the four lock modes packed into a single `u64`.
///
/// ```text
/// |63      48|47      32|31      16|15       0|
///  \   IX   / \   IS   / \   S    / \   X    /
/// ```
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct State(u64);

impl State {
    /// No holders in any mode.
    pub const EMPTY: State = State(0);

    /// Maximum number of holders per mode.
    pub const MAX_HOLDERS: u16 = u16::MAX;

    /// Field mask of a single mode, before shifting.
    const FIELD_MASK: u64 = (1 << 16) - 1;

    /// Packs the holder counts, listed in the order of [`Mode::ALL`].
    ///
    /// # Examples
    ///
    /// ```
    /// use intention_lock::{Mode, State};
    ///
    /// let state = State::encode([3, 2, 0, 0]);
    /// assert_eq!(state.count(Mode::IntentionShared), 3);
    /// assert_eq!(state.count(Mode::IntentionExclusive), 2);
    /// assert_eq!(state.decode(), [3, 2, 0, 0]);
    /// ```
    #[inline]
    #[must_use]
    pub const fn encode(counts: [u16; 4]) -> State {
        let mut state = State::EMPTY;
        let mut i = 0;
        while i < Mode::ALL.len() {
            state = state.with(Mode::ALL[i], counts[i]);
            i += 1;
        }
        state
    }

    /// Unpacks the holder counts in the order of [`Mode::ALL`].
    #[inline]
    #[must_use]
    pub const fn decode(self) -> [u16; 4] {
        [
            self.count(Mode::ALL[0]),
            self.count(Mode::ALL[1]),
            self.count(Mode::ALL[2]),
            self.count(Mode::ALL[3]),
        ]
    }

    /// Returns the raw representation.
    #[cfg(test)]
    pub(crate) const fn bits(self) -> u64 {
        self.0
    }

    /// Returns the number of holders of `mode`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn count(self, mode: Mode) -> u16 {
        ((self.0 >> mode.offset()) & Self::FIELD_MASK) as u16
    }

    /// Returns a new [`State`] with the holder count of `mode` replaced.
    ///
    /// The other three counts are left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use intention_lock::{Mode, State};
    ///
    /// let state = State::encode([1, 0, 4, 0]).with(Mode::Shared, 9);
    /// assert_eq!(state.decode(), [1, 0, 9, 0]);
    /// ```
    #[inline]
    #[must_use]
    pub const fn with(self, mode: Mode, count: u16) -> State {
        let mask = Self::mask(mode);
        State((self.0 & !mask) | ((count as u64) << mode.offset()))
    }

    /// Returns `true` if no mode is held.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if `mode` can be granted without waiting.
    ///
    /// This only inspects the current holders; the capacity of `mode` is not taken into account.
    ///
    /// # Examples
    ///
    /// ```
    /// use intention_lock::{Mode, State};
    ///
    /// let state = State::EMPTY.with(Mode::IntentionExclusive, 1);
    /// assert!(state.is_compatible(Mode::IntentionShared));
    /// assert!(state.is_compatible(Mode::IntentionExclusive));
    /// assert!(!state.is_compatible(Mode::Shared));
    /// assert!(!state.is_compatible(Mode::Exclusive));
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_compatible(self, mode: Mode) -> bool {
        self.0 & Self::conflict_mask(mode) == 0
    }

    /// Returns a new [`State`] with one more holder of `mode`, or `None` if the count is at
    /// [`MAX_HOLDERS`](Self::MAX_HOLDERS).
    #[inline]
    pub(crate) const fn register(self, mode: Mode) -> Option<State> {
        match self.count(mode).checked_add(1) {
            Some(count) => Some(self.with(mode, count)),
            None => None,
        }
    }

    /// Returns a new [`State`] with one less holder of `mode`, or `None` if `mode` is not held.
    #[inline]
    pub(crate) const fn deregister(self, mode: Mode) -> Option<State> {
        match self.count(mode).checked_sub(1) {
            Some(count) => Some(self.with(mode, count)),
            None => None,
        }
    }

    /// Field mask of `mode`.
    const fn mask(mode: Mode) -> u64 {
        Self::FIELD_MASK << mode.offset()
    }

    /// Union of the field masks of the modes that block `mode`.
    const fn conflict_mask(mode: Mode) -> u64 {
        let mut conflicts = 0;
        let mut i = 0;
        while i < Mode::ALL.len() {
            if !mode.is_compatible_with(Mode::ALL[i]) {
                conflicts |= Self::mask(Mode::ALL[i]);
            }
            i += 1;
        }
        conflicts
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("is", &self.count(Mode::IntentionShared))
            .field("ix", &self.count(Mode::IntentionExclusive))
            .field("s", &self.count(Mode::Shared))
            .field("x", &self.count(Mode::Exclusive))
            .finish()
    }
}
