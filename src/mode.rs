//! Lock modes of an [`IntentionLock`](crate::IntentionLock).

use std::fmt;

/// Lock modes.
///
/// The intention modes are taken on the ancestors of a node, and the terminal modes on the node
/// itself.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Intention to share: permits taking [`IntentionShared`](Mode::IntentionShared) or
    /// [`Shared`](Mode::Shared) on descendants.
    IntentionShared,
    /// Intention for exclusive access: permits taking
    /// [`IntentionExclusive`](Mode::IntentionExclusive) or [`Exclusive`](Mode::Exclusive) on
    /// descendants.
    IntentionExclusive,
    /// Read access to the node and its entire subtree.
    Shared,
    /// Write access to the node and its entire subtree.
    Exclusive,
}

impl Mode {
    /// All the modes.
    pub const ALL: [Mode; 4] = [
        Mode::IntentionShared,
        Mode::IntentionExclusive,
        Mode::Shared,
        Mode::Exclusive,
    ];

    /// Returns `true` if `self` can be granted while another caller holds `held`.
    ///
    /// The relation is symmetric.
    ///
    /// # Examples
    ///
    /// ```
    /// use intention_lock::Mode;
    ///
    /// assert!(Mode::Shared.is_compatible_with(Mode::IntentionShared));
    /// assert!(Mode::IntentionExclusive.is_compatible_with(Mode::IntentionExclusive));
    /// assert!(!Mode::Shared.is_compatible_with(Mode::IntentionExclusive));
    /// assert!(!Mode::Exclusive.is_compatible_with(Mode::IntentionShared));
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_compatible_with(self, held: Mode) -> bool {
        !matches!(
            (self, held),
            (Mode::Exclusive, _)
                | (_, Mode::Exclusive)
                | (Mode::Shared, Mode::IntentionExclusive)
                | (Mode::IntentionExclusive, Mode::Shared)
        )
    }

    /// Returns the short name of the mode.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::IntentionShared => "IS",
            Mode::IntentionExclusive => "IX",
            Mode::Shared => "S",
            Mode::Exclusive => "X",
        }
    }

    /// Bit offset of the holder count of the mode in a packed state word.
    #[inline]
    pub(crate) const fn offset(self) -> u32 {
        match self {
            Mode::Exclusive => 0,
            Mode::Shared => 16,
            Mode::IntentionShared => 32,
            Mode::IntentionExclusive => 48,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
