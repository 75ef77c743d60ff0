//! Errors reported by an [`IntentionLock`](crate::IntentionLock).

use crate::mode::Mode;
use crate::state::State;

/// Lock discipline violations.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// A mode that has no holder was released.
    #[error("released {0} on an intention lock that does not hold it")]
    NotHeld(Mode),
    /// Another holder of the mode cannot be represented.
    #[error("number of {0} holders would exceed {max}", max = State::MAX_HOLDERS)]
    Overflow(Mode),
}
