#![deny(missing_docs, clippy::all, clippy::pedantic)]
#![doc = include_str!("../README.md")]

pub mod error;
pub use error::Error;

pub mod guard;
pub use guard::Guard;

pub mod lock;
pub use lock::IntentionLock;

#[cfg(not(feature = "loom"))]
mod lock_api;
#[cfg(not(feature = "loom"))]
pub use crate::lock_api::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub mod mode;
pub use mode::Mode;

pub mod state;
pub use state::State;
