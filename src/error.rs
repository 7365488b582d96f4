#![forbid(unsafe_code)]

//! Engine error type.
//!
//! Whether a rejected operation surfaces as `Err` or as a log line is
//! controlled by [`HistoryConfig::throw_on_error`](crate::HistoryConfig).
//! The one exception is [`HistoryError::Item`], which always returns `Err`:
//! an action failing mid-replay is the caller's own logic reporting real
//! state divergence, never something to swallow.

use std::error::Error;
use std::fmt;

use crate::item::ItemError;

/// Ways a history operation can be rejected or fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// `configure` was given a zero stack limit.
    InvalidStackLimit(usize),
    /// `undo`/`redo` was attempted while a session is open. Carries the
    /// name of the rejected operation.
    SessionOpen(&'static str),
    /// The closed handle is not among the currently open sessions.
    NotAnOpenSession,
    /// An item's action failed during replay. The item has been dropped.
    Item(ItemError),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStackLimit(limit) => write!(f, "invalid stack limit: {limit}"),
            Self::SessionOpen(op) => write!(f, "cannot {op} while a session is open"),
            Self::NotAnOpenSession => write!(f, "not an open session"),
            Self::Item(e) => write!(f, "item action failed: {e}"),
        }
    }
}

impl Error for HistoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Item(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ItemError> for HistoryError {
    fn from(e: ItemError) -> Self {
        Self::Item(e)
    }
}
