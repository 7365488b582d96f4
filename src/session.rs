#![forbid(unsafe_code)]

//! Session grouping.
//!
//! A session buffers inserted items so that closing the outermost open
//! session compiles them into a single [`CompositeItem`]. Sessions nest:
//! the open handles form a stack, but the buffer is shared across all
//! nesting levels, and only the outermost closure drains it.
//!
//! # Invariants
//!
//! - Closing an outer session implicitly closes every session opened after
//!   it; the buffer keeps accumulating while any session remains open
//! - A handle can be closed successfully at most once; a second close is
//!   rejected because its id is no longer among the open sessions
//! - Rollback never inserts anything into the main history

use std::fmt;

use crate::item::{CompositeItem, HistoryItem};

/// Handle for one level of open grouping, returned by
/// [`History::start_session`](crate::History::start_session).
///
/// Not `Clone` or `Copy`: one handle per open level.
#[derive(Debug)]
pub struct Session {
    id: u64,
}

impl Session {
    pub(crate) fn id(&self) -> u64 {
        self.id
    }
}

/// What closing a handle amounted to.
pub(crate) enum CloseOutcome {
    /// The id is not among the open sessions.
    NotOpen,
    /// An outer session is still open; the buffer keeps accumulating.
    StillNested,
    /// The outermost session closed over an empty buffer.
    Empty,
    /// The outermost session closed; here is the compiled item.
    Compiled(CompositeItem),
}

pub(crate) struct SessionTracker {
    /// Ids of currently open sessions, outermost first.
    open: Vec<u64>,
    /// Items buffered while any session is open, in insertion order.
    buffer: Vec<Box<dyn HistoryItem>>,
    next_id: u64,
}

impl fmt::Debug for SessionTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTracker")
            .field("open", &self.open.len())
            .field("buffered", &self.buffer.len())
            .finish()
    }
}

impl SessionTracker {
    pub(crate) fn new() -> Self {
        Self {
            open: Vec::new(),
            buffer: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn start(&mut self) -> Session {
        let id = self.next_id;
        self.next_id += 1;
        self.open.push(id);
        Session { id }
    }

    pub(crate) fn any_open(&self) -> bool {
        !self.open.is_empty()
    }

    pub(crate) fn open_depth(&self) -> usize {
        self.open.len()
    }

    pub(crate) fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    pub(crate) fn buffer_push(&mut self, item: Box<dyn HistoryItem>) {
        self.buffer.push(item);
    }

    /// Close the session with the given id, discarding it and everything
    /// opened after it.
    pub(crate) fn close(&mut self, id: u64) -> CloseOutcome {
        let Some(pos) = self.open.iter().position(|&open| open == id) else {
            return CloseOutcome::NotOpen;
        };
        self.open.truncate(pos);
        if !self.open.is_empty() {
            return CloseOutcome::StillNested;
        }
        if self.buffer.is_empty() {
            return CloseOutcome::Empty;
        }
        CloseOutcome::Compiled(CompositeItem::from_items(std::mem::take(&mut self.buffer)))
    }

    /// Drop all open sessions and buffered items without executing
    /// anything.
    pub(crate) fn discard(&mut self) {
        self.open.clear();
        self.buffer.clear();
    }

    /// Discard all open sessions and hand back the buffer for the caller
    /// to roll back.
    pub(crate) fn take_for_rollback(&mut self) -> Vec<Box<dyn HistoryItem>> {
        self.open.clear();
        std::mem::take(&mut self.buffer)
    }
}

// ============================================================================
// Tests
// ============================================================================
