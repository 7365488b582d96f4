#![forbid(unsafe_code)]

//! Bounded item stack.
//!
//! LIFO for [`pop`](BoundedStack::pop), FIFO eviction from the oldest end
//! when a [`push`](BoundedStack::push) exceeds the limit. Eviction is a
//! normal, expected path: it is logged at trace level and never errors.
//!
//! Items are stored in a `VecDeque` for O(1) eviction from the front.

use std::collections::VecDeque;
use std::fmt;

use crate::item::HistoryItem;

pub(crate) struct BoundedStack {
    /// Items oldest-to-newest; the back is the top.
    items: VecDeque<Box<dyn HistoryItem>>,
    limit: usize,
}

impl fmt::Debug for BoundedStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedStack")
            .field("len", &self.items.len())
            .field("limit", &self.limit)
            .finish()
    }
}

impl BoundedStack {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            items: VecDeque::new(),
            limit,
        }
    }

    /// Push onto the newest end, evicting from the oldest end while over
    /// the limit.
    pub(crate) fn push(&mut self, item: Box<dyn HistoryItem>) {
        self.items.push_back(item);
        while self.items.len() > self.limit {
            self.items.pop_front();
            tracing::trace!(limit = self.limit, "evicted oldest history item");
        }
    }

    /// Remove and return the newest item, `None` when empty.
    pub(crate) fn pop(&mut self) -> Option<Box<dyn HistoryItem>> {
        self.items.pop_back()
    }

    /// Apply a new limit. Lowering truncates from the oldest end
    /// immediately; raising has no immediate effect.
    pub(crate) fn apply_limit(&mut self, limit: usize) {
        self.limit = limit;
        while self.items.len() > self.limit {
            self.items.pop_front();
        }
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
