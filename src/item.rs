#![forbid(unsafe_code)]

//! Reversible history items.
//!
//! A [`HistoryItem`] is the atomic unit the engine moves between its undo
//! and redo stacks: two zero-argument actions, one reverting an operation
//! and one re-applying it. The engine never looks at anything else; how an
//! item mutates application state is entirely the caller's business.
//!
//! # Invariants
//!
//! - `undo()` followed by `redo()` restores the applied state exactly
//! - An item lives in exactly one place at a time: the undo stack, the redo
//!   stack, or an open session's buffer
//! - A [`CompositeItem`] replays member undos newest-first and member redos
//!   oldest-first

use std::error::Error;
use std::fmt;

/// Outcome of running an item's undo or redo action.
pub type ItemResult = Result<(), ItemError>;

/// Failure reported by an item's action.
///
/// An action that returns `Err` aborts the surrounding `undo`/`redo` call;
/// the item is dropped rather than moved to the opposite stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// The action cannot be applied in the current application state.
    InvalidState(String),
    /// Any other failure reported by the action.
    Other(String),
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl Error for ItemError {}

/// A reversible operation: one action to revert it, one to re-apply it.
///
/// Both actions take no arguments: an item captures whatever state it
/// needs when it is built. Actions are fallible; see [`ItemError`] for what
/// an `Err` means to the engine.
pub trait HistoryItem {
    /// Revert the operation.
    fn undo(&mut self) -> ItemResult;

    /// Re-apply the operation.
    fn redo(&mut self) -> ItemResult;
}

type Action = Box<dyn FnMut() -> ItemResult>;

/// A [`HistoryItem`] built from two closures.
///
/// The closure-pair form mirrors how callers usually hold their undo/redo
/// logic; for anything stateful, implement [`HistoryItem`] directly.
pub struct FnItem {
    undo: Action,
    redo: Action,
}

impl FnItem {
    /// Build an item from two fallible actions.
    #[must_use]
    pub fn new(
        undo: impl FnMut() -> ItemResult + 'static,
        redo: impl FnMut() -> ItemResult + 'static,
    ) -> Self {
        Self {
            undo: Box::new(undo),
            redo: Box::new(redo),
        }
    }

    /// Build an item from two actions that cannot fail.
    #[must_use]
    pub fn infallible(mut undo: impl FnMut() + 'static, mut redo: impl FnMut() + 'static) -> Self {
        Self::new(
            move || {
                undo();
                Ok(())
            },
            move || {
                redo();
                Ok(())
            },
        )
    }
}

impl fmt::Debug for FnItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnItem").finish_non_exhaustive()
    }
}

impl HistoryItem for FnItem {
    fn undo(&mut self) -> ItemResult {
        (self.undo)()
    }

    fn redo(&mut self) -> ItemResult {
        (self.redo)()
    }
}

/// A group of items that undo and redo together.
///
/// Closing the outermost session compiles the session buffer into one of
/// these, making a multi-step session indistinguishable from a single
/// atomic operation to later undo/redo calls. Composites can also be built
/// by hand and inserted like any other item.
pub struct CompositeItem {
    /// Members in original application order.
    items: Vec<Box<dyn HistoryItem>>,
}

impl fmt::Debug for CompositeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeItem")
            .field("items", &self.items.len())
            .finish()
    }
}

impl CompositeItem {
    /// Create an empty composite.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub(crate) fn from_items(items: Vec<Box<dyn HistoryItem>>) -> Self {
        Self { items }
    }

    /// Append a member. Members replay in push order on redo and in reverse
    /// push order on undo.
    pub fn push(&mut self, item: Box<dyn HistoryItem>) {
        self.items.push(item);
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the composite has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for CompositeItem {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryItem for CompositeItem {
    fn undo(&mut self) -> ItemResult {
        for item in self.items.iter_mut().rev() {
            item.undo()?;
        }
        Ok(())
    }

    fn redo(&mut self) -> ItemResult {
        for i in 0..self.items.len() {
            if let Err(e) = self.items[i].redo() {
                // Best-effort rollback of the members already replayed.
                for j in (0..i).rev() {
                    let _ = self.items[j].undo();
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_item(log: &Rc<RefCell<String>>, on_undo: &'static str, on_redo: &'static str) -> FnItem {
        let u = log.clone();
        let r = log.clone();
        FnItem::infallible(
            move || u.borrow_mut().push_str(on_undo),
            move || r.borrow_mut().push_str(on_redo),
        )
    }

    #[test]
    fn test_fn_item_runs_the_right_action() {
        let log = Rc::new(RefCell::new(String::new()));
        let mut item = recording_item(&log, "u", "r");

        item.undo().unwrap();
        item.redo().unwrap();
        assert_eq!(*log.borrow(), "ur");
    }

    #[test]
    fn test_fn_item_propagates_errors() {
        let mut item = FnItem::new(
            || Err(ItemError::Other("boom".into())),
            || Ok(()),
        );
        assert_eq!(item.undo(), Err(ItemError::Other("boom".into())));
        assert_eq!(item.redo(), Ok(()));
    }

    #[test]
    fn test_composite_undo_replays_newest_first() {
        let log = Rc::new(RefCell::new(String::new()));
        let mut composite = CompositeItem::new();
        composite.push(Box::new(recording_item(&log, "a", "A")));
        composite.push(Box::new(recording_item(&log, "b", "B")));
        composite.push(Box::new(recording_item(&log, "c", "C")));

        composite.undo().unwrap();
        assert_eq!(*log.borrow(), "cba");
    }

    #[test]
    fn test_composite_redo_replays_oldest_first() {
        let log = Rc::new(RefCell::new(String::new()));
        let mut composite = CompositeItem::new();
        composite.push(Box::new(recording_item(&log, "a", "A")));
        composite.push(Box::new(recording_item(&log, "b", "B")));

        composite.redo().unwrap();
        assert_eq!(*log.borrow(), "AB");
    }

    #[test]
    fn test_composite_redo_rolls_back_on_member_failure() {
        let log = Rc::new(RefCell::new(String::new()));
        let mut composite = CompositeItem::new();
        composite.push(Box::new(recording_item(&log, "a", "A")));
        composite.push(Box::new(recording_item(&log, "b", "B")));
        composite.push(Box::new(FnItem::new(
            || Ok(()),
            || Err(ItemError::InvalidState("gone".into())),
        )));

        let err = composite.redo().unwrap_err();
        assert_eq!(err, ItemError::InvalidState("gone".into()));
        // The two replayed members were rolled back in reverse order.
        assert_eq!(*log.borrow(), "ABba");
    }

    #[test]
    fn test_composite_undo_stops_at_first_failure() {
        let log = Rc::new(RefCell::new(String::new()));
        let mut composite = CompositeItem::new();
        composite.push(Box::new(recording_item(&log, "a", "A")));
        composite.push(Box::new(FnItem::new(
            || Err(ItemError::Other("stuck".into())),
            || Ok(()),
        )));
        composite.push(Box::new(recording_item(&log, "c", "C")));

        assert!(composite.undo().is_err());
        // Newest member undid fine, the failure stopped the replay before "a".
        assert_eq!(*log.borrow(), "c");
    }

    #[test]
    fn test_composite_len_and_empty() {
        let mut composite = CompositeItem::default();
        assert!(composite.is_empty());
        composite.push(Box::new(FnItem::infallible(|| {}, || {})));
        assert_eq!(composite.len(), 1);
        assert!(!composite.is_empty());
    }

    #[test]
    fn test_item_error_display() {
        let err = ItemError::InvalidState("target deleted".into());
        assert!(err.to_string().contains("target deleted"));

        let err = ItemError::Other("boom".into());
        assert_eq!(err.to_string(), "boom");
    }
}
