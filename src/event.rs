#![forbid(unsafe_code)]

//! History events and the listener registry.
//!
//! Events are a closed enum, so an unknown event name is unrepresentable.
//! Handlers are `Rc` closures; the registry de-duplicates and removes by
//! `Rc` identity, so registering the same handle twice is a no-op and two
//! distinct closures with identical bodies are distinct handlers.

use std::fmt;
use std::rc::Rc;

/// The engine operations a listener can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEvent {
    /// An item was undone and moved to the redo stack.
    Undo,
    /// An item was redone and moved back to the undo stack.
    Redo,
}

/// Post-operation lengths of both stacks, handed to every listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StackDepths {
    /// Items currently available for undo.
    pub undo: usize,
    /// Items currently available for redo.
    pub redo: usize,
}

/// A registered callback. The same `Rc` must be passed to
/// [`History::off`](crate::History::off) to deregister it.
pub type Listener = Rc<dyn Fn(StackDepths)>;

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    undo: Vec<Listener>,
    redo: Vec<Listener>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("undo", &self.undo.len())
            .field("redo", &self.redo.len())
            .finish()
    }
}

impl ListenerRegistry {
    fn slot(&self, event: HistoryEvent) -> &Vec<Listener> {
        match event {
            HistoryEvent::Undo => &self.undo,
            HistoryEvent::Redo => &self.redo,
        }
    }

    fn slot_mut(&mut self, event: HistoryEvent) -> &mut Vec<Listener> {
        match event {
            HistoryEvent::Undo => &mut self.undo,
            HistoryEvent::Redo => &mut self.redo,
        }
    }

    /// Append unless this exact handle is already registered for the event.
    pub(crate) fn register(&mut self, event: HistoryEvent, listener: Listener) {
        let slot = self.slot_mut(event);
        if slot.iter().any(|l| Rc::ptr_eq(l, &listener)) {
            return;
        }
        slot.push(listener);
    }

    /// Remove by handle identity. Absence is not an error.
    pub(crate) fn deregister(&mut self, event: HistoryEvent, listener: &Listener) {
        self.slot_mut(event).retain(|l| !Rc::ptr_eq(l, listener));
    }

    /// Clone the handler list so dispatch can run without holding any
    /// borrow of the registry.
    pub(crate) fn snapshot(&self, event: HistoryEvent) -> Vec<Listener> {
        self.slot(event).clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
