#![forbid(unsafe_code)]

//! The history engine.
//!
//! [`History`] owns two bounded stacks, the session tracker, the listener
//! registry, and the runtime configuration. Every piece of state lives in
//! owned fields; construct as many independent histories as you need.
//!
//! ```text
//! insert(d)
//! ┌─────────────────────────────────────────────┐
//! │ Undo Stack: [a, b, c, d]                    │
//! │ Redo Stack: []            (cleared on insert)│
//! └─────────────────────────────────────────────┘
//!
//! undo() x2
//! ┌─────────────────────────────────────────────┐
//! │ Undo Stack: [a, b]                          │
//! │ Redo Stack: [c, d]                          │
//! └─────────────────────────────────────────────┘
//!
//! insert(e)  <-- new branch, the redo future is gone
//! ┌─────────────────────────────────────────────┐
//! │ Undo Stack: [a, b, e]                       │
//! │ Redo Stack: []                              │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Why methods take `&self`
//!
//! Items and listeners are closures that may hold an `Rc<History>` and call
//! back into the engine while one of their actions is running. With
//! `&mut self` methods such re-entrancy would be unrepresentable, and so
//! would the guard against it. State therefore lives behind `Cell`/
//! `RefCell`, methods take `&self`, and the replay flag turns re-entrant
//! `insert`/`undo`/`redo` calls into silent no-ops instead of stack
//! corruption. The type is single-threaded by construction (`!Sync`),
//! which is the engine's whole concurrency model.
//!
//! # Invariants
//!
//! - Neither stack ever exceeds the configured limit after any operation
//! - A new insertion always clears the redo stack, buffered or not
//! - No `RefCell` borrow is held across an action or listener invocation
//! - Validation happens before any stack mutation: a rejected call leaves
//!   the engine exactly as it found it

use std::cell::{Cell, RefCell};
use std::fmt;

use crate::config::{ConfigUpdate, HistoryConfig};
use crate::error::HistoryError;
use crate::event::{HistoryEvent, Listener, ListenerRegistry, StackDepths};
use crate::item::HistoryItem;
use crate::session::{CloseOutcome, Session, SessionTracker};
use crate::stack::BoundedStack;

/// An undo/redo history engine.
///
/// See the [module docs](self) for the state layout and re-entrancy model.
pub struct History {
    undo_stack: RefCell<BoundedStack>,
    redo_stack: RefCell<BoundedStack>,
    sessions: RefCell<SessionTracker>,
    listeners: RefCell<ListenerRegistry>,
    config: Cell<HistoryConfig>,
    enabled: Cell<bool>,
    /// Set while an item action replays; the gate drops re-entrant calls.
    replaying: Cell<bool>,
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("undo_depth", &self.undo_stack.borrow().len())
            .field("redo_depth", &self.redo_stack.borrow().len())
            .field("open_sessions", &self.sessions.borrow().open_depth())
            .field("enabled", &self.enabled.get())
            .field("config", &self.config.get())
            .finish()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create an engine with default configuration (stack limit 20,
    /// log-only error policy). Use [`configure`](Self::configure) to
    /// change either setting; that is the validated path.
    #[must_use]
    pub fn new() -> Self {
        let config = HistoryConfig::default();
        Self {
            undo_stack: RefCell::new(BoundedStack::new(config.stack_limit)),
            redo_stack: RefCell::new(BoundedStack::new(config.stack_limit)),
            sessions: RefCell::new(SessionTracker::new()),
            listeners: RefCell::new(ListenerRegistry::default()),
            config: Cell::new(config),
            enabled: Cell::new(true),
            replaying: Cell::new(false),
        }
    }

    // ========================================================================
    // Core operations
    // ========================================================================

    /// Record a reversible item.
    ///
    /// Clears the redo stack unconditionally. While a session is open the
    /// item lands in the session buffer; otherwise it is pushed onto the
    /// undo stack, evicting the oldest entry if over the limit. Silently
    /// dropped while the engine is disabled or an action is replaying.
    pub fn insert(&self, item: impl HistoryItem + 'static) {
        self.insert_boxed(Box::new(item));
    }

    fn insert_boxed(&self, item: Box<dyn HistoryItem>) {
        if !self.allowed() {
            tracing::trace!("insert dropped by gate");
            return;
        }
        self.redo_stack.borrow_mut().clear();
        let mut sessions = self.sessions.borrow_mut();
        if sessions.any_open() {
            sessions.buffer_push(item);
            return;
        }
        drop(sessions);
        self.undo_stack.borrow_mut().push(item);
    }

    /// Undo the most recent item and move it to the redo stack.
    ///
    /// No-op on an empty undo stack or while gated. Rejected while a
    /// session is open (per the error policy). An action `Err` always
    /// propagates; the failed item is dropped, not moved.
    pub fn undo(&self) -> Result<(), HistoryError> {
        if !self.allowed() {
            tracing::trace!("undo dropped by gate");
            return Ok(());
        }
        if self.sessions.borrow().any_open() {
            return self.report(HistoryError::SessionOpen("undo"));
        }
        let Some(mut item) = self.undo_stack.borrow_mut().pop() else {
            return Ok(());
        };

        self.replaying.set(true);
        let outcome = item.undo();
        self.replaying.set(false);
        outcome?;

        self.redo_stack.borrow_mut().push(item);
        self.notify(HistoryEvent::Undo);
        Ok(())
    }

    /// Redo the most recently undone item and move it back to the undo
    /// stack. Symmetric to [`undo`](Self::undo) in every respect.
    pub fn redo(&self) -> Result<(), HistoryError> {
        if !self.allowed() {
            tracing::trace!("redo dropped by gate");
            return Ok(());
        }
        if self.sessions.borrow().any_open() {
            return self.report(HistoryError::SessionOpen("redo"));
        }
        let Some(mut item) = self.redo_stack.borrow_mut().pop() else {
            return Ok(());
        };

        self.replaying.set(true);
        let outcome = item.redo();
        self.replaying.set(false);
        outcome?;

        self.undo_stack.borrow_mut().push(item);
        self.notify(HistoryEvent::Redo);
        Ok(())
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Open a session. Until the returned handle (and any nested handles
    /// opened after it) is closed, inserted items are buffered instead of
    /// hitting the undo stack.
    pub fn start_session(&self) -> Session {
        let session = self.sessions.borrow_mut().start();
        tracing::trace!("session opened");
        session
    }

    /// Close a session handle.
    ///
    /// Closing an outer handle implicitly closes every session opened
    /// after it. Closing the outermost handle compiles the buffered items
    /// into one composite and records it through the regular insert path
    /// (so a disabled engine drops it). A handle that is not currently
    /// open, including one already closed, is rejected per the error
    /// policy.
    pub fn close_session(&self, session: &Session) -> Result<(), HistoryError> {
        let outcome = self.sessions.borrow_mut().close(session.id());
        match outcome {
            CloseOutcome::NotOpen => self.report(HistoryError::NotAnOpenSession),
            CloseOutcome::StillNested | CloseOutcome::Empty => Ok(()),
            CloseOutcome::Compiled(composite) => {
                tracing::debug!(items = composite.len(), "session compiled into one composite item");
                self.insert_boxed(Box::new(composite));
                Ok(())
            }
        }
    }

    /// Abort all open sessions: execute every buffered item's undo action
    /// newest-first, then discard the sessions and the buffer. Nothing is
    /// inserted into the main history. No-op when no session is open or
    /// the buffer is empty.
    pub fn rollback_sessions(&self) -> Result<(), HistoryError> {
        let mut sessions = self.sessions.borrow_mut();
        if !sessions.any_open() || sessions.buffer_len() == 0 {
            return Ok(());
        }
        let buffered = sessions.take_for_rollback();
        drop(sessions);
        tracing::debug!(items = buffered.len(), "rolling back open sessions");

        self.replaying.set(true);
        let mut outcome = Ok(());
        for mut item in buffered.into_iter().rev() {
            if let Err(e) = item.undo() {
                outcome = Err(HistoryError::Item(e));
                break;
            }
        }
        self.replaying.set(false);
        outcome
    }

    // ========================================================================
    // Lifecycle and configuration
    // ========================================================================

    /// Re-allow `insert`/`undo`/`redo` after [`disable`](Self::disable).
    pub fn enable(&self) {
        self.enabled.set(true);
    }

    /// Turn `insert`/`undo`/`redo` into silent no-ops until re-enabled.
    pub fn disable(&self) {
        self.enabled.set(false);
    }

    /// Empty both stacks and discard all open sessions and buffered items
    /// without executing anything. Configuration and listeners persist.
    pub fn clear(&self) {
        self.undo_stack.borrow_mut().clear();
        self.redo_stack.borrow_mut().clear();
        self.sessions.borrow_mut().discard();
    }

    /// [`clear`](Self::clear), then restore the default configuration.
    /// Listeners persist.
    pub fn reset(&self) {
        self.clear();
        let defaults = HistoryConfig::default();
        self.config.set(defaults);
        self.undo_stack.borrow_mut().apply_limit(defaults.stack_limit);
        self.redo_stack.borrow_mut().apply_limit(defaults.stack_limit);
    }

    /// Apply a partial configuration update.
    ///
    /// The error policy applies first, so a single call that also carries
    /// an invalid limit is judged under its own new policy. A zero limit
    /// is rejected and leaves the current limit untouched; a valid one is
    /// applied to both stacks immediately, truncating from the oldest end.
    pub fn configure(&self, update: ConfigUpdate) -> Result<(), HistoryError> {
        let mut config = self.config.get();
        if let Some(throw) = update.throw_on_error {
            config.throw_on_error = throw;
            self.config.set(config);
        }
        if let Some(limit) = update.stack_limit {
            if limit == 0 {
                return self.report(HistoryError::InvalidStackLimit(limit));
            }
            config.stack_limit = limit;
            self.config.set(config);
            self.undo_stack.borrow_mut().apply_limit(limit);
            self.redo_stack.borrow_mut().apply_limit(limit);
        }
        Ok(())
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Register a listener for an event. Registering the same `Rc` twice
    /// for one event is a no-op; order of first registration is dispatch
    /// order.
    pub fn on(&self, event: HistoryEvent, listener: Listener) {
        self.listeners.borrow_mut().register(event, listener);
    }

    /// Deregister a listener by handle identity. Absence is not an error.
    pub fn off(&self, event: HistoryEvent, listener: &Listener) {
        self.listeners.borrow_mut().deregister(event, listener);
    }

    fn notify(&self, event: HistoryEvent) {
        let depths = self.depths();
        let handlers = self.listeners.borrow().snapshot(event);
        for handler in handlers {
            handler(depths);
        }
    }

    // ========================================================================
    // Info
    // ========================================================================

    /// Check whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.borrow().is_empty()
    }

    /// Check whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.borrow().is_empty()
    }

    /// Items currently on the undo stack.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.borrow().len()
    }

    /// Items currently on the redo stack.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.borrow().len()
    }

    /// Both depths at once, the same snapshot listeners receive.
    #[must_use]
    pub fn depths(&self) -> StackDepths {
        StackDepths {
            undo: self.undo_stack.borrow().len(),
            redo: self.redo_stack.borrow().len(),
        }
    }

    /// Check whether the engine is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Check whether at least one session is open.
    #[must_use]
    pub fn session_open(&self) -> bool {
        self.sessions.borrow().any_open()
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> HistoryConfig {
        self.config.get()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn allowed(&self) -> bool {
        self.enabled.get() && !self.replaying.get()
    }

    /// The single reporting path for rejected operations.
    fn report(&self, err: HistoryError) -> Result<(), HistoryError> {
        if self.config.get().throw_on_error {
            return Err(err);
        }
        tracing::error!(error = %err, "history operation rejected");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
