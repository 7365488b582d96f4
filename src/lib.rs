#![forbid(unsafe_code)]

//! Bounded undo/redo command history with session grouping.
//!
//! This crate is an in-process history engine for applications that need
//! undo/redo (editors, form wizards, interactive tools). The caller
//! supplies the per-operation undo/redo logic as a [`HistoryItem`]; the
//! engine supplies ordering, grouping, bounding, and notification:
//!
//! - **Dual bounded stacks**: undo and redo, oldest entries evicted past
//!   the configured limit
//! - **Branch handling**: every new insertion clears the redo stack
//! - **Sessions**: nested grouping that compiles a run of operations into
//!   one atomic [`CompositeItem`], with a non-inserting rollback path
//! - **Listeners**: synchronous callbacks after each undo/redo, carrying
//!   the post-operation [`StackDepths`]
//! - **Runtime control**: enable/disable, a re-entrancy gate, and a
//!   throw-vs-log error policy switchable at runtime
//!
//! # Quick start
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use undoable::{FnItem, History};
//!
//! let history = History::new();
//! let value = Rc::new(RefCell::new(0));
//!
//! // The caller applies the operation itself and records how to reverse
//! // and re-apply it.
//! *value.borrow_mut() += 1;
//! let (v1, v2) = (value.clone(), value.clone());
//! history.insert(FnItem::infallible(
//!     move || *v1.borrow_mut() -= 1,
//!     move || *v2.borrow_mut() += 1,
//! ));
//!
//! history.undo().unwrap();
//! assert_eq!(*value.borrow(), 0);
//! history.redo().unwrap();
//! assert_eq!(*value.borrow(), 1);
//! ```
//!
//! # Sessions
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use undoable::{FnItem, History};
//!
//! let history = History::new();
//! let log = Rc::new(RefCell::new(String::new()));
//!
//! let session = history.start_session();
//! for tag in ["a", "b", "c"] {
//!     let l = log.clone();
//!     history.insert(FnItem::infallible(
//!         move || l.borrow_mut().push_str(tag),
//!         || {},
//!     ));
//! }
//! history.close_session(&session).unwrap();
//!
//! // Three buffered operations, one undo step.
//! history.undo().unwrap();
//! assert_eq!(*log.borrow(), "cba");
//! ```
//!
//! # Module structure
//!
//! - [`item`]: the [`HistoryItem`] capability, closure adapter, composite
//! - [`session`]: session handles and grouping semantics
//! - [`event`]: events, depth payload, listener registration
//! - [`config`] / [`error`]: runtime settings and the error surface
//! - [`engine`]: the [`History`] engine tying it all together
//!
//! # Concurrency model
//!
//! Single-threaded and cooperative, on purpose: the engine uses `Rc` and
//! interior mutability so that items and listeners can hold a handle back
//! to it, and a replay gate turns re-entrant calls into silent no-ops.
//! See the [`engine`] module docs for the full story.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod item;
pub mod session;

mod stack;

pub use config::{ConfigUpdate, DEFAULT_STACK_LIMIT, HistoryConfig};
pub use engine::History;
pub use error::HistoryError;
pub use event::{HistoryEvent, Listener, StackDepths};
pub use item::{CompositeItem, FnItem, HistoryItem, ItemError, ItemResult};
pub use session::Session;
