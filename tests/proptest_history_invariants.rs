#![forbid(unsafe_code)]

//! Property tests for the history engine invariants.
//!
//! Validates:
//! - N undos then N redos replay the same effects, reversed then
//!   re-forwarded (round-trip law).
//! - Neither stack ever exceeds the configured limit, across arbitrary
//!   operation sequences including runtime reconfiguration.
//! - An insert always leaves the redo stack empty.
//! - Undo/redo while a session is open never mutates either stack.

use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use undoable::{ConfigUpdate, FnItem, History};

// ============================================================================
// Strategy helpers
// ============================================================================

/// Operations that can be driven against a [`History`].
#[derive(Debug, Clone)]
enum Op {
    Insert,
    Undo,
    Redo,
    Clear,
    SetLimit(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Insert),
        3 => Just(Op::Undo),
        3 => Just(Op::Redo),
        1 => Just(Op::Clear),
        1 => (1usize..=8).prop_map(Op::SetLimit),
    ]
}

fn ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 1..=max_len)
}

fn noop_item() -> FnItem {
    FnItem::infallible(|| {}, || {})
}

fn apply(history: &History, op: &Op) {
    match op {
        Op::Insert => history.insert(noop_item()),
        Op::Undo => history.undo().unwrap(),
        Op::Redo => history.redo().unwrap(),
        Op::Clear => history.clear(),
        Op::SetLimit(limit) => history
            .configure(ConfigUpdate::new().with_stack_limit(*limit))
            .unwrap(),
    }
}

// ============================================================================
// Invariant 1: round-trip law
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn undo_then_redo_replays_reversed_then_forward(
        count in 1usize..16,
        steps in 1usize..16,
    ) {
        let steps = steps.min(count);
        let history = History::new();
        history.configure(ConfigUpdate::new().with_stack_limit(64)).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..count {
            let u = log.clone();
            let r = log.clone();
            history.insert(FnItem::infallible(
                move || u.borrow_mut().push(("undo", i)),
                move || r.borrow_mut().push(("redo", i)),
            ));
        }

        for _ in 0..steps {
            history.undo().unwrap();
        }
        for _ in 0..steps {
            history.redo().unwrap();
        }

        let mut expected = Vec::new();
        for i in (count - steps..count).rev() {
            expected.push(("undo", i));
        }
        for i in count - steps..count {
            expected.push(("redo", i));
        }
        prop_assert_eq!(log.borrow().clone(), expected);
        prop_assert_eq!(history.undo_depth(), count);
        prop_assert_eq!(history.redo_depth(), 0);
    }
}

// ============================================================================
// Invariant 2: stack depths never exceed the limit
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn depths_never_exceed_the_configured_limit(ops in ops_strategy(60)) {
        let history = History::new();
        for op in &ops {
            apply(&history, op);
            let limit = history.config().stack_limit;
            prop_assert!(history.undo_depth() <= limit);
            prop_assert!(history.redo_depth() <= limit);
        }
    }
}

// ============================================================================
// Invariant 3: insert clears the redo future
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn insert_always_leaves_redo_empty(ops in ops_strategy(40)) {
        let history = History::new();
        for op in &ops {
            apply(&history, op);
        }
        history.insert(noop_item());
        prop_assert!(!history.can_redo());
        prop_assert_eq!(history.redo_depth(), 0);
    }
}

// ============================================================================
// Invariant 4: an open session freezes both stacks
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn open_session_blocks_stack_mutation(
        setup in ops_strategy(30),
        attempts in 1usize..8,
    ) {
        let history = History::new();
        for op in &setup {
            apply(&history, op);
        }

        let session = history.start_session();
        let before = history.depths();
        for _ in 0..attempts {
            // Default policy: rejected, logged, no effect.
            history.undo().unwrap();
            history.redo().unwrap();
            prop_assert_eq!(history.depths(), before);
        }
        history.close_session(&session).unwrap();
    }
}
