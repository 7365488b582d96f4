#![forbid(unsafe_code)]

//! Engine configuration.

/// Stack limit a fresh engine starts with.
pub const DEFAULT_STACK_LIMIT: usize = 20;

/// Runtime settings of a [`History`](crate::History) engine.
///
/// Persists across [`clear`](crate::History::clear); restored to defaults
/// by [`reset`](crate::History::reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of items either stack retains. The oldest entries
    /// are evicted once the limit is exceeded.
    pub stack_limit: usize,
    /// When true, rejected operations return `Err` to the caller; when
    /// false they are logged and the call returns normally with no effect.
    pub throw_on_error: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            stack_limit: DEFAULT_STACK_LIMIT,
            throw_on_error: false,
        }
    }
}

/// Partial update for [`History::configure`](crate::History::configure).
/// Unset fields leave the current value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    /// New stack limit; must be nonzero.
    pub stack_limit: Option<usize>,
    /// New error policy.
    pub throw_on_error: Option<bool>,
}

impl ConfigUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stack limit.
    #[must_use]
    pub fn with_stack_limit(mut self, limit: usize) -> Self {
        self.stack_limit = Some(limit);
        self
    }

    /// Set the error policy.
    #[must_use]
    pub fn with_throw_on_error(mut self, throw: bool) -> Self {
        self.throw_on_error = Some(throw);
        self
    }
}
