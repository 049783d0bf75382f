//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{StateHistory, TransitionDef, DEFAULT_HISTORY_LIMIT};
use crate::engine::{Callback, Callbacks, Event, Fsm};
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use turnstile::FsmBuilder;
///
/// let fsm = FsmBuilder::new()
///     .initial("closed")
///     .transition("open", ["closed"], "open")
///     .transition("close", ["open"], "closed")
///     .on("before_open", |event| {
///         if event.args().is_empty() {
///             event.abort_with("a key is required");
///         }
///     })
///     .build()
///     .unwrap();
///
/// assert!(fsm.fire("open").is_err());
/// assert!(fsm.is("closed"));
/// ```
pub struct FsmBuilder {
    initial: Option<String>,
    definitions: Vec<TransitionDef>,
    callbacks: Callbacks,
    history_limit: usize,
}

impl FsmBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            definitions: Vec::new(),
            callbacks: Callbacks::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<String>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Add a transition.
    pub fn transition<N, F, S, T>(mut self, name: N, from: F, to: T) -> Self
    where
        N: Into<String>,
        F: IntoIterator<Item = S>,
        S: Into<String>,
        T: Into<String>,
    {
        self.definitions.push(TransitionDef::new(name, from, to));
        self
    }

    /// Add multiple transitions at once.
    pub fn definitions(mut self, definitions: impl IntoIterator<Item = TransitionDef>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    /// Register a callback under `name`. A later registration under the same
    /// name replaces the earlier one.
    pub fn on<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Event<'_>) + Send + Sync + 'static,
    {
        let callback: Callback = Arc::new(f);
        self.callbacks.insert(name.into(), callback);
        self
    }

    /// Register several prepared callbacks.
    pub fn callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks.extend(callbacks);
        self
    }

    /// Maximum number of history records kept; `0` disables history.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Build the state machine.
    /// Returns an error if the initial state is missing.
    pub fn build(self) -> Result<Fsm, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        Ok(Fsm::with_history(
            initial,
            self.definitions,
            self.callbacks,
            StateHistory::with_limit(self.history_limit),
        ))
    }
}

impl Default for FsmBuilder {
    fn default() -> Self {
        Self::new()
    }
}
