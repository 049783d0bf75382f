//! The per-fire event handed to callbacks.

use crate::core::TransitionDef;
use crate::engine::machine::Fsm;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Boxed error used as an abort cause.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A single transition attempt as seen by callbacks.
///
/// A fresh `Event` is created for every call to [`Fsm::fire`] and dropped
/// when the pipeline finishes. Callbacks receive it by exclusive reference
/// and may only flag it (abort, async), never touch engine state.
pub struct Event<'a> {
    fsm: &'a Fsm,
    name: String,
    from: String,
    to: String,
    definition: Arc<TransitionDef>,
    args: Vec<Value>,
    aborted: bool,
    cause: Option<BoxError>,
    is_async: bool,
    committed: bool,
}

impl<'a> Event<'a> {
    pub(crate) fn new(
        fsm: &'a Fsm,
        name: &str,
        from: String,
        to: String,
        definition: Arc<TransitionDef>,
        args: Vec<Value>,
    ) -> Self {
        Self {
            fsm,
            name: name.to_string(),
            from,
            to,
            definition,
            args,
            aborted: false,
            cause: None,
            is_async: false,
            committed: false,
        }
    }

    /// The machine this event is running on.
    ///
    /// Query methods are safe to call from a callback. Calling
    /// [`Fsm::fire`] on the same machine deadlocks.
    pub fn fsm(&self) -> &'a Fsm {
        self.fsm
    }

    /// Name of the fired event.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// State the machine is leaving.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// State the machine is entering.
    pub fn to(&self) -> &str {
        &self.to
    }

    /// The definition whose table entry matched this event.
    pub fn definition(&self) -> &TransitionDef {
        &self.definition
    }

    /// Arguments passed to [`Fsm::fire_with`].
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Reject the transition without a cause.
    ///
    /// Only effective from before-transition and leave-state callbacks. Once
    /// the state has been committed the request is ignored.
    pub fn abort(&mut self) {
        self.set_abort(None);
    }

    /// Reject the transition, recording `cause`.
    ///
    /// Calling it again replaces the previously recorded cause.
    pub fn abort_with(&mut self, cause: impl Into<BoxError>) {
        self.set_abort(Some(cause.into()));
    }

    fn set_abort(&mut self, cause: Option<BoxError>) {
        if self.committed {
            tracing::warn!(
                fsm = %self.fsm.id(),
                event = %self.name,
                "abort requested after commit, ignoring"
            );
            return;
        }
        self.aborted = true;
        self.cause = cause;
    }

    /// Whether a callback has aborted the transition.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Flag the event as asynchronous.
    ///
    /// This records intent only. The engine still commits synchronously.
    pub fn mark_async(&mut self) {
        self.is_async = true;
    }

    /// Whether a callback has marked the event asynchronous.
    pub fn is_async(&self) -> bool {
        self.is_async
    }

    pub(crate) fn mark_committed(&mut self) {
        self.committed = true;
    }

    pub(crate) fn take_cause(&mut self) -> Option<BoxError> {
        self.cause.take()
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("fsm", &self.fsm.id())
            .field("name", &self.name)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("args", &self.args)
            .field("aborted", &self.aborted)
            .field("is_async", &self.is_async)
            .finish()
    }
}
