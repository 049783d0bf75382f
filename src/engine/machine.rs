//! The thread-safe state machine.

use crate::core::{StateHistory, TransitionDef, TransitionRecord, TransitionTable};
use crate::engine::callbacks::{Callbacks, Hook, Hooks};
use crate::engine::error::FsmError;
use crate::engine::event::Event;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// State guarded by the state lock. History is updated in the same critical
/// section as the state so the two never disagree.
struct Current {
    state: String,
    history: StateHistory,
}

/// Clears the in-flight flag when the pipeline ends, including on unwind.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A finite state machine driven by named events.
///
/// Queries take a shared read lock on the current state and never wait for
/// callbacks. [`fire`](Self::fire) serializes on a transition mutex, so at
/// most one callback pipeline runs at a time. Share it across threads with
/// `Arc<Fsm>`.
///
/// # Example
///
/// ```rust
/// use turnstile::{Callbacks, Fsm, TransitionDef};
///
/// let fsm = Fsm::new(
///     "closed",
///     vec![
///         TransitionDef::new("open", ["closed"], "open"),
///         TransitionDef::new("close", ["open"], "closed"),
///     ],
///     Callbacks::new(),
/// );
///
/// assert!(fsm.fire("push").is_err());
/// assert_eq!(fsm.fire("open").unwrap(), "open");
/// assert!(fsm.is("open"));
/// ```
pub struct Fsm {
    id: Uuid,
    table: TransitionTable,
    hooks: Hooks,
    current: RwLock<Current>,
    transition: Mutex<()>,
    in_flight: AtomicBool,
}

impl Fsm {
    /// Create a machine in `initial`.
    ///
    /// `initial` does not have to appear in any definition. Callback names
    /// are classified against the table's states and events; names matching
    /// neither are ignored.
    pub fn new<I>(initial: impl Into<String>, definitions: I, callbacks: Callbacks) -> Self
    where
        I: IntoIterator<Item = TransitionDef>,
    {
        Self::with_history(initial, definitions, callbacks, StateHistory::new())
    }

    pub(crate) fn with_history<I>(
        initial: impl Into<String>,
        definitions: I,
        callbacks: Callbacks,
        history: StateHistory,
    ) -> Self
    where
        I: IntoIterator<Item = TransitionDef>,
    {
        let table = TransitionTable::build(definitions);
        let hooks = Hooks::from_callbacks(callbacks, &table);
        let fsm = Self {
            id: Uuid::new_v4(),
            table,
            hooks,
            current: RwLock::new(Current {
                state: initial.into(),
                history,
            }),
            transition: Mutex::new(()),
            in_flight: AtomicBool::new(false),
        };

        tracing::debug!(
            fsm = %fsm.id,
            initial = %fsm.state(),
            transitions = fsm.table.len(),
            callbacks = fsm.hooks.len(),
            "state machine created"
        );

        fsm
    }

    /// Identifier used in log output.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get current state.
    pub fn state(&self) -> String {
        self.current.read().state.clone()
    }

    /// Check if the machine is currently in `state`.
    pub fn is(&self, state: &str) -> bool {
        self.current.read().state == state
    }

    /// Whether a fire would start right away.
    ///
    /// Only checks that no transition is in flight. It does not look at the
    /// table; use [`transitions_from`](Self::transitions_from) for that.
    pub fn can_fire(&self, _event: &str) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    /// Negation of [`can_fire`](Self::can_fire).
    pub fn cannot_fire(&self, event: &str) -> bool {
        !self.can_fire(event)
    }

    /// Every state named in the table. Order is unspecified.
    pub fn all_states(&self) -> HashSet<String> {
        self.table.all_states()
    }

    /// Every event named in the table. Order is unspecified.
    pub fn all_events(&self) -> HashSet<String> {
        self.table.all_events()
    }

    /// Events that have a table entry from `state`.
    pub fn transitions_from(&self, state: &str) -> HashSet<String> {
        self.table.transitions_from(state)
    }

    /// Snapshot of the committed transitions.
    pub fn history(&self) -> StateHistory {
        self.current.read().history.clone()
    }

    /// Fire `event` with no arguments. See [`fire_with`](Self::fire_with).
    pub fn fire(&self, event: &str) -> Result<String, FsmError> {
        self.fire_with(event, Vec::new())
    }

    /// Fire `event`, waiting for any in-flight transition to finish first.
    ///
    /// Callbacks run in this order: before-transition, leave-state, commit,
    /// enter-state, after-transition. A before or leave callback may abort,
    /// in which case nothing is committed and the remaining callbacks are
    /// skipped. Returns the new state.
    pub fn fire_with(&self, event: &str, args: Vec<Value>) -> Result<String, FsmError> {
        let _guard = self.transition.lock();
        self.run(event, args)
    }

    /// Like [`fire`](Self::fire), but fails with
    /// [`FsmError::AlreadyInFlight`] instead of waiting.
    pub fn try_fire(&self, event: &str) -> Result<String, FsmError> {
        self.try_fire_with(event, Vec::new())
    }

    /// Like [`fire_with`](Self::fire_with), but never waits.
    pub fn try_fire_with(&self, event: &str, args: Vec<Value>) -> Result<String, FsmError> {
        let Some(_guard) = self.transition.try_lock() else {
            return Err(FsmError::AlreadyInFlight {
                event: event.to_string(),
            });
        };
        self.run(event, args)
    }

    // Must be called with the transition mutex held.
    fn run(&self, name: &str, args: Vec<Value>) -> Result<String, FsmError> {
        let _in_flight = InFlight::enter(&self.in_flight);

        let from = self.state();
        let Some(entry) = self.table.lookup(name, &from) else {
            tracing::debug!(fsm = %self.id, event = %name, from = %from, "no transition");
            return Err(FsmError::InvalidTransition {
                event: name.to_string(),
                state: from,
            });
        };
        let to = entry.to().to_string();

        let mut event = Event::new(
            self,
            name,
            from.clone(),
            to.clone(),
            Arc::clone(entry.definition()),
            args,
        );

        self.hooks.run(Hook::BeforeTransition, name, &mut event);
        if !event.is_aborted() {
            self.hooks.run(Hook::LeaveState, &from, &mut event);
        }

        if event.is_aborted() {
            let cause = event.take_cause();
            tracing::info!(
                fsm = %self.id,
                event = %name,
                from = %from,
                to = %to,
                cause = ?cause,
                "transition aborted"
            );
            return Err(FsmError::TransitionAborted {
                event: name.to_string(),
                cause,
            });
        }

        {
            let mut current = self.current.write();
            current.state = to.clone();
            current.history.record(TransitionRecord {
                event: name.to_string(),
                from: from.clone(),
                to: to.clone(),
                timestamp: Utc::now(),
            });
        }
        event.mark_committed();
        tracing::debug!(fsm = %self.id, event = %name, from = %from, to = %to, "transition committed");

        self.hooks.run(Hook::EnterState, &to, &mut event);
        self.hooks.run(Hook::AfterTransition, name, &mut event);

        if event.is_async() {
            tracing::debug!(fsm = %self.id, event = %name, "event marked async, completed inline");
        }

        Ok(to)
    }
}

impl fmt::Debug for Fsm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("table", &self.table)
            .field("hooks", &self.hooks)
            .field("in_flight", &self.in_flight.load(Ordering::Acquire))
            .finish()
    }
}
