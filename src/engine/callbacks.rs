//! Callback registration and classification.
//!
//! Callers hand the engine a flat map of names to callbacks. At construction
//! every name is classified once against the table's state and event sets:
//!
//! 1. a known state name fires on entering that state,
//! 2. a known event name fires after that event commits,
//! 3. `before_transition`, `leave_state`, `enter_state` and
//!    `after_transition` fire for every transition,
//! 4. `before_<event>`, `leave_<state>`, `enter_<state>` and `after_<event>`
//!    bind to the named event or state,
//! 5. anything else is ignored.
//!
//! When a bare name and its prefixed form (`opened` and `enter_opened`) bind
//! the same hook, the prefixed form is kept.

use crate::core::TransitionTable;
use crate::engine::event::Event;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A lifecycle callback.
pub type Callback = Arc<dyn Fn(&mut Event<'_>) + Send + Sync>;

/// Callbacks keyed by state name, event name or hook name.
pub type Callbacks = HashMap<String, Callback>;

pub const BEFORE_TRANSITION: &str = "before_transition";
pub const LEAVE_STATE: &str = "leave_state";
pub const ENTER_STATE: &str = "enter_state";
pub const AFTER_TRANSITION: &str = "after_transition";

/// Wrap a closure as a [`Callback`].
///
/// # Example
///
/// ```rust
/// use turnstile::engine::{callback, Callbacks};
///
/// let mut callbacks = Callbacks::new();
/// callbacks.insert(
///     "before_open".to_string(),
///     callback(|event| {
///         if event.args().is_empty() {
///             event.abort_with("a key is required");
///         }
///     }),
/// );
/// ```
pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&mut Event<'_>) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Points in the fire pipeline where callbacks run, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeTransition,
    LeaveState,
    EnterState,
    AfterTransition,
}

impl Hook {
    /// Whether callbacks at this point run before the commit and may abort.
    pub fn can_abort(self) -> bool {
        matches!(self, Self::BeforeTransition | Self::LeaveState)
    }

    fn generic_name(self) -> &'static str {
        match self {
            Self::BeforeTransition => BEFORE_TRANSITION,
            Self::LeaveState => LEAVE_STATE,
            Self::EnterState => ENTER_STATE,
            Self::AfterTransition => AFTER_TRANSITION,
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.generic_name())
    }
}

/// Where a callback name was bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub hook: Hook,
    /// State or event the callback is bound to; `None` for a generic hook.
    pub target: Option<String>,
}

impl Binding {
    fn specific(hook: Hook, target: &str) -> Self {
        Self {
            hook,
            target: Some(target.to_string()),
        }
    }

    fn generic(hook: Hook) -> Self {
        Self { hook, target: None }
    }
}

/// Classify a callback name against a table. `None` means unrecognized.
pub fn classify(key: &str, table: &TransitionTable) -> Option<Binding> {
    if table.contains_state(key) {
        return Some(Binding::specific(Hook::EnterState, key));
    }
    if table.contains_event(key) {
        return Some(Binding::specific(Hook::AfterTransition, key));
    }

    for hook in [
        Hook::BeforeTransition,
        Hook::LeaveState,
        Hook::EnterState,
        Hook::AfterTransition,
    ] {
        if key == hook.generic_name() {
            return Some(Binding::generic(hook));
        }
    }

    let prefixed = [
        ("before_", Hook::BeforeTransition),
        ("leave_", Hook::LeaveState),
        ("enter_", Hook::EnterState),
        ("after_", Hook::AfterTransition),
    ];
    for (prefix, hook) in prefixed {
        let Some(target) = key.strip_prefix(prefix) else {
            continue;
        };
        let known = match hook {
            Hook::BeforeTransition | Hook::AfterTransition => table.contains_event(target),
            Hook::LeaveState | Hook::EnterState => table.contains_state(target),
        };
        if known {
            return Some(Binding::specific(hook, target));
        }
    }

    None
}

/// Callbacks sorted into explicit per-hook maps.
#[derive(Clone, Default)]
pub(crate) struct Hooks {
    specific: HashMap<Hook, HashMap<String, Callback>>,
    generic: HashMap<Hook, Callback>,
}

impl Hooks {
    pub(crate) fn from_callbacks(callbacks: Callbacks, table: &TransitionTable) -> Self {
        let mut hooks = Self::default();
        // key that currently owns each specific slot
        let mut owners: HashMap<(Hook, String), String> = HashMap::new();

        for (key, callback) in callbacks {
            match classify(&key, table) {
                Some(Binding {
                    hook,
                    target: Some(target),
                }) => {
                    let slot = (hook, target.clone());
                    if let Some(owner) = owners.get(&slot) {
                        // prefixed names (`enter_x`) outrank bare ones (`x`)
                        let keep_existing = *owner != target;
                        let (kept, dropped) = if keep_existing {
                            (owner.as_str(), key.as_str())
                        } else {
                            (key.as_str(), owner.as_str())
                        };
                        tracing::warn!(
                            hook = %hook,
                            target = %target,
                            kept,
                            dropped,
                            "two callback names bind the same hook"
                        );
                        if keep_existing {
                            continue;
                        }
                    }
                    owners.insert(slot, key);
                    hooks
                        .specific
                        .entry(hook)
                        .or_default()
                        .insert(target, callback);
                }
                Some(Binding { hook, target: None }) => {
                    hooks.generic.insert(hook, callback);
                }
                None => {
                    tracing::debug!(callback = %key, "ignoring unrecognized callback name");
                }
            }
        }

        hooks
    }

    /// Run the callbacks registered at `hook` for `target`, specific first.
    ///
    /// Before the commit, an abort from the specific callback skips the
    /// generic one.
    pub(crate) fn run(&self, hook: Hook, target: &str, event: &mut Event<'_>) {
        if let Some(callback) = self.specific.get(&hook).and_then(|m| m.get(target)) {
            callback(event);
        }
        if hook.can_abort() && event.is_aborted() {
            return;
        }
        if let Some(callback) = self.generic.get(&hook) {
            callback(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.specific.values().map(HashMap::len).sum::<usize>() + self.generic.len()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bindings: Vec<String> = self
            .specific
            .iter()
            .flat_map(|(hook, targets)| targets.keys().map(move |t| format!("{hook}:{t}")))
            .chain(self.generic.keys().map(|hook| hook.to_string()))
            .collect();
        bindings.sort();
        f.debug_struct("Hooks").field("bindings", &bindings).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransitionDef;

    fn table() -> TransitionTable {
        TransitionTable::build(vec![
            TransitionDef::new("open", ["closed"], "opened"),
            TransitionDef::new("close", ["opened"], "closed"),
        ])
    }

    #[test]
    fn state_names_bind_to_enter() {
        assert_eq!(
            classify("opened", &table()),
            Some(Binding::specific(Hook::EnterState, "opened"))
        );
    }

    #[test]
    fn event_names_bind_to_after() {
        assert_eq!(
            classify("open", &table()),
            Some(Binding::specific(Hook::AfterTransition, "open"))
        );
    }

    #[test]
    fn state_wins_when_name_is_both() {
        let table = TransitionTable::build(vec![TransitionDef::new("open", ["closed"], "open")]);
        assert_eq!(
            classify("open", &table),
            Some(Binding::specific(Hook::EnterState, "open"))
        );
    }

    #[test]
    fn generic_names_bind_to_every_transition() {
        let table = table();
        assert_eq!(
            classify("before_transition", &table),
            Some(Binding::generic(Hook::BeforeTransition))
        );
        assert_eq!(
            classify("leave_state", &table),
            Some(Binding::generic(Hook::LeaveState))
        );
        assert_eq!(
            classify("enter_state", &table),
            Some(Binding::generic(Hook::EnterState))
        );
        assert_eq!(
            classify("after_transition", &table),
            Some(Binding::generic(Hook::AfterTransition))
        );
    }

    #[test]
    fn prefixed_names_bind_to_target() {
        let table = table();
        assert_eq!(
            classify("before_open", &table),
            Some(Binding::specific(Hook::BeforeTransition, "open"))
        );
        assert_eq!(
            classify("leave_closed", &table),
            Some(Binding::specific(Hook::LeaveState, "closed"))
        );
        assert_eq!(
            classify("enter_opened", &table),
            Some(Binding::specific(Hook::EnterState, "opened"))
        );
        assert_eq!(
            classify("after_close", &table),
            Some(Binding::specific(Hook::AfterTransition, "close"))
        );
    }

    #[test]
    fn unknown_names_are_ignored() {
        let table = table();
        assert_eq!(classify("push", &table), None);
        assert_eq!(classify("before_push", &table), None);
        // prefix must match the target's kind
        assert_eq!(classify("leave_open", &table), None);
        assert_eq!(classify("before_closed", &table), None);
    }

    #[test]
    fn from_callbacks_drops_unrecognized() {
        let mut callbacks = Callbacks::new();
        callbacks.insert("opened".to_string(), callback(|_| {}));
        callbacks.insert("after_transition".to_string(), callback(|_| {}));
        callbacks.insert("nonsense".to_string(), callback(|_| {}));

        let hooks = Hooks::from_callbacks(callbacks, &table());
        assert_eq!(hooks.len(), 2);
    }

    #[test]
    fn prefixed_name_wins_over_bare_name() {
        use std::sync::Mutex;

        for _ in 0..64 {
            let seen = Arc::new(Mutex::new(Vec::new()));
            let push = |label: &'static str| {
                let seen = Arc::clone(&seen);
                callback(move |_| seen.lock().unwrap().push(label))
            };

            let mut callbacks = Callbacks::new();
            callbacks.insert("opened".to_string(), push("opened"));
            callbacks.insert("enter_opened".to_string(), push("enter_opened"));
            callbacks.insert("open".to_string(), push("open"));
            callbacks.insert("after_open".to_string(), push("after_open"));

            let fsm = crate::engine::Fsm::new("closed", table_defs(), callbacks);
            fsm.fire("open").unwrap();

            assert_eq!(*seen.lock().unwrap(), vec!["enter_opened", "after_open"]);
        }
    }

    fn table_defs() -> Vec<TransitionDef> {
        vec![
            TransitionDef::new("open", ["closed"], "opened"),
            TransitionDef::new("close", ["opened"], "closed"),
        ]
    }

    #[test]
    fn only_pre_commit_hooks_can_abort() {
        assert!(Hook::BeforeTransition.can_abort());
        assert!(Hook::LeaveState.can_abort());
        assert!(!Hook::EnterState.can_abort());
        assert!(!Hook::AfterTransition.can_abort());
    }
}
