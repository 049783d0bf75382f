//! Transition table construction and lookup.
//!
//! The table is built once from a list of [`TransitionDef`]s and never
//! changes afterwards. Each definition's source states are expanded into one
//! entry per `(event, source)` pair, giving constant-time lookup from the
//! machine's current state.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Declares that event `name`, fired from any state in `from`, moves the
/// machine to `to`.
///
/// Several definitions may share a name as long as they cover different
/// source states. When two definitions claim the same `(name, source)` pair
/// the later one wins.
///
/// # Example
///
/// ```rust
/// use turnstile::TransitionDef;
///
/// let open = TransitionDef::new("open", ["closed"], "open");
/// assert_eq!(open.name, "open");
/// assert_eq!(open.from, vec!["closed".to_string()]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDef {
    /// Event name used to fire this transition
    pub name: String,
    /// States this transition may be fired from
    pub from: Vec<String>,
    /// Destination state
    pub to: String,
}

impl TransitionDef {
    pub fn new<N, F, S, T>(name: N, from: F, to: T) -> Self
    where
        N: Into<String>,
        F: IntoIterator<Item = S>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            from: from.into_iter().map(Into::into).collect(),
            to: to.into(),
        }
    }
}

/// Lookup key of the table: `(event name, source state)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransitionKey {
    pub event: String,
    pub from: String,
}

impl TransitionKey {
    pub fn new(event: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            from: from.into(),
        }
    }
}

/// Destination of a table entry plus the definition it came from.
#[derive(Clone, Debug)]
pub struct TransitionEntry {
    to: String,
    definition: Arc<TransitionDef>,
}

impl TransitionEntry {
    pub fn to(&self) -> &str {
        &self.to
    }

    /// The definition this entry was expanded from.
    pub fn definition(&self) -> &Arc<TransitionDef> {
        &self.definition
    }
}

/// Immutable mapping from [`TransitionKey`] to [`TransitionEntry`].
///
/// Also tracks the derived state and event sets, which are used for
/// enumeration and for classifying callback names.
#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
    entries: HashMap<TransitionKey, TransitionEntry>,
    states: HashSet<String>,
    events: HashSet<String>,
}

impl TransitionTable {
    /// Build a table from definitions.
    ///
    /// Duplicate `(name, source)` pairs are overwritten silently, last
    /// definition wins.
    ///
    /// # Example
    ///
    /// ```rust
    /// use turnstile::core::TransitionTable;
    /// use turnstile::TransitionDef;
    ///
    /// let table = TransitionTable::build(vec![
    ///     TransitionDef::new("open", ["closed"], "open"),
    ///     TransitionDef::new("close", ["open"], "closed"),
    /// ]);
    ///
    /// assert_eq!(table.lookup("open", "closed").map(|e| e.to()), Some("open"));
    /// assert!(table.lookup("open", "open").is_none());
    /// ```
    pub fn build<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = TransitionDef>,
    {
        let mut table = Self::default();

        for def in definitions {
            let def = Arc::new(def);

            for from in &def.from {
                table.states.insert(from.clone());
                table.entries.insert(
                    TransitionKey::new(def.name.clone(), from.clone()),
                    TransitionEntry {
                        to: def.to.clone(),
                        definition: Arc::clone(&def),
                    },
                );
            }

            table.states.insert(def.to.clone());
            table.events.insert(def.name.clone());
        }

        table
    }

    /// Find the entry for firing `event` from `state`.
    ///
    /// `None` means the transition is not valid from this state.
    pub fn lookup(&self, event: &str, state: &str) -> Option<&TransitionEntry> {
        self.entries.get(&TransitionKey::new(event, state))
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.states.contains(state)
    }

    pub fn contains_event(&self, event: &str) -> bool {
        self.events.contains(event)
    }

    /// Every state named as a source or destination. Order is unspecified.
    pub fn all_states(&self) -> HashSet<String> {
        self.states.clone()
    }

    /// Every distinct event name. Order is unspecified.
    pub fn all_events(&self) -> HashSet<String> {
        self.events.clone()
    }

    /// Names of the events that have an entry with `state` as source.
    pub fn transitions_from(&self, state: &str) -> HashSet<String> {
        self.entries
            .keys()
            .filter(|key| key.from == state)
            .map(|key| key.event.clone())
            .collect()
    }

    /// Number of `(event, source)` entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
