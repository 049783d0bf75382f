//! Bounded history of committed transitions.
//!
//! The engine appends one [`TransitionRecord`] per commit, inside the same
//! write-locked section that updates the current state, so a snapshot of the
//! history always ends at the state readers can observe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Number of records kept when no explicit limit is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use turnstile::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     event: "open".to_string(),
///     from: "closed".to_string(),
///     to: "open".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, "open");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The event that was fired
    pub event: String,
    /// The state being transitioned from
    pub from: String,
    /// The state being transitioned to
    pub to: String,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of committed transitions.
///
/// Once `limit` records are held, recording a new one evicts the oldest.
/// A limit of zero disables recording entirely.
///
/// # Example
///
/// ```rust
/// use turnstile::core::{StateHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_limit(8);
/// history.record(TransitionRecord {
///     event: "open".to_string(),
///     from: "closed".to_string(),
///     to: "open".to_string(),
///     timestamp: Utc::now(),
/// });
/// history.record(TransitionRecord {
///     event: "close".to_string(),
///     from: "open".to_string(),
///     to: "closed".to_string(),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.path(), vec!["closed", "open", "closed"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory {
    limit: usize,
    transitions: VecDeque<TransitionRecord>,
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHistory {
    /// Create an empty history holding up to [`DEFAULT_HISTORY_LIMIT`] records.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            transitions: VecDeque::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, transition: TransitionRecord) {
        if self.limit == 0 {
            return;
        }
        while self.transitions.len() >= self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// States traversed, oldest first: the source of the first retained
    /// record, then the destination of every record.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from.as_str());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Time between the first and last retained records.
    ///
    /// `None` when the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.transitions.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
