//! Declarative machine definitions.
//!
//! The transition table and initial state can live in configuration. The
//! callbacks cannot; attach them on the builder returned by
//! [`MachineDefinition::into_builder`].

use crate::builder::error::BuildError;
use crate::builder::machine::FsmBuilder;
use crate::core::TransitionDef;
use serde::{Deserialize, Serialize};

/// Serializable description of a machine.
///
/// # Example
///
/// ```rust
/// use turnstile::builder::MachineDefinition;
///
/// let definition = MachineDefinition::from_json(r#"{
///     "initial": "closed",
///     "transitions": [
///         { "name": "open", "from": ["closed"], "to": "open" },
///         { "name": "close", "from": ["open"], "to": "closed" }
///     ]
/// }"#).unwrap();
///
/// let fsm = definition.into_builder().build().unwrap();
/// assert_eq!(fsm.fire("open").unwrap(), "open");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineDefinition {
    pub initial: String,
    #[serde(default)]
    pub transitions: Vec<TransitionDef>,
    /// Maximum retained history records; the default limit when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,
}

impl MachineDefinition {
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A builder preloaded with this definition.
    pub fn into_builder(self) -> FsmBuilder {
        let builder = FsmBuilder::new()
            .initial(self.initial)
            .definitions(self.transitions);
        match self.history_limit {
            Some(limit) => builder.history_limit(limit),
            None => builder,
        }
    }
}
