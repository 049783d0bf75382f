//! Errors returned by [`Fsm::fire`](crate::Fsm::fire).

use crate::engine::event::BoxError;
use thiserror::Error;

/// Errors that can occur when firing a transition.
///
/// Every variant leaves the machine in the state it was in before the call.
#[derive(Debug, Error)]
pub enum FsmError {
    #[error("event '{event}' is not valid from state '{state}'")]
    InvalidTransition { event: String, state: String },

    #[error("transition '{event}' aborted{}", describe(.cause))]
    TransitionAborted {
        event: String,
        #[source]
        cause: Option<BoxError>,
    },

    #[error("transition '{event}' rejected: another transition is in flight")]
    AlreadyInFlight { event: String },
}

fn describe(cause: &Option<BoxError>) -> String {
    match cause {
        Some(cause) => format!(": {cause}"),
        None => String::new(),
    }
}

impl FsmError {
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::TransitionAborted { .. })
    }

    /// Name of the event whose fire failed.
    pub fn event(&self) -> &str {
        match self {
            Self::InvalidTransition { event, .. }
            | Self::TransitionAborted { event, .. }
            | Self::AlreadyInFlight { event } => event,
        }
    }
}
