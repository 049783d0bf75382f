//! Build errors for the machine builder and definition loading.

use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Invalid machine definition: {0}")]
    InvalidDefinition(#[from] serde_json::Error),
}
