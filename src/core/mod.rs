//! Core data types of the state machine.
//!
//! This module holds the pieces that involve no locking or callbacks:
//! - Transition definitions and the lookup table built from them
//! - The bounded history of committed transitions

mod history;
mod table;

pub use history::{StateHistory, TransitionRecord, DEFAULT_HISTORY_LIMIT};
pub use table::{TransitionDef, TransitionEntry, TransitionKey, TransitionTable};
