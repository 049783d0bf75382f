//! Builder API for ergonomic state machine construction.
//!
//! This module provides a fluent builder, a serializable machine definition
//! and macros for creating state machines with minimal boilerplate.

pub mod definition;
pub mod error;
pub mod machine;
pub mod macros;

pub use definition::MachineDefinition;
pub use error::BuildError;
pub use machine::FsmBuilder;
