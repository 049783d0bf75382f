//! Turnstile: an embeddable finite state machine
//!
//! A machine is built from an initial state, a table of named transitions
//! and a map of lifecycle callbacks. It tracks the current state, rejects
//! events that have no entry for that state, and runs callbacks around every
//! committed transition. One machine can be shared by many threads.
//!
//! # Core Concepts
//!
//! - **Transition**: A named edge from one or more source states to a single
//!   destination
//! - **Fire**: An attempt to execute a transition from the current state
//! - **Callbacks**: Before-transition and leave-state callbacks may abort;
//!   enter-state and after-transition callbacks run after the commit
//!
//! # Example
//!
//! ```rust
//! use turnstile::{FsmBuilder, FsmError};
//!
//! let fsm = FsmBuilder::new()
//!     .initial("closed")
//!     .transition("open", ["closed"], "open")
//!     .transition("close", ["open"], "closed")
//!     .on("leave_closed", |event| {
//!         println!("leaving {} via {}", event.from(), event.name());
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert!(matches!(
//!     fsm.fire("push"),
//!     Err(FsmError::InvalidTransition { .. })
//! ));
//! assert_eq!(fsm.fire("open").unwrap(), "open");
//! assert!(fsm.fire("open").is_err());
//! assert_eq!(fsm.state(), "open");
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use crate::builder::{BuildError, FsmBuilder, MachineDefinition};
pub use crate::core::{StateHistory, TransitionDef, TransitionRecord};
pub use crate::engine::{callback, Callback, Callbacks, Event, Fsm, FsmError};
