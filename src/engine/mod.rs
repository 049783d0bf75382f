//! The transition engine.
//!
//! # Key Concepts
//!
//! - **Fsm**: Owns the current state, the table and the callbacks
//! - **Event**: Per-fire value passed to callbacks, which may abort it
//! - **Hooks**: Before-transition, leave-state, enter-state and
//!   after-transition, run in that order around the commit
//!
//! # Locking
//!
//! The current state sits behind a `parking_lot::RwLock`; the whole fire
//! pipeline behind a `parking_lot::Mutex`. Queries only take the read lock,
//! so they never wait for callbacks to finish.

mod callbacks;
mod error;
mod event;
mod machine;

pub use callbacks::{
    callback, classify, Binding, Callback, Callbacks, Hook, AFTER_TRANSITION, BEFORE_TRANSITION,
    ENTER_STATE, LEAVE_STATE,
};
pub use error::FsmError;
pub use event::{BoxError, Event};
pub use machine::Fsm;
