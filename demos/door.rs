//! A door that refuses to open while locked.
//!
//! Run with `RUST_LOG=turnstile=debug cargo run --example door` to see the
//! engine's log output.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use turnstile::{FsmBuilder, FsmError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let locked = Arc::new(AtomicBool::new(true));
    let check = Arc::clone(&locked);

    let door = FsmBuilder::new()
        .initial("closed")
        .transition("open", ["closed"], "open")
        .transition("close", ["open"], "closed")
        .on("before_open", move |event| {
            if check.load(Ordering::SeqCst) {
                event.abort_with("the door is locked");
            }
        })
        .on("enter_state", |event| {
            println!("{} -> {} ({})", event.from(), event.to(), event.name());
        })
        .build()?;

    match door.fire("open") {
        Err(err @ FsmError::TransitionAborted { .. }) => println!("{err}"),
        other => println!("unexpected: {other:?}"),
    }

    locked.store(false, Ordering::SeqCst);
    door.fire("open")?;
    door.fire("close")?;

    println!("can open from {}: {:?}", door.state(), door.transitions_from(&door.state()));
    println!("path: {}", door.history().path().join(" -> "));

    Ok(())
}
