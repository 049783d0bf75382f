//! Tests for a single machine shared between threads and tasks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use turnstile::{FsmBuilder, FsmError, TransitionDef};

const RING: usize = 5;

/// `next` moves s0 -> s1 -> ... -> s4 -> s0, so every fire is valid.
fn ring() -> Vec<TransitionDef> {
    (0..RING)
        .map(|i| TransitionDef::new("next", [format!("s{i}")], format!("s{}", (i + 1) % RING)))
        .collect()
}

#[test]
fn concurrent_fires_serialize_without_lost_updates() {
    const THREADS: usize = 8;
    const FIRES: usize = 25;

    let entered = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&entered);

    let fsm = Arc::new(
        FsmBuilder::new()
            .initial("s0")
            .definitions(ring())
            .on("enter_state", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .history_limit(THREADS * FIRES)
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let fsm = Arc::clone(&fsm);
            thread::spawn(move || {
                for _ in 0..FIRES {
                    fsm.fire("next").unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let total = THREADS * FIRES;
    assert_eq!(entered.load(Ordering::SeqCst), total);
    assert_eq!(fsm.state(), format!("s{}", total % RING));

    let history = fsm.history();
    assert_eq!(history.len(), total);
    let records: Vec<_> = history.transitions().collect();
    for pair in records.windows(2) {
        assert_eq!(pair[0].to, pair[1].from);
    }
}

#[test]
fn queries_do_not_wait_for_callbacks() {
    let (entered_tx, entered_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let entered_tx = Mutex::new(entered_tx);
    let release_rx = Mutex::new(release_rx);

    let fsm = Arc::new(
        FsmBuilder::new()
            .initial("closed")
            .transition("open", ["closed"], "open")
            .on("leave_closed", move |_| {
                entered_tx.lock().unwrap().send(()).unwrap();
                release_rx.lock().unwrap().recv().unwrap();
            })
            .build()
            .unwrap(),
    );

    let firing = {
        let fsm = Arc::clone(&fsm);
        thread::spawn(move || fsm.fire("open"))
    };

    entered_rx.recv().unwrap();
    assert_eq!(fsm.state(), "closed");
    assert!(fsm.cannot_fire("open"));
    assert!(matches!(
        fsm.try_fire("open"),
        Err(FsmError::AlreadyInFlight { .. })
    ));

    release_tx.send(()).unwrap();
    assert_eq!(firing.join().unwrap().unwrap(), "open");
    assert_eq!(fsm.state(), "open");
    assert!(fsm.can_fire("close"));
}

#[test]
fn panicking_callback_leaves_machine_usable() {
    let fsm = Arc::new(
        FsmBuilder::new()
            .initial("closed")
            .transition("open", ["closed"], "open")
            .on("before_open", |event| {
                if event.args().is_empty() {
                    panic!("callback failure");
                }
            })
            .build()
            .unwrap(),
    );

    let result = {
        let fsm = Arc::clone(&fsm);
        thread::spawn(move || fsm.fire("open")).join()
    };
    assert!(result.is_err());

    assert_eq!(fsm.state(), "closed");
    assert!(fsm.can_fire("open"));
    assert_eq!(
        fsm.fire_with("open", vec![serde_json::json!("key")]).unwrap(),
        "open"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_machine_across_tasks() {
    const TASKS: usize = 16;

    let fsm = Arc::new(
        FsmBuilder::new()
            .initial("s0")
            .definitions(ring())
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let fsm = Arc::clone(&fsm);
            tokio::spawn(async move { fsm.fire("next") })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    assert_eq!(fsm.state(), format!("s{}", TASKS % RING));
    assert_eq!(fsm.history().len(), TASKS);
}
