//! Minimal Machine
//!
//! This example drives a machine holding two different state types.
//!
//! Key concepts:
//! - Boxed states of different types share one update payload
//! - `set_current_state` picks the initial state without hooks
//! - `transition_to` runs `on_exit` then `on_enter`
//!
//! Run with: RUST_LOG=fsmkit=debug cargo run --example minimal

use fsmkit::{BoxedFsm, FsmBuilder, State};
use tracing_subscriber::prelude::*;

struct Idle;

impl State for Idle {
    type Data = u32;

    fn on_enter(&mut self) {
        println!("Idle: on_enter");
    }

    fn on_exit(&mut self) {
        println!("Idle: on_exit");
    }

    fn update(&mut self, delta_ms: u32) {
        println!("Idle: {delta_ms}");
    }
}

struct Moving {
    travelled: u32,
}

impl State for Moving {
    type Data = u32;

    fn on_enter(&mut self) {
        println!("Moving: on_enter");
    }

    fn on_exit(&mut self) {
        println!("Moving: on_exit after {} ms", self.travelled);
    }

    fn update(&mut self, delta_ms: u32) {
        self.travelled += delta_ms;
        println!("Moving: {delta_ms}");
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Minimal Machine Example ===\n");

    let mut fsm: BoxedFsm<&str, u32> = FsmBuilder::new()
        .state("idle", Box::new(Idle) as Box<dyn State<Data = u32>>)
        .state("moving", Box::new(Moving { travelled: 0 }))
        .state("idle-again", Box::new(Idle))
        .initial("idle")
        .history(16)
        .build()
        .expect("states are unique and the initial state exists");

    // Only the current state receives updates
    fsm.update(10);

    fsm.transition_to("moving");
    fsm.update(10);
    fsm.update(15);

    fsm.transition_to("idle-again");
    fsm.update(10);

    if let Some(id) = fsm.current_state_id() {
        println!("Current state: {id}");
    }

    if let Some(history) = fsm.history() {
        let path: Vec<_> = history.path().into_iter().copied().collect();
        println!("Path: {}", path.join(" -> "));
    }

    println!("\n=== Example Complete ===");
}
