//! Fsmkit: a finite state machine container
//!
//! An [`Fsm`] owns a set of states keyed by id, keeps at most one of
//! them current, and remembers the one that was current before. Transitions
//! run `on_exit` on the old state and `on_enter` on the new one; updates are
//! forwarded to the current state only.
//!
//! # Core Concepts
//!
//! - **State**: anything implementing the [`State`] trait
//! - **Fsm**: the registry plus current/previous tracking
//! - **History**: optional bounded log of state changes
//!
//! Operations that look up an id never panic on a miss. They return `false`
//! (or an [`FsmError`] from the `try_*` variants) and leave the machine as it
//! was, so a machine can be driven from data such as a transition table read
//! from configuration.
//!
//! # Example
//!
//! ```rust
//! use fsmkit::{BoxedFsm, State};
//!
//! struct Wander;
//! struct Attack {
//!     swings: u32,
//! }
//!
//! impl State for Wander {
//!     type Data = f32;
//!
//!     fn update(&mut self, _dt: f32) {}
//! }
//!
//! impl State for Attack {
//!     type Data = f32;
//!
//!     fn on_enter(&mut self) {
//!         self.swings = 0;
//!     }
//!
//!     fn update(&mut self, _dt: f32) {
//!         self.swings += 1;
//!     }
//! }
//!
//! let mut fsm: BoxedFsm<&str, f32> = BoxedFsm::new();
//! fsm.add_state("wander", Box::new(Wander));
//! fsm.add_state("attack", Box::new(Attack { swings: 9 }));
//!
//! fsm.set_current_state("wander");
//! fsm.update(0.016);
//!
//! fsm.transition_to("attack");
//! fsm.update(0.016);
//!
//! assert_eq!(fsm.current_state_id(), Some(&"attack"));
//! assert_eq!(fsm.previous_state_id(), Some(&"wander"));
//! ```

pub mod builder;
pub mod core;
pub mod error;

// Re-export commonly used types
pub use builder::{BuildError, FsmBuilder};
pub use core::{BoxedFsm, ChangeKind, Fsm, HistoryConfig, State, StateChange, StateHistory};
pub use error::FsmError;
