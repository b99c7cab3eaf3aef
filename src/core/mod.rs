//! Core state machine types and logic.
//!
//! - States via the `State` trait
//! - The `Fsm` container and its transition rules
//! - Bounded history of state changes

mod history;
mod machine;
mod state;

pub use history::{ChangeKind, HistoryConfig, StateChange, StateHistory};
pub use machine::{BoxedFsm, Fsm};
pub use state::State;
