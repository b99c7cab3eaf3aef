//! Build errors for the machine builder.

use thiserror::Error;

/// Errors that can occur when building a machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("No states defined. Add at least one state with .state(id, state)")]
    NoStates,

    #[error("State {id} was added more than once")]
    DuplicateState { id: String },

    #[error("Initial state {id} is not one of the added states")]
    UnknownInitialState { id: String },
}
