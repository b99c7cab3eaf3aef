//! Errors reported by machine operations.

use thiserror::Error;

/// Why a lookup-based operation on an [`Fsm`](crate::Fsm) did nothing.
///
/// The boolean-returning operations report the same outcomes as `false`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FsmError {
    #[error("No state registered with id {id}")]
    UnknownState { id: String },

    #[error("No previous state to transition to")]
    NoPreviousState,
}

impl FsmError {
    pub(crate) fn unknown<Q: std::fmt::Debug + ?Sized>(id: &Q) -> Self {
        Self::UnknownState {
            id: format!("{id:?}"),
        }
    }
}
