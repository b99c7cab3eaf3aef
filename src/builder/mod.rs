//! Builder API for ergonomic machine construction.
//!
//! This module provides a fluent builder and the `state_ids!` macro for
//! creating machines with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::FsmBuilder;
