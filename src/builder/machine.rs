//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::core::{Fsm, HistoryConfig, State};
use std::fmt::Debug;

/// Builder for constructing an [`Fsm`] with a fluent API.
///
/// Unlike [`Fsm::add_state`], which ignores duplicates, the builder rejects
/// them so a mistyped table of states fails at construction time.
pub struct FsmBuilder<Id, S> {
    states: Vec<(Id, S)>,
    initial: Option<Id>,
    history: Option<HistoryConfig>,
}

impl<Id, S> FsmBuilder<Id, S>
where
    Id: Ord + Clone + Debug,
    S: State,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            initial: None,
            history: None,
        }
    }

    /// Register a state.
    pub fn state(mut self, id: Id, state: S) -> Self {
        self.states.push((id, state));
        self
    }

    /// Register several states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = (Id, S)>) -> Self {
        self.states.extend(states);
        self
    }

    /// Set the initial current state. It is selected silently, without
    /// calling `on_enter`.
    pub fn initial(mut self, id: Id) -> Self {
        self.initial = Some(id);
        self
    }

    /// Record state changes, keeping at most `capacity` of them.
    pub fn history(self, capacity: usize) -> Self {
        self.history_config(HistoryConfig { capacity })
    }

    pub fn history_config(mut self, config: HistoryConfig) -> Self {
        self.history = Some(config);
        self
    }

    /// Build the machine.
    /// Returns an error if no state was added, an id repeats, or the initial
    /// state is unknown.
    pub fn build(self) -> Result<Fsm<Id, S>, BuildError> {
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let mut fsm = match self.history {
            Some(config) => Fsm::with_history(config),
            None => Fsm::new(),
        };

        for (id, state) in self.states {
            if fsm.has_state(&id) {
                return Err(BuildError::DuplicateState {
                    id: format!("{id:?}"),
                });
            }
            fsm.add_state(id, state);
        }

        if let Some(initial) = self.initial {
            if !fsm.set_current_state(&initial) {
                return Err(BuildError::UnknownInitialState {
                    id: format!("{initial:?}"),
                });
            }
        }

        Ok(fsm)
    }
}

impl<Id, S> Default for FsmBuilder<Id, S>
where
    Id: Ord + Clone + Debug,
    S: State,
{
    fn default() -> Self {
        Self::new()
    }
}
