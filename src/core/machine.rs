//! The finite state machine container.
//!
//! An [`Fsm`] owns a registry of states keyed by id and tracks which one is
//! current and which one was current before it. Current and previous are
//! kept as ids into the registry, so removing a state can never leave either
//! of them dangling: `remove_state` updates them in lockstep with the
//! registry.

use super::history::{ChangeKind, HistoryConfig, StateChange, StateHistory};
use super::state::State;
use crate::error::FsmError;
use chrono::Utc;
use std::borrow::Borrow;
use std::collections::btree_map::{BTreeMap, Entry};
use std::fmt;
use tracing::{debug, trace};

/// Machine holding boxed trait objects, for states of different types.
pub type BoxedFsm<Id, D> = Fsm<Id, Box<dyn State<Data = D>>>;

/// Finite state machine with at most one current state and a memory
/// of the previous one.
///
/// Lookup misses are reported, never fatal: `transition_to`,
/// `set_current_state` and `transition_to_previous_state` return `false`
/// (their `try_*` counterparts return an [`FsmError`]) and leave the machine
/// untouched.
///
/// Hooks run on the state values themselves and only ever see `&mut self` of
/// that state, so a hook cannot call back into the machine that owns it.
///
/// # Example
///
/// ```rust
/// use fsmkit::{Fsm, State};
///
/// struct Light {
///     on: bool,
/// }
///
/// impl State for Light {
///     type Data = ();
///
///     fn on_enter(&mut self) {
///         self.on = true;
///     }
///
///     fn on_exit(&mut self) {
///         self.on = false;
///     }
///
///     fn update(&mut self, _: ()) {}
/// }
///
/// let mut fsm = Fsm::new();
/// fsm.add_state("red", Light { on: false });
/// fsm.add_state("green", Light { on: false });
///
/// assert!(fsm.transition_to("red"));
/// assert!(fsm.transition_to("green"));
/// assert_eq!(fsm.current_state_id(), Some(&"green"));
/// assert_eq!(fsm.previous_state_id(), Some(&"red"));
/// assert!(!fsm.get_state("red").unwrap().on);
///
/// assert!(fsm.transition_to_previous_state());
/// assert_eq!(fsm.current_state_id(), Some(&"red"));
/// assert_eq!(fsm.previous_state_id(), Some(&"green"));
///
/// assert!(!fsm.transition_to("blue"));
/// ```
pub struct Fsm<Id, S> {
    states: BTreeMap<Id, S>,
    current: Option<Id>,
    previous: Option<Id>,
    history: Option<StateHistory<Id>>,
}

impl<Id, S> Fsm<Id, S> {
    /// Create an empty machine with no current state and no history.
    pub fn new() -> Self {
        Self {
            states: BTreeMap::new(),
            current: None,
            previous: None,
            history: None,
        }
    }

    /// Create an empty machine that records its state changes.
    pub fn with_history(config: HistoryConfig) -> Self {
        Self {
            history: Some(StateHistory::new(config)),
            ..Self::new()
        }
    }

    pub fn has_current_state(&self) -> bool {
        self.current.is_some()
    }

    pub fn has_previous_state(&self) -> bool {
        self.previous.is_some()
    }

    pub fn current_state_id(&self) -> Option<&Id> {
        self.current.as_ref()
    }

    pub fn previous_state_id(&self) -> Option<&Id> {
        self.previous.as_ref()
    }

    /// Number of registered states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Ids of all registered states. Callers must not rely on the order.
    pub fn state_ids(&self) -> impl Iterator<Item = &Id> + '_ {
        self.states.keys()
    }

    /// All registered states. Callers must not rely on the order.
    pub fn states(&self) -> impl Iterator<Item = &S> + '_ {
        self.states.values()
    }

    pub fn states_mut(&mut self) -> impl Iterator<Item = &mut S> + '_ {
        self.states.values_mut()
    }

    /// Recorded state changes, when history is enabled.
    pub fn history(&self) -> Option<&StateHistory<Id>> {
        self.history.as_ref()
    }

    /// Start recording state changes, replacing any existing history.
    pub fn enable_history(&mut self, config: HistoryConfig) {
        self.history = Some(StateHistory::new(config));
    }

    pub fn disable_history(&mut self) {
        self.history = None;
    }
}

impl<Id: Ord, S> Fsm<Id, S> {
    pub fn has_state<Q>(&self, id: &Q) -> bool
    where
        Id: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.states.contains_key(id)
    }

    pub fn get_state<Q>(&self, id: &Q) -> Option<&S>
    where
        Id: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.states.get(id)
    }

    pub fn get_state_mut<Q>(&mut self, id: &Q) -> Option<&mut S>
    where
        Id: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.states.get_mut(id)
    }

    pub fn current_state(&self) -> Option<&S> {
        self.states.get(self.current.as_ref()?)
    }

    pub fn current_state_mut(&mut self) -> Option<&mut S> {
        self.states.get_mut(self.current.as_ref()?)
    }

    pub fn previous_state(&self) -> Option<&S> {
        self.states.get(self.previous.as_ref()?)
    }

    pub fn previous_state_mut(&mut self) -> Option<&mut S> {
        self.states.get_mut(self.previous.as_ref()?)
    }
}

impl<Id, S> Fsm<Id, S>
where
    Id: Ord + Clone + fmt::Debug,
    S: State,
{
    /// Register `state` under `id`.
    ///
    /// Returns `false` and drops `state` if `id` is already registered; the
    /// existing entry is left untouched. No hooks are called.
    pub fn add_state(&mut self, id: Id, state: S) -> bool {
        match self.states.entry(id) {
            Entry::Occupied(entry) => {
                debug!(id = ?entry.key(), "state already registered, ignoring");
                false
            }
            Entry::Vacant(entry) => {
                trace!(id = ?entry.key(), "state added");
                entry.insert(state);
                true
            }
        }
    }

    /// Remove and drop the state registered under `id`.
    ///
    /// Returns whether a state was removed. Before removal the tracking is
    /// adjusted:
    /// - removing the current state falls back to the previous state with a
    ///   full exit/enter cycle, after which previous equals current;
    /// - when there is no distinct previous state the current state only
    ///   gets `on_exit`, and current and previous are both cleared;
    /// - removing the previous state (not current) clears previous silently.
    pub fn remove_state<Q>(&mut self, id: &Q) -> bool
    where
        Id: Borrow<Q>,
        Q: Ord + fmt::Debug + ?Sized,
    {
        if slot_holds(&self.current, id) {
            self.exit_current();
            let from = self.current.take();

            if self.previous.is_some() && self.previous != from {
                self.current = self.previous.clone();
                self.enter_current();
                debug!(from = ?from, to = ?self.current, "current state removed, fell back to previous");
                self.previous = self.current.clone();
                self.record(from, self.current.clone(), ChangeKind::RemovalFallback);
            } else {
                debug!(id = ?from, "current state removed, tracking cleared");
                self.previous = None;
                self.record(from, None, ChangeKind::RemovalCleared);
            }
        } else if slot_holds(&self.previous, id) {
            debug!(id = ?id, "previous state removed, clearing previous");
            let removed = self.previous.take();
            self.record(removed, self.current.clone(), ChangeKind::PreviousCleared);
        }

        self.states.remove(id).is_some()
    }

    /// Exit the current state (if any), make it previous, then enter `id`.
    ///
    /// Transitioning to the current state runs the full exit/enter cycle and
    /// leaves the state as its own previous. Returns `false` when `id` is not
    /// registered.
    pub fn transition_to<Q>(&mut self, id: &Q) -> bool
    where
        Id: Borrow<Q>,
        Q: Ord + fmt::Debug + ?Sized,
    {
        self.try_transition_to(id).is_ok()
    }

    pub fn try_transition_to<Q>(&mut self, id: &Q) -> Result<(), FsmError>
    where
        Id: Borrow<Q>,
        Q: Ord + fmt::Debug + ?Sized,
    {
        let target = self.registered_id(id)?;
        self.transition_into(target);
        Ok(())
    }

    /// Transition back to the previous state. Current and previous swap.
    pub fn transition_to_previous_state(&mut self) -> bool {
        self.try_transition_to_previous_state().is_ok()
    }

    pub fn try_transition_to_previous_state(&mut self) -> Result<(), FsmError> {
        let Some(target) = self.previous.clone() else {
            debug!("no previous state to transition to");
            return Err(FsmError::NoPreviousState);
        };
        self.transition_into(target);
        Ok(())
    }

    /// Make `id` current without calling any hooks.
    ///
    /// Meant for picking the initial state or restoring a known state. The
    /// state that was current (if any) becomes previous.
    pub fn set_current_state<Q>(&mut self, id: &Q) -> bool
    where
        Id: Borrow<Q>,
        Q: Ord + fmt::Debug + ?Sized,
    {
        self.try_set_current_state(id).is_ok()
    }

    pub fn try_set_current_state<Q>(&mut self, id: &Q) -> Result<(), FsmError>
    where
        Id: Borrow<Q>,
        Q: Ord + fmt::Debug + ?Sized,
    {
        let target = self.registered_id(id)?;
        let from = self.current.replace(target.clone());
        debug!(from = ?from, to = ?target, "current state set");
        if from.is_some() {
            self.previous = from.clone();
        }
        self.record(from, Some(target), ChangeKind::SetCurrent);
        Ok(())
    }

    /// Forward `data` to the current state. Does nothing without one.
    pub fn update(&mut self, data: S::Data) {
        let Some(id) = self.current.as_ref() else {
            trace!("no current state, update ignored");
            return;
        };
        if let Some(state) = self.states.get_mut(id) {
            trace!(id = ?id, "updating current state");
            state.update(data);
        }
    }

    fn registered_id<Q>(&self, id: &Q) -> Result<Id, FsmError>
    where
        Id: Borrow<Q>,
        Q: Ord + fmt::Debug + ?Sized,
    {
        match self.states.get_key_value(id) {
            Some((key, _)) => Ok(key.clone()),
            None => {
                debug!(id = ?id, "no state registered with this id");
                Err(FsmError::unknown(id))
            }
        }
    }

    fn transition_into(&mut self, target: Id) {
        self.exit_current();
        let from = self.current.replace(target.clone());
        if from.is_some() {
            self.previous = from.clone();
        }
        self.enter_current();
        debug!(from = ?from, to = ?target, "transitioned");
        self.record(from, Some(target), ChangeKind::Transition);
    }

    fn exit_current(&mut self) {
        if let Some(state) = self.current.as_ref().and_then(|id| self.states.get_mut(id)) {
            state.on_exit();
        }
    }

    fn enter_current(&mut self) {
        if let Some(state) = self.current.as_ref().and_then(|id| self.states.get_mut(id)) {
            state.on_enter();
        }
    }

    fn record(&mut self, from: Option<Id>, to: Option<Id>, kind: ChangeKind) {
        if let Some(history) = self.history.as_mut() {
            history.record(StateChange {
                from,
                to,
                kind,
                timestamp: Utc::now(),
            });
        }
    }
}

fn slot_holds<Id, Q>(slot: &Option<Id>, id: &Q) -> bool
where
    Id: Borrow<Q>,
    Q: Ord + ?Sized,
{
    slot.as_ref().is_some_and(|held| {
        let held: &Q = held.borrow();
        held == id
    })
}

impl<Id, S> Default for Fsm<Id, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: fmt::Debug, S> fmt::Debug for Fsm<Id, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm")
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("history", &self.history.as_ref().map(StateHistory::len))
            .finish()
    }
}
