//! Transition history tracking.
//!
//! Records every change a machine makes to its current/previous tracking,
//! bounded to a configurable number of entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// What caused a change of the current/previous tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// `transition_to` or `transition_to_previous_state`, hooks were called
    Transition,
    /// `set_current_state`, no hooks were called
    SetCurrent,
    /// The current state was removed and the machine fell back to the previous one
    RemovalFallback,
    /// The current state was removed and nothing replaced it
    RemovalCleared,
    /// The previous state (not current) was removed; `from` holds its id
    /// and `to` the unchanged current state
    PreviousCleared,
}

/// Record of a single change of the current/previous tracking.
///
/// # Example
///
/// ```rust
/// use fsmkit::core::{ChangeKind, StateChange};
/// use chrono::Utc;
///
/// let change = StateChange {
///     from: Some("idle"),
///     to: Some("chase"),
///     kind: ChangeKind::Transition,
///     timestamp: Utc::now(),
/// };
/// assert!(!change.is_self_loop());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateChange<Id> {
    /// The state that was current before the change, if any
    pub from: Option<Id>,
    /// The state that is current after the change, if any
    pub to: Option<Id>,
    /// Which operation produced the change
    pub kind: ChangeKind,
    /// When the change happened
    pub timestamp: DateTime<Utc>,
}

impl<Id: PartialEq> StateChange<Id> {
    /// True when a state transitioned into itself.
    pub fn is_self_loop(&self) -> bool {
        self.from.is_some() && self.from == self.to
    }
}

/// Settings for the transition history of a machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of retained changes; the oldest are dropped first.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

/// Ordered, bounded history of state changes.
///
/// The capacity bound also holds for deserialized histories: entries beyond
/// the configured capacity are dropped, oldest first, on load.
///
/// # Example
///
/// ```rust
/// use fsmkit::core::{ChangeKind, HistoryConfig, StateChange, StateHistory};
/// use chrono::Utc;
///
/// let mut history = StateHistory::new(HistoryConfig { capacity: 8 });
/// history.record(StateChange {
///     from: None,
///     to: Some("idle"),
///     kind: ChangeKind::SetCurrent,
///     timestamp: Utc::now(),
/// });
/// history.record(StateChange {
///     from: Some("idle"),
///     to: Some("chase"),
///     kind: ChangeKind::Transition,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.path(), vec![&"idle", &"chase"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    from = "StoredHistory<Id>",
    bound(deserialize = "Id: Deserialize<'de>")
)]
pub struct StateHistory<Id> {
    config: HistoryConfig,
    changes: VecDeque<StateChange<Id>>,
}

#[derive(Deserialize)]
struct StoredHistory<Id> {
    config: HistoryConfig,
    changes: VecDeque<StateChange<Id>>,
}

impl<Id> From<StoredHistory<Id>> for StateHistory<Id> {
    fn from(stored: StoredHistory<Id>) -> Self {
        let StoredHistory {
            config,
            mut changes,
        } = stored;
        let excess = changes.len().saturating_sub(config.capacity);
        changes.drain(..excess);
        Self { config, changes }
    }
}

impl<Id> StateHistory<Id> {
    /// Create an empty history.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            config,
            changes: VecDeque::with_capacity(config.capacity.min(64)),
        }
    }

    pub fn config(&self) -> HistoryConfig {
        self.config
    }

    /// Append a change, evicting the oldest one when full.
    ///
    /// A capacity of zero keeps nothing.
    pub fn record(&mut self, change: StateChange<Id>) {
        if self.config.capacity == 0 {
            return;
        }
        while self.changes.len() >= self.config.capacity {
            self.changes.pop_front();
        }
        self.changes.push_back(change);
    }

    /// All retained changes, oldest first.
    pub fn changes(&self) -> impl DoubleEndedIterator<Item = &StateChange<Id>> + ExactSizeIterator {
        self.changes.iter()
    }

    pub fn last(&self) -> Option<&StateChange<Id>> {
        self.changes.back()
    }

    /// States traversed, in order.
    ///
    /// Starts with the `from` of the oldest retained change of the current
    /// state (when set), followed by every `to` that is set. Removals of the
    /// previous state leave the current state alone and are skipped.
    pub fn path(&self) -> Vec<&Id> {
        let mut moves = self
            .changes
            .iter()
            .filter(|c| c.kind != ChangeKind::PreviousCleared)
            .peekable();
        let mut path = Vec::with_capacity(self.changes.len() + 1);
        if let Some(from) = moves.peek().and_then(|c| c.from.as_ref()) {
            path.push(from);
        }
        path.extend(moves.filter_map(|c| c.to.as_ref()));
        path
    }

    /// Time elapsed between the oldest and newest retained change.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.changes.front()?, self.changes.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn clear(&mut self) {
        self.changes.clear();
    }
}

impl<Id> Default for StateHistory<Id> {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(from: Option<&'static str>, to: Option<&'static str>) -> StateChange<&'static str> {
        StateChange {
            from,
            to,
            kind: ChangeKind::Transition,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<&str> = StateHistory::default();
        assert!(history.is_empty());
        assert!(history.path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn path_starts_with_first_origin() {
        let mut history = StateHistory::default();
        history.record(change(Some("a"), Some("b")));
        history.record(change(Some("b"), Some("c")));

        assert_eq!(history.path(), vec![&"a", &"b", &"c"]);
    }

    #[test]
    fn path_skips_cleared_targets() {
        let mut history = StateHistory::default();
        history.record(change(None, Some("a")));
        history.record(StateChange {
            kind: ChangeKind::RemovalCleared,
            ..change(Some("a"), None)
        });

        assert_eq!(history.path(), vec![&"a"]);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut history = StateHistory::new(HistoryConfig { capacity: 2 });
        history.record(change(None, Some("a")));
        history.record(change(Some("a"), Some("b")));
        history.record(change(Some("b"), Some("c")));

        assert_eq!(history.len(), 2);
        assert_eq!(history.path(), vec![&"a", &"b", &"c"]);
        assert_eq!(history.changes().next().and_then(|c| c.from), Some("a"));
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut history = StateHistory::new(HistoryConfig { capacity: 0 });
        history.record(change(None, Some("a")));
        assert!(history.is_empty());
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let mut history = StateHistory::default();
        history.record(StateChange {
            timestamp: start,
            ..change(None, Some("a"))
        });
        history.record(StateChange {
            timestamp: start + chrono::Duration::milliseconds(25),
            ..change(Some("a"), Some("b"))
        });

        assert_eq!(history.duration(), Some(Duration::from_millis(25)));
    }

    #[test]
    fn self_loop_is_detected() {
        assert!(change(Some("a"), Some("a")).is_self_loop());
        assert!(!change(Some("a"), Some("b")).is_self_loop());
        assert!(!change(None, None).is_self_loop());
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history: StateHistory<String> = StateHistory::default();
        history.record(StateChange {
            from: Some("a".to_string()),
            to: Some("b".to_string()),
            kind: ChangeKind::Transition,
            timestamp: Utc::now(),
        });

        let json = serde_json::to_string(&history).unwrap();
        let restored: StateHistory<String> = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.last(), history.last());
        assert_eq!(restored.config(), history.config());
    }

    #[test]
    fn deserialized_history_respects_capacity() {
        let mut history: StateHistory<String> = StateHistory::default();
        for (from, to) in [(None, "a"), (Some("a"), "b"), (Some("b"), "c")] {
            history.record(StateChange {
                from: from.map(str::to_string),
                to: Some(to.to_string()),
                kind: ChangeKind::Transition,
                timestamp: Utc::now(),
            });
        }
        let mut json = serde_json::to_value(&history).unwrap();
        json["config"]["capacity"] = serde_json::json!(1);

        let restored: StateHistory<String> = serde_json::from_value(json).unwrap();

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.last().and_then(|c| c.to.as_deref()), Some("c"));
    }

    #[test]
    fn path_skips_previous_removals() {
        let mut history = StateHistory::default();
        history.record(StateChange {
            kind: ChangeKind::PreviousCleared,
            ..change(Some("x"), Some("a"))
        });
        history.record(change(Some("a"), Some("b")));
        history.record(StateChange {
            kind: ChangeKind::PreviousCleared,
            ..change(Some("a"), Some("b"))
        });

        assert_eq!(history.path(), vec![&"a", &"b"]);
        assert_eq!(history.len(), 3);
    }
}
