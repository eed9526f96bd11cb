//! Simulation state and the store that owns it
//!
//! The store holds one `SimulationState`. Writers hand it a `StatePatch`;
//! every `Some` field replaces the current value and subscribers are told
//! once per patch. The store never validates, that is the engine's job.

use serde::{Deserialize, Serialize};

use crate::core::types::{Ksao, LeadershipMode, MemberIndex, SubtaskId, Turn};
use crate::simulation::participation::ParticipationVector;
use crate::simulation::perception::PerceptionMatrix;
use crate::simulation::team::{Subtask, TeamMember};

/// One row of the performance history, recorded per turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub turn: Turn,
    /// Mean fractional completion across all subtasks after the turn
    pub score: f64,
    /// Index of the member who attempted this turn
    pub completed_by: MemberIndex,
    pub subtask_id: SubtaskId,
    pub task_description: String,
    /// Tags added this turn; empty when the attempt failed
    pub contributed: Vec<Ksao>,
    pub entropy: f64,
}

impl PerformanceSample {
    pub fn succeeded(&self) -> bool {
        !self.contributed.is_empty()
    }
}

/// Full snapshot of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub mode: LeadershipMode,
    pub members: Vec<TeamMember>,
    pub dominant_ksaos: Vec<Ksao>,
    pub subtasks: Vec<Subtask>,
    /// Ids of finished subtasks in the order they were finished
    pub completed_subtasks: Vec<SubtaskId>,
    pub perceptions: PerceptionMatrix,
    pub participation: ParticipationVector,
    pub turn: Turn,
    pub performance: Vec<PerformanceSample>,
    pub log: Vec<String>,
    pub entropy: f64,
}

impl SimulationState {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn subtask(&self, id: SubtaskId) -> Option<&Subtask> {
        self.subtasks.iter().find(|t| t.id == id)
    }

    pub fn incomplete_subtasks(&self) -> impl Iterator<Item = &Subtask> {
        self.subtasks.iter().filter(|t| !t.is_complete())
    }

    pub fn all_complete(&self) -> bool {
        self.subtasks.iter().all(Subtask::is_complete)
    }

    pub fn latest_score(&self) -> f64 {
        self.performance.last().map(|p| p.score).unwrap_or(0.0)
    }
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    pub mode: Option<LeadershipMode>,
    pub members: Option<Vec<TeamMember>>,
    pub dominant_ksaos: Option<Vec<Ksao>>,
    pub subtasks: Option<Vec<Subtask>>,
    pub completed_subtasks: Option<Vec<SubtaskId>>,
    pub perceptions: Option<PerceptionMatrix>,
    pub participation: Option<ParticipationVector>,
    pub turn: Option<Turn>,
    pub performance: Option<Vec<PerformanceSample>>,
    pub log: Option<Vec<String>>,
    pub entropy: Option<f64>,
}

impl StatePatch {
    /// Patch that replaces every field
    pub fn replace_all(state: SimulationState) -> Self {
        Self {
            mode: Some(state.mode),
            members: Some(state.members),
            dominant_ksaos: Some(state.dominant_ksaos),
            subtasks: Some(state.subtasks),
            completed_subtasks: Some(state.completed_subtasks),
            perceptions: Some(state.perceptions),
            participation: Some(state.participation),
            turn: Some(state.turn),
            performance: Some(state.performance),
            log: Some(state.log),
            entropy: Some(state.entropy),
        }
    }

    fn merge_into(self, state: &mut SimulationState) {
        if let Some(mode) = self.mode {
            state.mode = mode;
        }
        if let Some(members) = self.members {
            state.members = members;
        }
        if let Some(dominant) = self.dominant_ksaos {
            state.dominant_ksaos = dominant;
        }
        if let Some(subtasks) = self.subtasks {
            state.subtasks = subtasks;
        }
        if let Some(completed) = self.completed_subtasks {
            state.completed_subtasks = completed;
        }
        if let Some(perceptions) = self.perceptions {
            state.perceptions = perceptions;
        }
        if let Some(participation) = self.participation {
            state.participation = participation;
        }
        if let Some(turn) = self.turn {
            state.turn = turn;
        }
        if let Some(performance) = self.performance {
            state.performance = performance;
        }
        if let Some(log) = self.log {
            state.log = log;
        }
        if let Some(entropy) = self.entropy {
            state.entropy = entropy;
        }
    }
}

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&SimulationState) + Send>;

/// Owner of the current state, with change notification
pub struct SimulationStore {
    state: SimulationState,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl SimulationStore {
    pub fn new(state: SimulationState) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn get_state(&self) -> &SimulationState {
        &self.state
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> SimulationState {
        self.state.clone()
    }

    /// Merge `patch` into the state and notify subscribers once
    pub fn set_state(&mut self, patch: StatePatch) {
        patch.merge_into(&mut self.state);
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&self.state);
        }
    }

    /// Register a callback run after every `set_state`, in subscription order
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&SimulationState) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for SimulationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    fn empty_state() -> SimulationState {
        SimulationState {
            mode: LeadershipMode::Traditional,
            members: Vec::new(),
            dominant_ksaos: Vec::new(),
            subtasks: Vec::new(),
            completed_subtasks: Vec::new(),
            perceptions: PerceptionMatrix::uniform(0, 5.0, 1.0, 10.0),
            participation: ParticipationVector::uniform(0),
            turn: 0,
            performance: Vec::new(),
            log: Vec::new(),
            entropy: 0.0,
        }
    }

    #[test]
    fn test_patch_only_touches_some_fields() {
        let mut store = SimulationStore::new(empty_state());
        store.set_state(StatePatch {
            turn: Some(3),
            log: Some(vec!["hello".into()]),
            ..StatePatch::default()
        });

        let state = store.get_state();
        assert_eq!(state.turn, 3);
        assert_eq!(state.log, vec!["hello".to_string()]);
        assert_eq!(state.mode, LeadershipMode::Traditional);
        assert_eq!(state.entropy, 0.0);
    }

    #[test]
    fn test_subscribers_notified_once_per_patch() {
        let mut store = SimulationStore::new(empty_state());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |state| sink.lock().unwrap().push(state.turn));

        store.set_state(StatePatch {
            turn: Some(1),
            ..StatePatch::default()
        });
        store.set_state(StatePatch {
            turn: Some(2),
            entropy: Some(0.5),
            ..StatePatch::default()
        });

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = SimulationStore::new(empty_state());
        let count = Arc::new(AtomicU32::new(0));
        let sink = Arc::clone(&count);
        let id = store.subscribe(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        store.set_state(StatePatch::default());
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_state(StatePatch::default());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_store_can_move_across_threads() {
        fn assert_send<T: Send>() {}
        assert_send::<SimulationStore>();

        let mut store = SimulationStore::new(empty_state());
        let count = Arc::new(AtomicU32::new(0));
        let sink = Arc::clone(&count);
        store.subscribe(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        let handle = std::thread::spawn(move || {
            store.set_state(StatePatch::default());
            store
        });
        let store = handle.join().unwrap();
        assert_eq!(store.subscriber_count(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_replace_all_round_trips() {
        let mut store = SimulationStore::new(empty_state());
        let mut next = empty_state();
        next.turn = 9;
        next.mode = LeadershipMode::Shared;
        store.set_state(StatePatch::replace_all(next.clone()));
        assert_eq!(store.snapshot(), next);
    }
}
