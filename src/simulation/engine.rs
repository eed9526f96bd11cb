//! Simulation engine - turn resolution over the state store
//!
//! Each `step` reads the store, resolves one attempt, and writes the result
//! back as a single patch:
//! 1. Stop (log only) if every subtask is already complete
//! 2. Draw the attempter from the participation vector
//! 3. Pick a subtask: usually the lowest open id, sometimes any open one
//! 4. Contribute whatever the attempter knows of the remaining tags
//! 5. Update perceptions, then participation
//! 6. Record the performance sample and entropy, advance the turn

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{join_ksaos, Ksao, LeadershipMode, MemberIndex, SubtaskId};
use crate::simulation::entropy;
use crate::simulation::participation::ParticipationVector;
use crate::simulation::perception::{update_perceptions, PerceptionMatrix};
use crate::simulation::random::{RandomSource, SeededRandom};
use crate::simulation::state::{
    PerformanceSample, SimulationState, SimulationStore, StatePatch, SubscriptionId,
};
use crate::simulation::team::{mean_progress, Subtask, TeamMember};

/// What happened in one call to `step`
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The attempter added at least one tag
    Contributed {
        attempter: MemberIndex,
        subtask_id: SubtaskId,
        ksaos: Vec<Ksao>,
        /// The subtask became complete this turn
        completed_subtask: bool,
    },
    /// The attempter knew none of the remaining tags
    Failed {
        attempter: MemberIndex,
        subtask_id: SubtaskId,
    },
    /// Nothing left to do; only a log line was written
    Finished,
}

impl StepOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, StepOutcome::Finished)
    }
}

/// Turn-based team simulation over an owned state store
pub struct SimulationEngine<R: RandomSource = SeededRandom> {
    config: SimulationConfig,
    store: SimulationStore,
    rng: R,
}

impl SimulationEngine<SeededRandom> {
    /// Engine with a randomly seeded ChaCha stream
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::with_random(config, SeededRandom::from_entropy())
    }

    /// Engine with a reproducible ChaCha stream
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Result<Self> {
        Self::with_random(config, SeededRandom::new(seed))
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}

impl<R: RandomSource> SimulationEngine<R> {
    /// Validate `config` and start a fresh run in `config.initial_mode`
    pub fn with_random(config: SimulationConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let state = initial_state(&config, config.initial_mode);
        Ok(Self {
            store: SimulationStore::new(state),
            config,
            rng,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn get_state(&self) -> &SimulationState {
        self.store.get_state()
    }

    pub fn snapshot(&self) -> SimulationState {
        self.store.snapshot()
    }

    pub fn mode(&self) -> LeadershipMode {
        self.store.get_state().mode
    }

    pub fn is_finished(&self) -> bool {
        self.store.get_state().all_complete()
    }

    /// Direct store access for tools that patch state themselves
    pub fn store_mut(&mut self) -> &mut SimulationStore {
        &mut self.store
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&SimulationState) + Send + 'static,
    {
        self.store.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Entropy ceiling drawn as a reference line: `log2(team size)`
    pub fn max_entropy_reference(&self) -> f64 {
        (self.store.get_state().member_count() as f64).log2()
    }

    /// Reset to the scenario's starting configuration
    ///
    /// `None` keeps the current leadership mode.
    pub fn initialize(&mut self, mode: Option<LeadershipMode>) {
        let mode = mode.unwrap_or_else(|| self.mode());
        let state = initial_state(&self.config, mode);
        tracing::info!(
            "Simulation initialized: {} members, {} subtasks, {} leadership",
            state.member_count(),
            state.subtasks.len(),
            mode
        );
        self.store.set_state(StatePatch::replace_all(state));
    }

    /// Switch leadership mode for subsequent turns
    ///
    /// The participation vector keeps its current weights until the next
    /// `initialize`.
    pub fn set_leadership_mode(&mut self, mode: LeadershipMode) {
        if mode == self.mode() {
            return;
        }
        tracing::info!("Leadership mode switched to {}", mode);
        self.store.set_state(StatePatch {
            mode: Some(mode),
            ..StatePatch::default()
        });
    }

    /// Leadership entropy of the current state
    pub fn compute_entropy(&self) -> f64 {
        let state = self.store.get_state();
        entropy::compute_entropy(
            &state.subtasks,
            &state.perceptions,
            &state.performance,
            state.mode,
            &self.config,
        )
    }

    /// Advance the simulation by one turn
    pub fn step(&mut self) -> StepOutcome {
        let mut next = self.store.snapshot();

        if next.all_complete() {
            next.log.push(format!(
                "All subtasks completed in {} turns. Simulation ended.",
                next.turn
            ));
            tracing::debug!("Step requested after completion at turn {}", next.turn);
            self.store.set_state(StatePatch {
                log: Some(next.log),
                ..StatePatch::default()
            });
            return StepOutcome::Finished;
        }

        let mode = next.mode;
        let turn = next.turn + 1;
        let attempter = next.participation.sample(self.rng.next_unit());
        let task_idx = self.choose_subtask(&next.subtasks);
        let member = next.members[attempter].clone();

        let task = &mut next.subtasks[task_idx];
        let subtask_id = task.id;
        let description = task.description.clone();
        let contributed = task.contribution_from(&member);
        let success = !contributed.is_empty();
        let mut completed_subtask = false;

        if success {
            task.apply(&contributed);
            next.log.push(format!(
                "Turn {}: Member {} successfully contributed KSAOs {} to \"{}\"",
                turn,
                member.display_number(),
                join_ksaos(&contributed),
                description
            ));
            if task.is_complete() {
                completed_subtask = true;
                next.completed_subtasks.push(subtask_id);
                next.log.push(format!("Subtask \"{}\" fully completed!", description));
            }
        } else {
            next.log.push(format!(
                "Turn {}: Member {} failed to contribute to \"{}\"",
                turn,
                member.display_number(),
                description
            ));
        }

        update_perceptions(
            &mut next.perceptions,
            &member,
            &contributed,
            mode,
            &self.config,
            &mut self.rng,
        );
        next.participation
            .update(attempter, success, mode, &next.perceptions, &self.config);

        let score = mean_progress(&next.subtasks);
        next.performance.push(PerformanceSample {
            turn,
            score,
            completed_by: attempter,
            subtask_id,
            task_description: description.clone(),
            contributed: contributed.clone(),
            entropy: 0.0,
        });
        let entropy = entropy::compute_entropy(
            &next.subtasks,
            &next.perceptions,
            &next.performance,
            mode,
            &self.config,
        );
        if let Some(sample) = next.performance.last_mut() {
            sample.entropy = entropy;
        }

        tracing::debug!(
            "Turn {}: member {} on \"{}\" -> {} (score {:.3}, entropy {:.3})",
            turn,
            member.display_number(),
            description,
            if success { "contributed" } else { "failed" },
            score,
            entropy
        );
        if completed_subtask && next.all_complete() {
            tracing::info!("All subtasks completed after {} turns", turn);
        }

        self.store.set_state(StatePatch {
            subtasks: Some(next.subtasks),
            completed_subtasks: Some(next.completed_subtasks),
            perceptions: Some(next.perceptions),
            participation: Some(next.participation),
            turn: Some(turn),
            performance: Some(next.performance),
            log: Some(next.log),
            entropy: Some(entropy),
            ..StatePatch::default()
        });

        if success {
            StepOutcome::Contributed {
                attempter,
                subtask_id,
                ksaos: contributed,
                completed_subtask,
            }
        } else {
            StepOutcome::Failed {
                attempter,
                subtask_id,
            }
        }
    }

    /// Step until finished or `max_turns` turns have been played
    ///
    /// Returns the number of turns played.
    pub fn run(&mut self, max_turns: u32) -> u32 {
        let mut played = 0;
        while played < max_turns && !self.is_finished() {
            self.step();
            played += 1;
        }
        played
    }

    /// Index into `subtasks` of the subtask attempted this turn
    ///
    /// Caller guarantees at least one subtask is open.
    fn choose_subtask(&mut self, subtasks: &[Subtask]) -> usize {
        let mut open: Vec<(usize, SubtaskId)> = subtasks
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_complete())
            .map(|(idx, t)| (idx, t.id))
            .collect();
        open.sort_by_key(|(_, id)| *id);

        let pick = if self.rng.next_unit() < self.config.rational_order_probability {
            0
        } else {
            self.rng.index(open.len())
        };
        open[pick].0
    }
}

/// Fresh state for `mode` from the configured scenario
fn initial_state(config: &SimulationConfig, mode: LeadershipMode) -> SimulationState {
    let scenario = &config.scenario;
    let members: Vec<TeamMember> = scenario
        .members
        .iter()
        .enumerate()
        .map(|(idx, profile)| TeamMember::from_profile(idx, profile))
        .collect();
    let size = members.len();

    SimulationState {
        mode,
        dominant_ksaos: scenario.dominant_ksaos.clone(),
        subtasks: scenario.subtasks.iter().map(Subtask::from_spec).collect(),
        completed_subtasks: Vec::new(),
        perceptions: PerceptionMatrix::from_config(size, config),
        participation: ParticipationVector::initial(mode, &scenario.traditional_prior),
        turn: 0,
        performance: Vec::new(),
        log: vec![format!(
            "Simulation started in {} leadership mode. Member {} holds the most KSAOs, but this is unknown to the team.",
            mode,
            scenario.best_equipped_member() + 1
        )],
        entropy: 0.0,
        members,
    }
}
