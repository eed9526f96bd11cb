//! Who attempts next: a categorical distribution over team members

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{LeadershipMode, MemberIndex};
use crate::simulation::perception::PerceptionMatrix;

/// How participation weights are re-derived after an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationRule {
    /// Multiplicative reward/penalty keyed on the attempt's outcome
    #[default]
    Reinforcement,
    /// Proportional to each member's total perceived leadership
    PerceptionShare,
}

/// Non-negative weights over members that always sum to 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationVector(Vec<f64>);

impl ParticipationVector {
    pub fn uniform(size: usize) -> Self {
        Self(vec![1.0 / size as f64; size])
    }

    /// Normalized copy of `weights`; negative entries count as zero
    pub fn from_weights(weights: Vec<f64>) -> Self {
        let mut vector = Self(weights);
        vector.normalize();
        vector
    }

    pub fn initial(mode: LeadershipMode, prior: &[f64]) -> Self {
        match mode {
            LeadershipMode::Shared => Self::uniform(prior.len()),
            LeadershipMode::Traditional => Self::from_weights(prior.to_vec()),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, member: MemberIndex) -> f64 {
        self.0[member]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Rescale to sum 1; falls back to uniform when nothing is left to scale
    pub fn normalize(&mut self) {
        for w in self.0.iter_mut() {
            if !(*w > 0.0) || !w.is_finite() {
                *w = 0.0;
            }
        }
        let sum = self.sum();
        if sum > 0.0 {
            for w in self.0.iter_mut() {
                *w /= sum;
            }
        } else if !self.0.is_empty() {
            *self = Self::uniform(self.0.len());
        }
    }

    /// Inverse-CDF draw for `r` in `[0, 1)`
    ///
    /// Returns the first index whose running sum reaches `r`. If rounding
    /// leaves the total just short of `r`, the last index is returned.
    pub fn sample(&self, r: f64) -> MemberIndex {
        let mut cumulative = 0.0;
        for (idx, p) in self.0.iter().enumerate() {
            cumulative += p;
            if r <= cumulative {
                return idx;
            }
        }
        self.0.len().saturating_sub(1)
    }

    /// Apply the configured rule after `attempter` succeeded or failed
    pub fn update(
        &mut self,
        attempter: MemberIndex,
        success: bool,
        mode: LeadershipMode,
        perceptions: &PerceptionMatrix,
        config: &SimulationConfig,
    ) {
        match config.participation_rule {
            ParticipationRule::Reinforcement => self.reinforce(attempter, success, mode, config),
            ParticipationRule::PerceptionShare => {
                self.0 = perceptions.totals();
                self.normalize();
                if mode.is_shared() {
                    self.pull_toward_uniform(config.shared_uniform_pull);
                }
            }
        }
        self.normalize();
    }

    fn reinforce(
        &mut self,
        attempter: MemberIndex,
        success: bool,
        mode: LeadershipMode,
        config: &SimulationConfig,
    ) {
        if mode.is_shared() {
            self.pull_toward_uniform(config.shared_uniform_pull);
            return;
        }

        let (own, others) = if success {
            (1.0 + config.attempter_success_gain, 1.0 - config.peer_success_loss)
        } else {
            (1.0 - config.attempter_failure_loss, 1.0 + config.peer_failure_gain)
        };
        for (idx, w) in self.0.iter_mut().enumerate() {
            *w *= if idx == attempter { own } else { others };
        }
    }

    fn pull_toward_uniform(&mut self, pull: f64) {
        let share = 1.0 / self.0.len() as f64;
        for w in self.0.iter_mut() {
            *w = (1.0 - pull) * *w + pull * share;
        }
    }
}
