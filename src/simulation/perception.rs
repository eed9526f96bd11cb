//! Leadership perception matrix and its update rule
//!
//! `get(i, j)` is how strongly member `i` sees member `j` as a leader. Every
//! attempt moves the whole column of the attempter: a contribution that hits
//! the attempter's own priorities raises it, a failed attempt lowers it.
//!
//! The mode decides who moves most. Under shared leadership the attempter's
//! self-rating is damped and the peers' ratings are amplified, so no single
//! member runs away with the column. Under traditional leadership the
//! attempter's self-rating is amplified, so emergent leaders believe in
//! themselves first.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{Ksao, LeadershipMode, MemberIndex};
use crate::simulation::random::RandomSource;
use crate::simulation::team::TeamMember;

/// Square matrix of leadership ratings, clamped on every write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptionMatrix {
    rows: Vec<Vec<f64>>,
    min: f64,
    max: f64,
}

impl PerceptionMatrix {
    /// `size × size` matrix with every cell at `initial`
    pub fn uniform(size: usize, initial: f64, min: f64, max: f64) -> Self {
        Self {
            rows: vec![vec![initial.clamp(min, max); size]; size],
            min,
            max,
        }
    }

    pub fn from_config(size: usize, config: &SimulationConfig) -> Self {
        Self::uniform(
            size,
            config.initial_perception,
            config.perception_min,
            config.perception_max,
        )
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn get(&self, observer: MemberIndex, subject: MemberIndex) -> f64 {
        self.rows[observer][subject]
    }

    /// Write a rating, clamped to the matrix bounds
    pub fn set(&mut self, observer: MemberIndex, subject: MemberIndex, value: f64) {
        self.rows[observer][subject] = value.clamp(self.min, self.max);
    }

    /// Add to a rating, clamped; returns the value actually stored
    pub fn adjust(&mut self, observer: MemberIndex, subject: MemberIndex, delta: f64) -> f64 {
        let next = self.get(observer, subject) + delta;
        self.set(observer, subject, next);
        self.get(observer, subject)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Every member's rating of `subject`
    pub fn column(&self, subject: MemberIndex) -> Vec<f64> {
        self.rows.iter().map(|row| row[subject]).collect()
    }

    /// How member `member` rates themself
    pub fn self_perception(&self, member: MemberIndex) -> f64 {
        self.get(member, member)
    }

    /// Peers' ratings of `subject` plus the subject's self-rating
    pub fn total_for(&self, subject: MemberIndex) -> f64 {
        self.rows.iter().map(|row| row[subject]).sum()
    }

    pub fn totals(&self) -> Vec<f64> {
        (0..self.size()).map(|j| self.total_for(j)).collect()
    }

    pub fn within_bounds(&self) -> bool {
        self.rows
            .iter()
            .flatten()
            .all(|v| *v >= self.min && *v <= self.max)
    }
}

/// Raw rating change before the mode factor is applied
pub fn raw_delta<R: RandomSource>(
    attempter: &TeamMember,
    contributed: &[Ksao],
    config: &SimulationConfig,
    rng: &mut R,
) -> f64 {
    if contributed.is_empty() {
        -config.failure_penalty + rng.uniform(-config.failure_noise, config.failure_noise)
    } else {
        attempter.preference_match(contributed)
            + rng.uniform(-config.success_noise, config.success_noise)
    }
}

/// Update every member's rating of the attempter after an attempt
///
/// One noise value is drawn per observer, in observer order. Returns the
/// scaled deltas (before clamping) for logging.
pub fn update_perceptions<R: RandomSource>(
    matrix: &mut PerceptionMatrix,
    attempter: &TeamMember,
    contributed: &[Ksao],
    mode: LeadershipMode,
    config: &SimulationConfig,
    rng: &mut R,
) -> Vec<f64> {
    let mut deltas = Vec::with_capacity(matrix.size());

    for observer in 0..matrix.size() {
        let factor = config.perception_factor(mode, observer == attempter.index);
        let delta = raw_delta(attempter, contributed, config, rng) * factor;
        let stored = matrix.adjust(observer, attempter.index, delta);
        tracing::trace!(
            "Member {} rates member {}: {:+.3} -> {:.3}",
            observer + 1,
            attempter.display_number(),
            delta,
            stored
        );
        deltas.push(delta);
    }

    deltas
}
