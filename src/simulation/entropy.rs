//! Leadership entropy
//!
//! Each subtask that has a recorded contributor gets a weight
//!
//! ```text
//! w = ELC × IC × (1 − progress)
//! ELC = 1 / Σ_i s_i²                       (external leadership clarity)
//! IC  = 1 − var(s) / max_var               (internal consensus)
//! ```
//!
//! where `s` is the column of ratings the team holds of that contributor.
//! The weights are normalized into a distribution over subtasks and its
//! Shannon entropy (bits) is damped by overall progress and the leadership
//! style, then divided by `log2(subtask count)` so the result lies in
//! `[0, 1]`. Low entropy means a few subtasks with clear, agreed-upon
//! leaders carry the remaining work.

use ahash::AHashMap;

use crate::core::config::SimulationConfig;
use crate::core::types::{LeadershipMode, MemberIndex, SubtaskId};
use crate::simulation::perception::PerceptionMatrix;
use crate::simulation::state::PerformanceSample;
use crate::simulation::team::{overall_progress, Subtask};

/// Per-subtask inputs to the entropy weight
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TaskLeadership {
    pub clarity: f64,
    pub consensus: f64,
    pub progress: f64,
}

impl TaskLeadership {
    pub fn weight(&self) -> f64 {
        self.clarity * self.consensus * (1.0 - self.progress)
    }
}

/// First recorded attempter of each subtask
pub fn first_contributors(performance: &[PerformanceSample]) -> AHashMap<SubtaskId, MemberIndex> {
    let mut contributors = AHashMap::new();
    for sample in performance {
        contributors.entry(sample.subtask_id).or_insert(sample.completed_by);
    }
    contributors
}

/// Inverse sum of squared ratings of one member
pub fn leadership_clarity(ratings: &[f64]) -> f64 {
    let sum_sq: f64 = ratings.iter().map(|s| s * s).sum();
    if sum_sq > 0.0 {
        1.0 / sum_sq
    } else {
        0.0
    }
}

/// One minus the normalized population variance of the ratings
pub fn internal_consensus(ratings: &[f64], max_variance: f64) -> f64 {
    if ratings.is_empty() || max_variance <= 0.0 {
        return 0.0;
    }
    let n = ratings.len() as f64;
    let mean = ratings.iter().sum::<f64>() / n;
    let variance = ratings.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    (1.0 - variance / max_variance).max(0.0)
}

/// Shannon entropy in bits of the distribution proportional to `weights`
///
/// Zero-weight entries contribute nothing. Returns `None` when the weights
/// do not sum to a positive value.
pub fn shannon_entropy(weights: &[f64]) -> Option<f64> {
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) {
        return None;
    }
    Some(
        weights
            .iter()
            .map(|w| w / total)
            .filter(|p| *p > 0.0)
            .map(|p| -p * p.log2())
            .sum(),
    )
}

pub fn task_leadership(
    subtasks: &[Subtask],
    perceptions: &PerceptionMatrix,
    performance: &[PerformanceSample],
    config: &SimulationConfig,
) -> Vec<TaskLeadership> {
    let contributors = first_contributors(performance);
    let max_variance = config.max_perception_variance();

    subtasks
        .iter()
        .map(|task| match contributors.get(&task.id) {
            Some(&contributor) if contributor < perceptions.size() => {
                let ratings = perceptions.column(contributor);
                TaskLeadership {
                    clarity: leadership_clarity(&ratings),
                    consensus: internal_consensus(&ratings, max_variance),
                    progress: task.progress(),
                }
            }
            _ => TaskLeadership::default(),
        })
        .collect()
}

/// Normalized leadership entropy of the current state, in `[0, 1]`
pub fn compute_entropy(
    subtasks: &[Subtask],
    perceptions: &PerceptionMatrix,
    performance: &[PerformanceSample],
    mode: LeadershipMode,
    config: &SimulationConfig,
) -> f64 {
    if subtasks.len() < 2 {
        return 0.0;
    }

    let weights: Vec<f64> = task_leadership(subtasks, perceptions, performance, config)
        .iter()
        .map(TaskLeadership::weight)
        .collect();

    let Some(raw) = shannon_entropy(&weights) else {
        return 0.0;
    };

    let progress_factor = 1.0 - overall_progress(subtasks).powf(config.progress_exponent);
    let scaled = raw * progress_factor * config.entropy_factor(mode);

    (scaled / (subtasks.len() as f64).log2()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ksaos;
    use crate::simulation::scenario::Scenario;

    fn fresh_tasks() -> Vec<Subtask> {
        Scenario::default().subtasks.iter().map(Subtask::from_spec).collect()
    }

    fn sample(turn: u32, member: MemberIndex, task: &Subtask) -> PerformanceSample {
        PerformanceSample {
            turn,
            score: 0.0,
            completed_by: member,
            subtask_id: task.id,
            task_description: task.description.clone(),
            contributed: Vec::new(),
            entropy: 0.0,
        }
    }

    #[test]
    fn test_no_contributor_means_zero() {
        let config = SimulationConfig::default();
        let matrix = PerceptionMatrix::from_config(4, &config);
        let entropy = compute_entropy(&fresh_tasks(), &matrix, &[], LeadershipMode::Shared, &config);
        assert_eq!(entropy, 0.0);
    }

    #[test]
    fn test_single_weighted_task_has_zero_entropy() {
        let config = SimulationConfig::default();
        let matrix = PerceptionMatrix::from_config(4, &config);
        let mut tasks = fresh_tasks();
        tasks[0].apply(&ksaos("A"));
        let history = vec![sample(1, 0, &tasks[0])];

        let entropy = compute_entropy(&tasks, &matrix, &history, LeadershipMode::Traditional, &config);
        assert!(entropy.abs() < 1e-12);
    }

    #[test]
    fn test_two_equal_tasks_give_one_bit() {
        let config = SimulationConfig::default();
        let matrix = PerceptionMatrix::from_config(4, &config);
        let tasks = fresh_tasks();
        let history = vec![sample(1, 0, &tasks[0]), sample(2, 1, &tasks[1])];

        let entropy = compute_entropy(&tasks, &matrix, &history, LeadershipMode::Shared, &config);
        // 1 bit × (1 − 0) × 0.9 / log2(8)
        assert!((entropy - 0.3).abs() < 1e-12);

        let traditional =
            compute_entropy(&tasks, &matrix, &history, LeadershipMode::Traditional, &config);
        assert!((traditional - 0.7 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_completed_tasks_drop_out() {
        let config = SimulationConfig::default();
        let matrix = PerceptionMatrix::from_config(4, &config);
        let mut tasks = fresh_tasks();
        tasks[0].apply(&ksaos("AB"));
        let history = vec![sample(1, 0, &tasks[0]), sample(2, 1, &tasks[0])];

        // Only contributed task is finished: total weight is zero
        let entropy = compute_entropy(&tasks, &matrix, &history, LeadershipMode::Shared, &config);
        assert_eq!(entropy, 0.0);
    }

    #[test]
    fn test_first_attempt_defines_contributor() {
        let tasks = fresh_tasks();
        let history = vec![sample(1, 2, &tasks[0]), sample(2, 0, &tasks[0])];
        let contributors = first_contributors(&history);
        assert_eq!(contributors.get(&0), Some(&2));
        assert_eq!(contributors.get(&1), None);
    }

    #[test]
    fn test_consensus_and_clarity() {
        let max_var = SimulationConfig::default().max_perception_variance();
        assert_eq!(internal_consensus(&[5.0; 4], max_var), 1.0);
        // Two at 1, two at 10: the largest spread possible
        assert!(internal_consensus(&[1.0, 1.0, 10.0, 10.0], max_var).abs() < 1e-12);
        assert!((leadership_clarity(&[5.0; 4]) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_shannon_entropy_edges() {
        assert_eq!(shannon_entropy(&[0.0, 0.0]), None);
        assert_eq!(shannon_entropy(&[3.0, 0.0]), Some(0.0));
        let uniform = shannon_entropy(&[1.0; 8]).unwrap();
        assert!((uniform - 3.0).abs() < 1e-12);
    }
}
