//! Run report and serialization

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::types::{LeadershipMode, SubtaskId, Turn};
use crate::simulation::state::{PerformanceSample, SimulationState};

/// How a report is printed by the batch runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Text,
}

/// Serializable summary of a finished (or capped) run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub mode: LeadershipMode,
    pub seed: Option<u64>,
    pub turns: Turn,
    pub finished: bool,
    pub final_score: f64,
    pub final_entropy: f64,
    pub completed_subtasks: Vec<SubtaskId>,
    /// Column totals of the perception matrix, per member
    pub perception_totals: Vec<f64>,
    pub participation: Vec<f64>,
    pub statistics: RunStats,
    pub performance: Vec<PerformanceSample>,
    pub log: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunStats {
    pub successful_turns: u32,
    pub failed_turns: u32,
    /// Attempts per member
    pub attempts: Vec<u32>,
    pub peak_entropy: f64,
    /// Member with the highest total perceived leadership (0-based)
    pub perceived_leader: usize,
}

impl RunReport {
    pub fn new(state: &SimulationState, seed: Option<u64>) -> Self {
        let mut attempts = vec![0u32; state.member_count()];
        for sample in &state.performance {
            if let Some(count) = attempts.get_mut(sample.completed_by) {
                *count += 1;
            }
        }

        let successful_turns = state
            .performance
            .iter()
            .filter(|sample| sample.succeeded())
            .count() as u32;
        let failed_turns = state.performance.len() as u32 - successful_turns;

        let peak_entropy = state
            .performance
            .iter()
            .map(|s| s.entropy)
            .fold(0.0, f64::max);

        let totals = state.perceptions.totals();
        let perceived_leader = totals
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (idx, total)| {
                if *total > best.1 {
                    (idx, *total)
                } else {
                    best
                }
            })
            .0;

        Self {
            mode: state.mode,
            seed,
            turns: state.turn,
            finished: state.all_complete(),
            final_score: state.latest_score(),
            final_entropy: state.entropy,
            completed_subtasks: state.completed_subtasks.clone(),
            perception_totals: totals,
            participation: state.participation.as_slice().to_vec(),
            statistics: RunStats {
                successful_turns,
                failed_turns,
                attempts,
                peak_entropy,
                perceived_leader,
            },
            performance: state.performance.clone(),
            log: state.log.clone(),
        }
    }

    pub fn to_json(&self) -> crate::core::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Full printable report in `format`
    pub fn render(&self, format: ReportFormat) -> crate::core::error::Result<String> {
        match format {
            ReportFormat::Json => self.to_json(),
            ReportFormat::Text => {
                let mut lines = Vec::with_capacity(self.log.len() + 3);
                lines.push(match self.seed {
                    Some(seed) => format!("=== KSAO SIMULATION (seed {}) ===", seed),
                    None => "=== KSAO SIMULATION ===".to_string(),
                });
                lines.push(self.summary());
                lines.push(String::new());
                lines.extend(self.log.iter().cloned());
                Ok(lines.join("\n"))
            }
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} leadership: {} turns, {} ({} contributed, {} failed)\n\
             score {:.3}, entropy {:.3} (peak {:.3}), {} subtasks done\n\
             perceived leader: Member {}",
            self.mode,
            self.turns,
            if self.finished { "mission complete" } else { "mission incomplete" },
            self.statistics.successful_turns,
            self.statistics.failed_turns,
            self.final_score,
            self.final_entropy,
            self.statistics.peak_entropy,
            self.completed_subtasks.len(),
            self.statistics.perceived_leader + 1,
        )
    }
}
