//! Starting configuration of a run: who knows what, and what must be done
//!
//! The default scenario is deliberately lopsided. Member 0 holds five of the
//! eight tags, including `A`, which six of the eight subtasks need. Nobody
//! on the team is told this; the simulation shows whether perceptions catch
//! up with the asymmetry.

use ahash::AHashSet;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{ksaos, Ksao, SubtaskId};

/// One team member's fixed profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberProfile {
    /// Tags the member can contribute
    pub ksaos: Vec<Ksao>,
    /// Tags the member values when judging someone else's contribution
    pub preferences: Vec<Ksao>,
}

/// One subtask as defined before the run starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubtaskSpec {
    pub id: SubtaskId,
    pub description: String,
    pub required: Vec<Ksao>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// Tags every member considers important
    pub dominant_ksaos: Vec<Ksao>,
    /// Participation prior under traditional leadership
    pub traditional_prior: Vec<f64>,
    pub members: Vec<MemberProfile>,
    pub subtasks: Vec<SubtaskSpec>,
}

impl Default for Scenario {
    fn default() -> Self {
        let dominant = ksaos("ADE");
        let member = |tags: &str, personal: &str| MemberProfile {
            ksaos: ksaos(tags),
            preferences: dominant.iter().copied().chain(ksaos(personal)).collect(),
        };
        let subtask = |id: SubtaskId, description: &str, required: &str| SubtaskSpec {
            id,
            description: description.to_string(),
            required: ksaos(required),
        };

        Self {
            dominant_ksaos: dominant.clone(),
            traditional_prior: vec![0.4, 0.3, 0.2, 0.1],
            members: vec![
                member("ADEFG", "F"),
                member("BCF", "B"),
                member("CDH", "C"),
                member("BEH", "H"),
            ],
            subtasks: vec![
                subtask(0, "Analyze Data", "AB"),
                subtask(1, "Develop Strategy", "ADE"),
                subtask(2, "Implement Solution", "CDF"),
                subtask(3, "Test Results", "BEH"),
                subtask(4, "Present Findings", "AG"),
                subtask(5, "Train Team", "DEF"),
                subtask(6, "Evaluate Performance", "ACH"),
                subtask(7, "Optimize Process", "ADFG"),
            ],
        }
    }
}

impl Scenario {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn subtask_count(&self) -> usize {
        self.subtasks.len()
    }

    /// Member holding the most tags (lowest index on ties)
    pub fn best_equipped_member(&self) -> usize {
        self.members
            .iter()
            .enumerate()
            .fold((0, 0), |best, (idx, m)| {
                if m.ksaos.len() > best.1 {
                    (idx, m.ksaos.len())
                } else {
                    best
                }
            })
            .0
    }

    pub fn validate(&self) -> Result<()> {
        if self.members.is_empty() {
            return Err(SimError::InvalidScenario("at least one member is required".into()));
        }
        if self.subtasks.is_empty() {
            return Err(SimError::InvalidScenario("at least one subtask is required".into()));
        }

        for (idx, member) in self.members.iter().enumerate() {
            if member.preferences.is_empty() {
                return Err(SimError::InvalidScenario(format!(
                    "member {} has no preferences",
                    idx
                )));
            }
        }

        let mut ids = AHashSet::new();
        for task in &self.subtasks {
            if !ids.insert(task.id) {
                return Err(SimError::InvalidScenario(format!("duplicate subtask id {}", task.id)));
            }
            if task.required.is_empty() {
                return Err(SimError::InvalidScenario(format!(
                    "subtask {} requires no KSAOs",
                    task.id
                )));
            }
            let unique: AHashSet<_> = task.required.iter().collect();
            if unique.len() != task.required.len() {
                return Err(SimError::InvalidScenario(format!(
                    "subtask {} lists a KSAO twice",
                    task.id
                )));
            }
        }

        if self.traditional_prior.len() != self.members.len() {
            return Err(SimError::InvalidScenario(format!(
                "traditional_prior has {} entries for {} members",
                self.traditional_prior.len(),
                self.members.len()
            )));
        }
        if self.traditional_prior.iter().any(|p| !(*p >= 0.0)) {
            return Err(SimError::InvalidScenario("traditional_prior entries must be >= 0".into()));
        }
        let sum: f64 = self.traditional_prior.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(SimError::InvalidScenario(format!(
                "traditional_prior must sum to 1, got {}",
                sum
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_shape() {
        let scenario = Scenario::default();
        assert_eq!(scenario.member_count(), 4);
        assert_eq!(scenario.subtask_count(), 8);
        assert_eq!(scenario.members[0].ksaos, ksaos("ADEFG"));
        assert_eq!(scenario.members[3].preferences, ksaos("ADEH"));
        assert_eq!(scenario.subtasks[7].required, ksaos("ADFG"));
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_member_zero_is_best_equipped() {
        assert_eq!(Scenario::default().best_equipped_member(), 0);
    }

    #[test]
    fn test_every_required_tag_is_known_by_someone() {
        let scenario = Scenario::default();
        for task in &scenario.subtasks {
            for tag in &task.required {
                assert!(
                    scenario.members.iter().any(|m| m.ksaos.contains(tag)),
                    "nobody knows {} for {}",
                    tag,
                    task.description
                );
            }
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut scenario = Scenario::default();
        scenario.subtasks[1].id = 0;
        assert!(matches!(scenario.validate(), Err(SimError::InvalidScenario(_))));
    }

    #[test]
    fn test_prior_length_mismatch_rejected() {
        let mut scenario = Scenario::default();
        scenario.traditional_prior = vec![0.5, 0.5];
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_prior_must_sum_to_one() {
        let mut scenario = Scenario::default();
        scenario.traditional_prior = vec![0.4, 0.4, 0.4, 0.4];
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_repeated_requirement_rejected() {
        let mut scenario = Scenario::default();
        scenario.subtasks[0].required = ksaos("AA");
        assert!(scenario.validate().is_err());
    }
}
