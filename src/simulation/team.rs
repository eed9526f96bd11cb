//! Team members and the subtasks they work on

use serde::{Deserialize, Serialize};

use crate::core::types::{Ksao, MemberIndex, SubtaskId};
use crate::simulation::scenario::{MemberProfile, SubtaskSpec};

/// A team member; identity is the index into the team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub index: MemberIndex,
    pub ksaos: Vec<Ksao>,
    pub preferences: Vec<Ksao>,
}

impl TeamMember {
    pub fn from_profile(index: MemberIndex, profile: &MemberProfile) -> Self {
        Self {
            index,
            ksaos: profile.ksaos.clone(),
            preferences: profile.preferences.clone(),
        }
    }

    pub fn knows(&self, ksao: Ksao) -> bool {
        self.ksaos.contains(&ksao)
    }

    /// Number shown to people (members are numbered from 1)
    pub fn display_number(&self) -> usize {
        self.index + 1
    }

    /// Share of this member's preferences found in `tags`
    pub fn preference_match(&self, tags: &[Ksao]) -> f64 {
        if self.preferences.is_empty() {
            return 0.0;
        }
        let hits = self.preferences.iter().filter(|p| tags.contains(p)).count();
        hits as f64 / self.preferences.len() as f64
    }
}

/// A unit of work that is done once every required tag has been contributed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub description: String,
    /// Required tags in definition order
    pub required_ksaos: Vec<Ksao>,
    /// Contributed tags in contribution order; always a subset of `required_ksaos`
    pub completed_ksaos: Vec<Ksao>,
}

impl Subtask {
    pub fn from_spec(spec: &SubtaskSpec) -> Self {
        Self {
            id: spec.id,
            description: spec.description.clone(),
            required_ksaos: spec.required.clone(),
            completed_ksaos: Vec::new(),
        }
    }

    /// Required tags not yet contributed, in required order
    pub fn remaining(&self) -> Vec<Ksao> {
        self.required_ksaos
            .iter()
            .filter(|k| !self.completed_ksaos.contains(k))
            .copied()
            .collect()
    }

    /// What `member` could add right now
    pub fn contribution_from(&self, member: &TeamMember) -> Vec<Ksao> {
        self.remaining().into_iter().filter(|k| member.knows(*k)).collect()
    }

    /// Record contributed tags; anything not required or already present is ignored
    pub fn apply(&mut self, tags: &[Ksao]) {
        for tag in tags {
            if self.required_ksaos.contains(tag) && !self.completed_ksaos.contains(tag) {
                self.completed_ksaos.push(*tag);
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.required_ksaos.iter().all(|k| self.completed_ksaos.contains(k))
    }

    /// Fraction of required tags contributed, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.required_ksaos.is_empty() {
            return 1.0;
        }
        self.completed_ksaos.len() as f64 / self.required_ksaos.len() as f64
    }
}

/// Mean per-subtask progress, the turn's performance score
pub fn mean_progress(subtasks: &[Subtask]) -> f64 {
    if subtasks.is_empty() {
        return 0.0;
    }
    subtasks.iter().map(Subtask::progress).sum::<f64>() / subtasks.len() as f64
}

/// Contributed tags over required tags, pooled across all subtasks
pub fn overall_progress(subtasks: &[Subtask]) -> f64 {
    let required: usize = subtasks.iter().map(|t| t.required_ksaos.len()).sum();
    if required == 0 {
        return 0.0;
    }
    let completed: usize = subtasks.iter().map(|t| t.completed_ksaos.len()).sum();
    completed as f64 / required as f64
}
