//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::SimError;

/// Index of a team member (0-based, stable for the whole run)
pub type MemberIndex = usize;

/// Stable ordering key of a subtask
pub type SubtaskId = u32;

/// Simulation turn counter
pub type Turn = u32;

/// A Knowledge/Skill/Ability/Other tag, e.g. `A`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ksao(pub char);

impl Ksao {
    pub fn new(tag: char) -> Self {
        Self(tag)
    }
}

impl fmt::Display for Ksao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build a tag list from a string of single-character tags
///
/// `ksaos("ADE")` yields `[A, D, E]`.
pub fn ksaos(tags: &str) -> Vec<Ksao> {
    tags.chars().map(Ksao).collect()
}

/// Join tags for display: `A, D, E`
pub fn join_ksaos(tags: &[Ksao]) -> String {
    tags.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// How leadership influence is expected to spread through the team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadershipMode {
    /// Everyone is equally likely to step up; updates favour balance
    Shared,
    /// Early impressions matter; emergent leaders are reinforced
    #[default]
    Traditional,
}

impl LeadershipMode {
    pub fn is_shared(&self) -> bool {
        matches!(self, LeadershipMode::Shared)
    }

    pub fn from_shared_flag(shared: bool) -> Self {
        if shared {
            LeadershipMode::Shared
        } else {
            LeadershipMode::Traditional
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LeadershipMode::Shared => "shared",
            LeadershipMode::Traditional => "traditional",
        }
    }
}

impl fmt::Display for LeadershipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LeadershipMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" | "s" => Ok(LeadershipMode::Shared),
            "traditional" | "t" => Ok(LeadershipMode::Traditional),
            other => Err(SimError::UnknownMode(other.to_string())),
        }
    }
}
