//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every field has a default, so a
//! TOML file only needs to name the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::LeadershipMode;
use crate::simulation::participation::ParticipationRule;
use crate::simulation::scenario::Scenario;

/// Configuration for the simulation systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    // === PERCEPTION ===
    /// Lowest leadership rating one member can hold of another
    pub perception_min: f64,

    /// Highest leadership rating one member can hold of another
    ///
    /// Together with `perception_min` this also fixes the largest possible
    /// rating variance used by the internal-consensus term of the entropy.
    pub perception_max: f64,

    /// Rating every member starts with for every other member (neutral)
    pub initial_perception: f64,

    /// Half-width of the uniform noise added to a successful contribution
    ///
    /// At 0.1 the delta for a contribution moves by at most ±0.1, which is
    /// small next to the 0.25..1.0 preference-match term.
    pub success_noise: f64,

    /// Base rating loss for a failed attempt
    pub failure_penalty: f64,

    /// Half-width of the uniform noise added to a failed attempt
    pub failure_noise: f64,

    /// Multiplier on the attempter's own rating delta under shared leadership
    pub shared_self_factor: f64,

    /// Multiplier on the other members' rating deltas under shared leadership
    pub shared_peer_factor: f64,

    /// Multiplier on the attempter's own rating delta under traditional leadership
    pub traditional_self_factor: f64,

    /// Multiplier on the other members' rating deltas under traditional leadership
    pub traditional_peer_factor: f64,

    // === TASK SELECTION ===
    /// Probability that the attempter works on the lowest-id open subtask
    ///
    /// The remainder is an impulsive pick among all open subtasks.
    pub rational_order_probability: f64,

    // === PARTICIPATION ===
    /// How the participation vector is re-derived after each attempt
    pub participation_rule: ParticipationRule,

    /// Fraction of the uniform distribution mixed in each turn under shared leadership
    pub shared_uniform_pull: f64,

    /// Relative gain of the attempter's participation after a success
    pub attempter_success_gain: f64,

    /// Relative loss of the attempter's participation after a failure
    pub attempter_failure_loss: f64,

    /// Relative loss of everyone else's participation after a success
    pub peer_success_loss: f64,

    /// Relative gain of everyone else's participation after a failure
    pub peer_failure_gain: f64,

    // === ENTROPY ===
    /// Style factor applied to the entropy under shared leadership
    pub shared_entropy_factor: f64,

    /// Style factor applied to the entropy under traditional leadership
    ///
    /// Lower than the shared factor: clear leaders keep uncertainty low.
    pub traditional_entropy_factor: f64,

    /// Exponent on overall progress in the entropy decay term
    ///
    /// At 0.5 the decay is fast early and slows as the mission completes.
    pub progress_exponent: f64,

    // === STARTUP ===
    /// Mode used when the engine is first created
    pub initial_mode: LeadershipMode,

    /// Team, subtasks, and initial participation prior
    pub scenario: Scenario,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            perception_min: 1.0,
            perception_max: 10.0,
            initial_perception: 5.0,
            success_noise: 0.1,
            failure_penalty: 0.1,
            failure_noise: 0.05,
            shared_self_factor: 0.5,
            shared_peer_factor: 1.25,
            traditional_self_factor: 1.5,
            traditional_peer_factor: 1.0,

            rational_order_probability: 0.9,

            participation_rule: ParticipationRule::Reinforcement,
            shared_uniform_pull: 0.1,
            attempter_success_gain: 0.1,
            attempter_failure_loss: 0.05,
            peer_success_loss: 0.05,
            peer_failure_gain: 0.025,

            shared_entropy_factor: 0.9,
            traditional_entropy_factor: 0.7,
            progress_exponent: 0.5,

            initial_mode: LeadershipMode::Traditional,
            scenario: Scenario::default(),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Serialize back to TOML (used to print the effective config)
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rating multiplier for observer `observer` judging `attempter`
    pub fn perception_factor(&self, mode: LeadershipMode, is_attempter: bool) -> f64 {
        match (mode, is_attempter) {
            (LeadershipMode::Shared, true) => self.shared_self_factor,
            (LeadershipMode::Shared, false) => self.shared_peer_factor,
            (LeadershipMode::Traditional, true) => self.traditional_self_factor,
            (LeadershipMode::Traditional, false) => self.traditional_peer_factor,
        }
    }

    pub fn entropy_factor(&self, mode: LeadershipMode) -> f64 {
        match mode {
            LeadershipMode::Shared => self.shared_entropy_factor,
            LeadershipMode::Traditional => self.traditional_entropy_factor,
        }
    }

    /// Largest population variance a column of ratings can reach
    pub fn max_perception_variance(&self) -> f64 {
        let half_range = (self.perception_max - self.perception_min) / 2.0;
        half_range * half_range
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.perception_min >= self.perception_max {
            return Err(SimError::InvalidConfig(format!(
                "perception_min ({}) must be < perception_max ({})",
                self.perception_min, self.perception_max
            )));
        }

        if !(self.perception_min..=self.perception_max).contains(&self.initial_perception) {
            return Err(SimError::InvalidConfig(format!(
                "initial_perception ({}) must lie within [{}, {}]",
                self.initial_perception, self.perception_min, self.perception_max
            )));
        }

        let non_negative = [
            ("success_noise", self.success_noise),
            ("failure_penalty", self.failure_penalty),
            ("failure_noise", self.failure_noise),
            ("attempter_success_gain", self.attempter_success_gain),
            ("peer_failure_gain", self.peer_failure_gain),
            ("progress_exponent", self.progress_exponent),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(SimError::InvalidConfig(format!("{} must be >= 0, got {}", name, value)));
            }
        }

        let unit_interval = [
            ("rational_order_probability", self.rational_order_probability),
            ("shared_uniform_pull", self.shared_uniform_pull),
            ("shared_entropy_factor", self.shared_entropy_factor),
            ("traditional_entropy_factor", self.traditional_entropy_factor),
        ];
        for (name, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidConfig(format!(
                    "{} must lie within [0, 1], got {}",
                    name, value
                )));
            }
        }

        // Losses are multiplicative; 1.0 or more would zero or flip a weight
        let losses = [
            ("attempter_failure_loss", self.attempter_failure_loss),
            ("peer_success_loss", self.peer_success_loss),
        ];
        for (name, value) in losses {
            if !(0.0..1.0).contains(&value) {
                return Err(SimError::InvalidConfig(format!(
                    "{} must lie within [0, 1), got {}",
                    name, value
                )));
            }
        }

        let factors = [
            ("shared_self_factor", self.shared_self_factor),
            ("shared_peer_factor", self.shared_peer_factor),
            ("traditional_self_factor", self.traditional_self_factor),
            ("traditional_peer_factor", self.traditional_peer_factor),
        ];
        for (name, value) in factors {
            if !(value > 0.0) {
                return Err(SimError::InvalidConfig(format!("{} must be > 0, got {}", name, value)));
            }
        }

        self.scenario.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_max_variance_matches_rating_range() {
        let config = SimulationConfig::default();
        assert!((config.max_perception_variance() - 20.25).abs() < 1e-12);
    }

    #[test]
    fn test_shared_dampens_self_and_traditional_amplifies_self() {
        let config = SimulationConfig::default();
        let shared_self = config.perception_factor(LeadershipMode::Shared, true);
        let shared_peer = config.perception_factor(LeadershipMode::Shared, false);
        let trad_self = config.perception_factor(LeadershipMode::Traditional, true);
        let trad_peer = config.perception_factor(LeadershipMode::Traditional, false);

        assert!(shared_self < shared_peer);
        assert!(trad_self > trad_peer);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimulationConfig::from_toml_str(
            "rational_order_probability = 0.5\ninitial_mode = \"shared\"\n",
        )
        .unwrap();
        assert_eq!(config.rational_order_probability, 0.5);
        assert_eq!(config.initial_mode, LeadershipMode::Shared);
        assert_eq!(config.perception_max, 10.0);
        assert_eq!(config.scenario, Scenario::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SimulationConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[scenario]"));
        let parsed = SimulationConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_serialize_failure_surfaces_as_error() {
        // A bare integer cannot be a TOML document
        let err: SimError = toml::to_string(&42u32).unwrap_err().into();
        assert!(matches!(err, SimError::ConfigSerialize(_)));
        assert!(err.to_string().starts_with("Config serialize error"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = SimulationConfig::from_toml_str("turbo_mode = true\n").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let config = SimulationConfig {
            perception_min: 10.0,
            perception_max: 1.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_initial_perception_outside_bounds_rejected() {
        let config = SimulationConfig {
            initial_perception: 11.0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let config = SimulationConfig {
            rational_order_probability: 1.5,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimulationConfig::load("definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, SimError::IoError(_)));
    }
}
