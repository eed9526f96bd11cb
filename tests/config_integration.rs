//! Tests for the shipped configuration file

use std::path::PathBuf;

use ksao_sim::core::config::SimulationConfig;
use ksao_sim::core::error::SimError;
use ksao_sim::simulation::engine::SimulationEngine;

fn default_config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/config/default.toml")
}

#[test]
fn test_shipped_config_matches_builtin_defaults() {
    let loaded = SimulationConfig::load(default_config_path()).unwrap();
    assert_eq!(loaded, SimulationConfig::default());
}

#[test]
fn test_shipped_config_drives_an_engine() {
    let config = SimulationConfig::load(default_config_path()).unwrap();
    let mut engine = SimulationEngine::with_seed(config, 17).unwrap();
    engine.run(10);
    assert_eq!(engine.get_state().turn, 10);
}

#[test]
fn test_scenario_override_is_validated() {
    let toml = r#"
[scenario]
dominant_ksaos = ["A"]
traditional_prior = [1.0]

[[scenario.members]]
ksaos = ["A"]
preferences = ["A"]

[[scenario.subtasks]]
id = 0
description = "Solo"
required = ["A", "A"]
"#;
    match SimulationConfig::from_toml_str(toml) {
        Err(SimError::InvalidScenario(_)) => {}
        other => panic!("expected scenario error, got {:?}", other),
    }
}

#[test]
fn test_small_custom_scenario_runs() {
    let toml = r#"
initial_mode = "shared"

[scenario]
dominant_ksaos = ["A"]
traditional_prior = [0.5, 0.5]

[[scenario.members]]
ksaos = ["A"]
preferences = ["A"]

[[scenario.members]]
ksaos = ["B"]
preferences = ["A", "B"]

[[scenario.subtasks]]
id = 0
description = "First"
required = ["A", "B"]

[[scenario.subtasks]]
id = 1
description = "Second"
required = ["B"]
"#;
    let config = SimulationConfig::from_toml_str(toml).unwrap();
    let mut engine = SimulationEngine::with_seed(config, 5).unwrap();
    engine.run(1_000);
    assert!(engine.is_finished());
    assert!((engine.max_entropy_reference() - 1.0).abs() < 1e-12);
}
