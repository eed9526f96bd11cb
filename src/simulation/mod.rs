pub mod engine;
pub mod entropy;
pub mod output;
pub mod participation;
pub mod perception;
pub mod random;
pub mod scenario;
pub mod state;
pub mod team;

pub use engine::{SimulationEngine, StepOutcome};
pub use entropy::compute_entropy;
pub use output::{ReportFormat, RunReport};
pub use participation::{ParticipationRule, ParticipationVector};
pub use perception::PerceptionMatrix;
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use scenario::Scenario;
pub use state::{PerformanceSample, SimulationState, SimulationStore, StatePatch, SubscriptionId};
pub use team::{Subtask, TeamMember};
