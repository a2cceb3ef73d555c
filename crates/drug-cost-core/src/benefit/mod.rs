pub mod engine;
pub mod program;
pub mod scenario;
pub mod stacking;

pub use engine::{BenefitSimulationInput, ProgramReimbursement, ScenarioResult};
pub use program::{BenefitProgram, CoinsuranceProgram, FlatBenefit, FlatRateProgram, ProgramKind};
pub use scenario::{Scenario, ScenarioKind, Tone};
pub use stacking::StackingPolicy;
