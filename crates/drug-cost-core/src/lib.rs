pub mod benefit;
pub mod error;
pub mod metrics;
pub mod types;

#[cfg(feature = "presets")]
pub mod presets;

pub use benefit::engine::{compute, simulate_benefits};
pub use error::DrugCostError;
pub use types::*;

/// Standard result type for all drug-cost operations
pub type DrugCostResult<T> = Result<T, DrugCostError>;
