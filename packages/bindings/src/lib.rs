use napi::Result as NapiResult;
use napi_derive::napi;

use drug_cost_core::benefit::{BenefitSimulationInput, StackingPolicy};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Run a benefit simulation. Takes a `BenefitSimulationInput` document and
/// returns the `ComputationOutput` envelope, both as JSON.
#[napi]
pub fn simulate_benefits(input_json: String) -> NapiResult<String> {
    let input = BenefitSimulationInput::from_json(&input_json).map_err(to_napi_error)?;
    let output = drug_cost_core::simulate_benefits(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Reference regimen as a JSON input document, for prefilling a form.
/// `stacking` is "Independent" (default) or "Sequential".
#[napi]
pub fn reference_preset(stacking: Option<String>) -> NapiResult<String> {
    let policy = match stacking.as_deref() {
        None | Some("Independent") => StackingPolicy::Independent,
        Some("Sequential") => StackingPolicy::Sequential,
        Some(other) => {
            return Err(to_napi_error(format!(
                "Unknown stacking policy '{other}' (expected Independent or Sequential)"
            )))
        }
    };
    let preset = drug_cost_core::presets::reference_regimen(policy);
    serde_json::to_string(&preset).map_err(to_napi_error)
}
