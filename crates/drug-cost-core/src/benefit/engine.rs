use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::time::Instant;
use tracing::debug;

use super::program::{BenefitProgram, ProgramKind};
use super::scenario::{build_scenarios, Scenario};
use super::stacking::{stack, StackingPolicy};
use crate::error::DrugCostError;
use crate::metrics::{derive_metrics, DerivedMetrics};
use crate::types::{with_metadata, ComputationOutput, Money, PeriodKind, UsageParameters};
use crate::DrugCostResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Top-level input for a benefit simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitSimulationInput {
    pub usage: UsageParameters,
    /// Programs in application order. The first one defines the
    /// first-program-only scenario.
    #[serde(default)]
    pub programs: Vec<BenefitProgram>,
    #[serde(default)]
    pub stacking_policy: StackingPolicy,
    #[serde(default)]
    pub period_kind: PeriodKind,
}

const REQUIRED_USAGE_FIELDS: [&str; 3] = ["unit_price", "units_per_day", "days"];

impl BenefitSimulationInput {
    /// Decode a JSON input document.
    ///
    /// A missing usage field is an `InvalidParameter` naming it. Any other
    /// decode failure is a `SerializationError`. Values are not range
    /// checked here; that happens when the input is simulated.
    pub fn from_json(json: &str) -> DrugCostResult<Self> {
        let document: Value = serde_json::from_str(json)?;
        let usage = match document.get("usage") {
            Some(Value::Object(usage)) => usage,
            Some(_) => return Err(DrugCostError::invalid("usage", "Must be an object")),
            None => return Err(DrugCostError::invalid("usage", "Required field is missing")),
        };
        if let Some(missing) = REQUIRED_USAGE_FIELDS
            .iter()
            .find(|field| usage.get(**field).map_or(true, Value::is_null))
        {
            return Err(DrugCostError::invalid(
                format!("usage.{missing}"),
                "Required field is missing",
            ));
        }
        Ok(serde_json::from_value(document)?)
    }
}

/// What one program pays, hypothetically and actually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramReimbursement {
    pub id: String,
    pub kind: ProgramKind,
    pub enabled: bool,
    /// Amount in the all-programs scenario, reported even when disabled.
    pub computed: Money,
    /// Amount counted towards the current reimbursement. 0 when disabled.
    /// Under the independent policy the sum of these may exceed the capped
    /// current reimbursement.
    pub applied: Money,
    /// This program's part of `current_reimbursement`. Equals `applied`
    /// unless the cap triggered; the shares always sum to the current
    /// reimbursement.
    pub capped_share: Money,
}

/// Immutable result of one simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub total_cost: Money,
    pub stacking_policy: StackingPolicy,
    pub reimbursement_by_program: Vec<ProgramReimbursement>,
    /// Sum over enabled programs, capped at total_cost.
    pub current_reimbursement: Money,
    /// True when the enabled programs together would have paid more than
    /// the total cost.
    pub capped: bool,
    /// total_cost - current_reimbursement
    pub final_cost: Money,
    /// NoCoverage, FirstProgramOnly, AllPrograms, in that order.
    pub scenarios: Vec<Scenario>,
    pub metrics: DerivedMetrics,
}

impl ScenarioResult {
    pub fn reimbursement_for(&self, id: &str) -> Option<&ProgramReimbursement> {
        self.reimbursement_by_program.iter().find(|r| r.id == id)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute total cost, current reimbursement and the comparison scenarios.
///
/// Pure and deterministic: identical arguments give identical results.
pub fn compute(
    usage: &UsageParameters,
    programs: &[BenefitProgram],
    stacking_policy: StackingPolicy,
    period_kind: PeriodKind,
) -> DrugCostResult<ScenarioResult> {
    let mut warnings = Vec::new();
    run(usage, programs, stacking_policy, period_kind, &mut warnings)
}

/// Run a simulation and wrap the result in the standard output envelope.
///
/// Diagnostics that do not invalidate the result (cap triggered, zero-day
/// period, programs that cannot pay) are returned as warnings.
pub fn simulate_benefits(
    input: &BenefitSimulationInput,
) -> DrugCostResult<ComputationOutput<ScenarioResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = run(
        &input.usage,
        &input.programs,
        input.stacking_policy,
        input.period_kind,
        &mut warnings,
    )?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!(
            "Stacked benefit simulation ({})",
            input.stacking_policy.describe()
        ),
        input,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn run(
    usage: &UsageParameters,
    programs: &[BenefitProgram],
    policy: StackingPolicy,
    period_kind: PeriodKind,
    warnings: &mut Vec<String>,
) -> DrugCostResult<ScenarioResult> {
    validate(usage, programs)?;

    let total_cost = usage.total_cost()?;
    if usage.days == 0 {
        warnings.push("Usage period is 0 days: total cost is 0 and averages default to 0".into());
    }
    program_warnings(total_cost, programs, warnings);

    // Current figure: enabled programs only.
    let current = stack(policy, total_cost, programs, |_, p| p.enabled())?;
    if current.capped {
        let uncapped: Decimal = current.per_program.iter().copied().sum();
        warnings.push(format!(
            "Enabled programs would reimburse {uncapped}, more than the total cost of \
             {total_cost}; reimbursement capped at total cost"
        ));
    }

    // Hypothetical figure: every program, enabled or not.
    let combined = stack(policy, total_cost, programs, |_, _| true)?;

    let shares = current.shares();
    let reimbursement_by_program = programs
        .iter()
        .zip(current.per_program.iter().zip(combined.per_program.iter()))
        .zip(shares)
        .map(|((p, (applied, computed)), capped_share)| ProgramReimbursement {
            id: p.id().to_string(),
            kind: p.kind(),
            enabled: p.enabled(),
            computed: *computed,
            applied: *applied,
            capped_share,
        })
        .collect();

    let current_reimbursement = current.total;
    let final_cost = total_cost - current_reimbursement;
    let scenarios = build_scenarios(policy, total_cost, programs)?;
    let metrics = derive_metrics(
        total_cost,
        current_reimbursement,
        final_cost,
        usage.days,
        period_kind,
        warnings,
    );

    debug!(
        %total_cost,
        %current_reimbursement,
        %final_cost,
        programs = programs.len(),
        "benefit simulation complete"
    );

    Ok(ScenarioResult {
        total_cost,
        stacking_policy: policy,
        reimbursement_by_program,
        current_reimbursement,
        capped: current.capped,
        final_cost,
        scenarios,
        metrics,
    })
}

fn validate(usage: &UsageParameters, programs: &[BenefitProgram]) -> DrugCostResult<()> {
    if usage.unit_price <= Decimal::ZERO {
        return Err(DrugCostError::invalid(
            "usage.unit_price",
            format!("Unit price must be positive (got {})", usage.unit_price),
        ));
    }
    if usage.units_per_day <= Decimal::ZERO {
        return Err(DrugCostError::invalid(
            "usage.units_per_day",
            format!("Units per day must be positive (got {})", usage.units_per_day),
        ));
    }
    if usage.days < 0 {
        return Err(DrugCostError::invalid(
            "usage.days",
            format!("Days must not be negative (got {})", usage.days),
        ));
    }

    let mut seen = HashSet::with_capacity(programs.len());
    for (i, program) in programs.iter().enumerate() {
        program.validate(i)?;
        if !seen.insert(program.id()) {
            return Err(DrugCostError::invalid(
                format!("programs[{i}].id"),
                format!("Duplicate program id '{}'", program.id()),
            ));
        }
    }
    Ok(())
}

fn program_warnings(total_cost: Money, programs: &[BenefitProgram], warnings: &mut Vec<String>) {
    for program in programs.iter().filter(|p| p.enabled()) {
        if program.pays_nothing() {
            warnings.push(format!(
                "Program '{}' is enabled but its rate or amount is 0",
                program.id()
            ));
        } else if let BenefitProgram::Coinsurance(c) = program {
            if total_cost <= c.deductible {
                warnings.push(format!(
                    "Total cost {total_cost} does not exceed the deductible of '{}' ({}); \
                     it reimburses nothing against the full cost",
                    c.id, c.deductible
                ));
            }
        }
    }
}
