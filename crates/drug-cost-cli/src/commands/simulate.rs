use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use drug_cost_core::benefit::{
    BenefitProgram, BenefitSimulationInput, FlatBenefit, StackingPolicy,
};
use drug_cost_core::presets;
use drug_cost_core::{simulate_benefits, PeriodKind};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StackingArg {
    /// Each program against the full total, sum capped at the total
    Independent,
    /// Assistance first, health plan on the remainder
    Sequential,
}

impl From<StackingArg> for StackingPolicy {
    fn from(arg: StackingArg) -> Self {
        match arg {
            StackingArg::Independent => StackingPolicy::Independent,
            StackingArg::Sequential => StackingPolicy::Sequential,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PeriodArg {
    Cycle,
    Annual,
}

impl From<PeriodArg> for PeriodKind {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Cycle => PeriodKind::Cycle,
            PeriodArg::Annual => PeriodKind::Annual,
        }
    }
}

/// Arguments for a benefit simulation. Unset flags keep the reference
/// regimen's values.
#[derive(Args)]
pub struct SimulateArgs {
    /// Price per unit (box)
    #[arg(long)]
    pub unit_price: Option<Decimal>,

    /// Units taken per day
    #[arg(long)]
    pub units_per_day: Option<Decimal>,

    /// Treatment days in the period
    #[arg(long)]
    pub days: Option<u32>,

    /// Health plan deductible
    #[arg(long)]
    pub deductible: Option<Decimal>,

    /// Health plan reimbursement rate above the deductible (e.g. 0.6 for 60%)
    #[arg(long)]
    pub coinsurance_rate: Option<Decimal>,

    /// Assistance program share of its base (e.g. 0.5 for 50%)
    #[arg(long, conflicts_with = "flat_amount")]
    pub flat_rate: Option<Decimal>,

    /// Assistance program fixed amount instead of a share
    #[arg(long)]
    pub flat_amount: Option<Decimal>,

    /// Not enrolled in the health plan
    #[arg(long)]
    pub no_coinsurance: bool,

    /// Not enrolled in the assistance program
    #[arg(long)]
    pub no_flat: bool,

    /// How the two programs combine
    #[arg(long, value_enum, default_value = "independent")]
    pub stacking: StackingArg,

    /// Treatment cycle or full year
    #[arg(long, value_enum, default_value = "cycle")]
    pub period: PeriodArg,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sim_input = if let Some(ref path) = args.input {
        BenefitSimulationInput::from_json(&input::file::read_text(path)?)?
    } else if let Some(document) = input::stdin::read_stdin()? {
        BenefitSimulationInput::from_json(&document)?
    } else {
        input_from_flags(&args)
    };
    debug!(
        programs = sim_input.programs.len(),
        policy = ?sim_input.stacking_policy,
        "running simulation"
    );
    let result = simulate_benefits(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Start from the reference regimen and apply the flags on top.
pub fn input_from_flags(args: &SimulateArgs) -> BenefitSimulationInput {
    let mut sim_input = presets::reference_regimen(args.stacking.into());
    sim_input.period_kind = args.period.into();

    if let Some(price) = args.unit_price {
        if price != presets::REFERENCE_UNIT_PRICE {
            warn!(
                reference = %presets::REFERENCE_UNIT_PRICE,
                %price,
                "unit price differs from the reference price"
            );
        }
        sim_input.usage.unit_price = price;
    }
    if let Some(units) = args.units_per_day {
        sim_input.usage.units_per_day = units;
    }
    if let Some(days) = args.days {
        sim_input.usage.days = i64::from(days);
    }

    for program in sim_input.programs.iter_mut() {
        match program {
            BenefitProgram::Coinsurance(plan) => {
                if let Some(deductible) = args.deductible {
                    plan.deductible = deductible;
                }
                if let Some(rate) = args.coinsurance_rate {
                    plan.rate = rate;
                }
                plan.enabled = !args.no_coinsurance;
            }
            BenefitProgram::FlatRate(assist) => {
                if let Some(rate) = args.flat_rate {
                    assist.benefit = FlatBenefit::Rate(rate);
                }
                if let Some(amount) = args.flat_amount {
                    assist.benefit = FlatBenefit::Amount(amount);
                }
                assist.enabled = !args.no_flat;
            }
        }
    }

    sim_input
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rust_decimal_macros::dec;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: SimulateArgs,
    }

    fn parse(argv: &[&str]) -> SimulateArgs {
        let mut full = vec!["dcsim"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_no_flags_gives_reference_regimen() {
        let input = input_from_flags(&parse(&[]));
        assert_eq!(input, presets::reference_regimen(StackingPolicy::Independent));
    }

    #[test]
    fn test_flags_override_usage_and_programs() {
        let input = input_from_flags(&parse(&[
            "--days",
            "14",
            "--deductible",
            "10000",
            "--coinsurance-rate",
            "0.7",
            "--no-flat",
        ]));

        assert_eq!(input.usage.days, 14);
        match &input.programs[0] {
            BenefitProgram::Coinsurance(plan) => {
                assert_eq!(plan.deductible, dec!(10000));
                assert_eq!(plan.rate, dec!(0.7));
                assert!(plan.enabled);
            }
            other => panic!("Expected coinsurance first, got {other:?}"),
        }
        assert!(!input.programs[1].enabled());
    }

    #[test]
    fn test_sequential_puts_assistance_first() {
        let input = input_from_flags(&parse(&[
            "--stacking",
            "sequential",
            "--flat-amount",
            "3000",
        ]));

        assert_eq!(input.stacking_policy, StackingPolicy::Sequential);
        match &input.programs[0] {
            BenefitProgram::FlatRate(assist) => {
                assert_eq!(assist.benefit, FlatBenefit::Amount(dec!(3000)));
            }
            other => panic!("Expected flat-rate first, got {other:?}"),
        }
    }

    #[test]
    fn test_flat_rate_and_amount_conflict() {
        let parsed = TestCli::try_parse_from([
            "dcsim",
            "--flat-rate",
            "0.5",
            "--flat-amount",
            "100",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_annual_period_flag() {
        let input = input_from_flags(&parse(&["--period", "annual", "--days", "365"]));
        assert_eq!(input.period_kind, PeriodKind::Annual);
    }
}
