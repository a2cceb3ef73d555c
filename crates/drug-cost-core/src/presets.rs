//! Reference regimen used as the calculator's starting point.
//!
//! One box costs 3179 and the unit price is fixed; the regimen is four
//! boxes a day for a seven-day cycle. Two programs are available: a city
//! supplementary health plan (deductible 20,000, 60% above it) and a
//! manufacturer patient-assistance scheme paying half of its base.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::benefit::{BenefitProgram, BenefitSimulationInput, StackingPolicy};
use crate::types::{Money, PeriodKind, Rate, UsageParameters};

pub const REFERENCE_UNIT_PRICE: Money = dec!(3179);
pub const REFERENCE_UNITS_PER_DAY: Decimal = dec!(4);
pub const REFERENCE_DAYS: i64 = 7;

pub const HEALTH_PLAN_ID: &str = "city_health_plan";
pub const HEALTH_PLAN_DEDUCTIBLE: Money = dec!(20000);
pub const HEALTH_PLAN_RATE: Rate = dec!(0.6);

pub const ASSISTANCE_ID: &str = "patient_assistance";
pub const ASSISTANCE_RATE: Rate = dec!(0.5);

pub fn reference_usage() -> UsageParameters {
    UsageParameters {
        unit_price: REFERENCE_UNIT_PRICE,
        units_per_day: REFERENCE_UNITS_PER_DAY,
        days: REFERENCE_DAYS,
    }
}

pub fn health_plan() -> BenefitProgram {
    BenefitProgram::coinsurance(HEALTH_PLAN_ID, HEALTH_PLAN_DEDUCTIBLE, HEALTH_PLAN_RATE)
}

pub fn patient_assistance() -> BenefitProgram {
    BenefitProgram::flat_rate(ASSISTANCE_ID, ASSISTANCE_RATE)
}

/// Full reference input, both programs enabled.
///
/// Under [`StackingPolicy::Sequential`] the assistance scheme is listed
/// first so the health plan is applied to what it leaves over.
pub fn reference_regimen(policy: StackingPolicy) -> BenefitSimulationInput {
    let programs = match policy {
        StackingPolicy::Independent => vec![health_plan(), patient_assistance()],
        StackingPolicy::Sequential => vec![patient_assistance(), health_plan()],
    };
    BenefitSimulationInput {
        usage: reference_usage(),
        programs,
        stacking_policy: policy,
        period_kind: PeriodKind::Cycle,
    }
}
