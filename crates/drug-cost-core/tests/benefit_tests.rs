use drug_cost_core::benefit::{
    BenefitProgram, BenefitSimulationInput, ScenarioKind, StackingPolicy, Tone,
};
use drug_cost_core::presets;
use drug_cost_core::{compute, simulate_benefits, DrugCostError, PeriodKind, UsageParameters};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn usage(unit_price: Decimal, units_per_day: Decimal, days: i64) -> UsageParameters {
    UsageParameters {
        unit_price,
        units_per_day,
        days,
    }
}

// ===========================================================================
// Worked examples
// ===========================================================================

#[test]
fn test_sequential_worked_example() {
    // total = 3179 * 4 * 7 = 89012
    // assistance 50% of 89012 = 44506
    // plan 60% * (44506 - 20000) = 14703.6
    // final = 89012 - 44506 - 14703.6 = 29802.4
    let input = presets::reference_regimen(StackingPolicy::Sequential);
    let r = simulate_benefits(&input).unwrap().result;

    assert_eq!(r.total_cost, dec!(89012));
    assert_eq!(
        r.reimbursement_for(presets::ASSISTANCE_ID).unwrap().applied,
        dec!(44506)
    );
    assert_eq!(
        r.reimbursement_for(presets::HEALTH_PLAN_ID).unwrap().applied,
        dec!(14703.6)
    );
    assert_eq!(r.current_reimbursement, dec!(59209.6));
    assert_eq!(r.final_cost, dec!(29802.4));
}

#[test]
fn test_independent_worked_example() {
    // plan 60% * (89012 - 20000) = 41407.2, assistance 44506
    // sum 85913.2 < 89012 so no cap; final 3098.8
    let input = presets::reference_regimen(StackingPolicy::Independent);
    let r = simulate_benefits(&input).unwrap().result;

    assert_eq!(
        r.reimbursement_for(presets::HEALTH_PLAN_ID).unwrap().applied,
        dec!(41407.2)
    );
    assert_eq!(
        r.reimbursement_for(presets::ASSISTANCE_ID).unwrap().applied,
        dec!(44506)
    );
    assert!(!r.capped);
    assert_eq!(r.final_cost, dec!(3098.8));
}

#[test]
fn test_reference_scenarios_independent() {
    let input = presets::reference_regimen(StackingPolicy::Independent);
    let r = simulate_benefits(&input).unwrap().result;

    let costs: Vec<(ScenarioKind, Decimal, Tone)> = r
        .scenarios
        .iter()
        .map(|s| (s.kind, s.scenario_cost, s.tone))
        .collect();
    assert_eq!(
        costs,
        vec![
            (ScenarioKind::NoCoverage, dec!(89012), Tone::Warning),
            (ScenarioKind::FirstProgramOnly, dec!(47604.8), Tone::Neutral),
            (ScenarioKind::AllPrograms, dec!(3098.8), Tone::Positive),
        ]
    );
}

#[test]
fn test_scenarios_follow_policy() {
    let input = presets::reference_regimen(StackingPolicy::Sequential);
    let r = simulate_benefits(&input).unwrap().result;

    // First program under the sequential preset is the assistance scheme.
    assert_eq!(r.scenarios[1].scenario_cost, dec!(44506));
    assert_eq!(r.scenarios[2].scenario_cost, dec!(29802.4));
}

// ===========================================================================
// Boundaries
// ===========================================================================

#[test]
fn test_total_equal_to_deductible_pays_nothing() {
    let programs = vec![BenefitProgram::coinsurance("plan", dec!(20000), dec!(0.6))];
    let r = compute(
        &usage(dec!(2500), dec!(2), 4),
        &programs,
        StackingPolicy::Independent,
        PeriodKind::Cycle,
    )
    .unwrap();

    assert_eq!(r.total_cost, dec!(20000));
    assert_eq!(r.current_reimbursement, Decimal::ZERO);
    assert_eq!(r.final_cost, dec!(20000));
}

#[test]
fn test_zero_days_daily_average_is_zero() {
    let r = compute(
        &usage(dec!(3179), dec!(4), 0),
        &[presets::health_plan(), presets::patient_assistance()],
        StackingPolicy::Independent,
        PeriodKind::Cycle,
    )
    .unwrap();

    assert_eq!(r.metrics.daily_average_cost, Decimal::ZERO);
    assert_eq!(r.final_cost, Decimal::ZERO);
}

#[test]
fn test_annual_period_monthly_average() {
    let r = compute(
        &usage(dec!(100), dec!(1), 360),
        &[BenefitProgram::flat_rate("assist", dec!(0.5))],
        StackingPolicy::Independent,
        PeriodKind::Annual,
    )
    .unwrap();

    // final = 36000 * 0.5 = 18000; monthly = 1500; daily = 50
    assert_eq!(r.final_cost, dec!(18000));
    assert_eq!(r.metrics.monthly_average_cost, Some(dec!(1500)));
    assert_eq!(r.metrics.daily_average_cost, dec!(50));
}

#[test]
fn test_flat_amount_exceeding_cost() {
    let r = compute(
        &usage(dec!(10), dec!(1), 5),
        &[BenefitProgram::flat_amount("grant", dec!(1000))],
        StackingPolicy::Sequential,
        PeriodKind::Cycle,
    )
    .unwrap();

    assert_eq!(r.current_reimbursement, dec!(50));
    assert_eq!(r.final_cost, Decimal::ZERO);
    assert_eq!(r.metrics.savings_rate, Decimal::ONE);
}

// ===========================================================================
// Validation
// ===========================================================================

#[test]
fn test_invalid_rate_names_field_and_constraint() {
    let programs = vec![
        presets::health_plan(),
        BenefitProgram::flat_rate("assist", dec!(1.5)),
    ];
    let err = compute(
        &presets::reference_usage(),
        &programs,
        StackingPolicy::Independent,
        PeriodKind::Cycle,
    )
    .unwrap_err();

    match &err {
        DrugCostError::InvalidParameter { field, constraint } => {
            assert_eq!(field, "programs[1].benefit.Rate");
            assert!(constraint.contains("between 0 and 1"));
        }
        other => panic!("Expected InvalidParameter, got {other:?}"),
    }
    assert!(err.to_string().contains("programs[1].benefit.Rate"));
}

#[test]
fn test_json_input_with_numbers() {
    let json = r#"{
        "usage": { "unit_price": 3179, "units_per_day": 4, "days": 7 },
        "programs": [
            { "type": "FlatRate", "id": "assist", "enabled": true, "benefit": { "Rate": "0.5" } },
            { "type": "Coinsurance", "id": "plan", "enabled": true, "deductible": 20000, "rate": "0.6" }
        ],
        "stacking_policy": "Sequential"
    }"#;
    let input: BenefitSimulationInput = serde_json::from_str(json).unwrap();
    let r = simulate_benefits(&input).unwrap().result;
    assert_eq!(r.final_cost, dec!(29802.4));
}

#[test]
fn test_json_document_usage_errors_name_the_field() {
    let negative = r#"{"usage": {"unit_price": 3179, "units_per_day": 4, "days": -7}}"#;
    let input = BenefitSimulationInput::from_json(negative).unwrap();
    let err = simulate_benefits(&input).unwrap_err();
    assert!(err.to_string().contains("usage.days"));

    let missing = r#"{"usage": {"unit_price": 3179, "days": 7}}"#;
    match BenefitSimulationInput::from_json(missing) {
        Err(DrugCostError::InvalidParameter { field, .. }) => {
            assert_eq!(field, "usage.units_per_day")
        }
        other => panic!("Expected InvalidParameter, got {other:?}"),
    }
}
