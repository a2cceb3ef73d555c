use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::program::BenefitProgram;
use super::stacking::{stack, StackedReimbursement, StackingPolicy};
use crate::types::Money;
use crate::DrugCostResult;

/// The fixed comparison scenarios, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// No program pays anything.
    NoCoverage,
    /// Only the first listed program pays.
    FirstProgramOnly,
    /// Every listed program pays, stacked under the selected policy.
    AllPrograms,
}

/// Presentation hint so every adapter colors the same scenario the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Warning,
    Neutral,
    Positive,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::NoCoverage,
        ScenarioKind::FirstProgramOnly,
        ScenarioKind::AllPrograms,
    ];

    pub fn tone(&self) -> Tone {
        match self {
            ScenarioKind::NoCoverage => Tone::Warning,
            ScenarioKind::FirstProgramOnly => Tone::Neutral,
            ScenarioKind::AllPrograms => Tone::Positive,
        }
    }
}

/// A hypothetical coverage configuration, independent of enrolment flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub label: String,
    pub reimbursement: Money,
    /// What the patient would pay. Never negative.
    pub scenario_cost: Money,
    pub tone: Tone,
}

/// Build the no-coverage, first-program-only and all-programs scenarios.
///
/// Enabled flags are ignored: the scenarios answer "what if" questions.
/// With no programs listed the latter two collapse onto no coverage.
pub fn build_scenarios(
    policy: StackingPolicy,
    total_cost: Money,
    programs: &[BenefitProgram],
) -> DrugCostResult<Vec<Scenario>> {
    ScenarioKind::ALL
        .iter()
        .map(|kind| -> DrugCostResult<Scenario> {
            let stacked = match kind {
                ScenarioKind::NoCoverage => stack(policy, total_cost, programs, |_, _| false)?,
                ScenarioKind::FirstProgramOnly => {
                    stack(policy, total_cost, programs, |i, _| i == 0)?
                }
                ScenarioKind::AllPrograms => stack(policy, total_cost, programs, |_, _| true)?,
            };
            Ok(scenario_from(*kind, programs, total_cost, &stacked))
        })
        .collect()
}

fn scenario_from(
    kind: ScenarioKind,
    programs: &[BenefitProgram],
    total_cost: Money,
    stacked: &StackedReimbursement,
) -> Scenario {
    Scenario {
        kind,
        label: label_for(kind, programs),
        reimbursement: stacked.total,
        scenario_cost: (total_cost - stacked.total).max(Decimal::ZERO),
        tone: kind.tone(),
    }
}

fn label_for(kind: ScenarioKind, programs: &[BenefitProgram]) -> String {
    match kind {
        ScenarioKind::NoCoverage => "No coverage".to_string(),
        ScenarioKind::FirstProgramOnly => match programs.first() {
            Some(p) => format!("{} only", p.id()),
            None => "First program only (none listed)".to_string(),
        },
        ScenarioKind::AllPrograms => {
            if programs.is_empty() {
                "All programs (none listed)".to_string()
            } else {
                let ids: Vec<&str> = programs.iter().map(|p| p.id()).collect();
                ids.join(" + ")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn reference_programs() -> Vec<BenefitProgram> {
        vec![
            BenefitProgram::coinsurance("city_health_plan", dec!(20000), dec!(0.6)),
            BenefitProgram::flat_rate("patient_assistance", dec!(0.5)),
        ]
    }

    #[test]
    fn test_three_scenarios_in_order() {
        let scenarios =
            build_scenarios(StackingPolicy::Independent, dec!(89012), &reference_programs())
                .unwrap();

        let kinds: Vec<ScenarioKind> = scenarios.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, ScenarioKind::ALL.to_vec());

        assert_eq!(scenarios[0].scenario_cost, dec!(89012));
        // 89012 - 41407.2
        assert_eq!(scenarios[1].scenario_cost, dec!(47604.8));
        // 89012 - 85913.2
        assert_eq!(scenarios[2].scenario_cost, dec!(3098.8));
    }

    #[test]
    fn test_scenarios_ignore_enabled_flags() {
        let programs: Vec<BenefitProgram> = reference_programs()
            .into_iter()
            .map(|p| p.with_enabled(false))
            .collect();
        let scenarios =
            build_scenarios(StackingPolicy::Independent, dec!(89012), &programs).unwrap();
        assert_eq!(scenarios[2].reimbursement, dec!(85913.2));
    }

    #[test]
    fn test_labels_and_tones() {
        let scenarios =
            build_scenarios(StackingPolicy::Independent, dec!(1000), &reference_programs())
                .unwrap();
        assert_eq!(scenarios[0].label, "No coverage");
        assert_eq!(scenarios[1].label, "city_health_plan only");
        assert_eq!(scenarios[2].label, "city_health_plan + patient_assistance");
        assert_eq!(scenarios[0].tone, Tone::Warning);
        assert_eq!(scenarios[1].tone, Tone::Neutral);
        assert_eq!(scenarios[2].tone, Tone::Positive);
    }

    #[test]
    fn test_no_programs_collapse_to_no_coverage() {
        let scenarios = build_scenarios(StackingPolicy::Sequential, dec!(500), &[]).unwrap();
        assert!(scenarios.iter().all(|s| s.scenario_cost == dec!(500)));
    }

    #[test]
    fn test_scenario_cost_never_negative() {
        let programs = vec![
            BenefitProgram::flat_rate("a", dec!(1)),
            BenefitProgram::flat_rate("b", dec!(1)),
        ];
        let scenarios =
            build_scenarios(StackingPolicy::Independent, dec!(750), &programs).unwrap();
        assert_eq!(scenarios[2].scenario_cost, Decimal::ZERO);
        assert_eq!(scenarios[2].reimbursement, dec!(750));
    }
}
