use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::program::BenefitProgram;
use crate::error::DrugCostError;
use crate::types::Money;
use crate::DrugCostResult;

/// Rule for combining several programs that are active at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StackingPolicy {
    /// Every program is applied against the full total cost. The sum is
    /// capped at the total cost.
    #[default]
    Independent,
    /// Programs are applied in list order, each against what is left after
    /// the programs before it have paid.
    Sequential,
}

impl StackingPolicy {
    pub fn describe(&self) -> &'static str {
        match self {
            StackingPolicy::Independent => {
                "Independent: each program against the full total cost, sum capped at total"
            }
            StackingPolicy::Sequential => {
                "Sequential: each program against the remainder left by the programs before it"
            }
        }
    }
}

/// Per-program amounts and their combined, capped total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackedReimbursement {
    /// One entry per program, in input order. Inactive programs are zero.
    pub per_program: Vec<Money>,
    /// Combined reimbursement, never above the total cost.
    pub total: Money,
    /// Whether the uncapped sum exceeded the total cost.
    pub capped: bool,
}

impl StackedReimbursement {
    /// Each program's part of the capped `total`, in input order.
    ///
    /// Equal to `per_program` unless the cap triggered, in which case the
    /// amounts are scaled down in proportion and the last paying program
    /// absorbs the rounding remainder, so the parts always sum to `total`.
    pub fn shares(&self) -> Vec<Money> {
        if !self.capped {
            return self.per_program.clone();
        }
        let uncapped: Decimal = self.per_program.iter().copied().sum();
        let mut shares: Vec<Money> = self
            .per_program
            .iter()
            .map(|amount| {
                amount
                    .checked_div(uncapped)
                    .map_or(Decimal::ZERO, |fraction| fraction * self.total)
            })
            .collect();
        if let Some(last) = shares.iter().rposition(|share| !share.is_zero()) {
            let others: Decimal = shares
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != last)
                .map(|(_, share)| *share)
                .sum();
            shares[last] = self.total - others;
        }
        shares
    }
}

/// Stack the programs selected by `active` against `total_cost`.
pub fn stack<F>(
    policy: StackingPolicy,
    total_cost: Money,
    programs: &[BenefitProgram],
    active: F,
) -> DrugCostResult<StackedReimbursement>
where
    F: Fn(usize, &BenefitProgram) -> bool,
{
    let stacked = match policy {
        StackingPolicy::Independent => stack_independent(total_cost, programs, active)?,
        StackingPolicy::Sequential => stack_sequential(total_cost, programs, active),
    };
    debug!(
        ?policy,
        %total_cost,
        total = %stacked.total,
        capped = stacked.capped,
        "stacked benefit programs"
    );
    Ok(stacked)
}

fn stack_independent<F>(
    total_cost: Money,
    programs: &[BenefitProgram],
    active: F,
) -> DrugCostResult<StackedReimbursement>
where
    F: Fn(usize, &BenefitProgram) -> bool,
{
    let mut per_program = Vec::with_capacity(programs.len());
    let mut sum = Decimal::ZERO;

    for (i, program) in programs.iter().enumerate() {
        let amount = if active(i, program) {
            program.reimbursement(total_cost)
        } else {
            Decimal::ZERO
        };
        sum = sum.checked_add(amount).ok_or_else(|| {
            DrugCostError::invalid(
                "programs",
                "Combined reimbursement exceeds the representable range",
            )
        })?;
        per_program.push(amount);
    }

    let capped = sum > total_cost;
    Ok(StackedReimbursement {
        per_program,
        total: sum.min(total_cost),
        capped,
    })
}

fn stack_sequential<F>(
    total_cost: Money,
    programs: &[BenefitProgram],
    active: F,
) -> StackedReimbursement
where
    F: Fn(usize, &BenefitProgram) -> bool,
{
    let mut per_program = Vec::with_capacity(programs.len());
    let mut remaining = total_cost.max(Decimal::ZERO);

    for (i, program) in programs.iter().enumerate() {
        if !active(i, program) {
            per_program.push(Decimal::ZERO);
            continue;
        }
        // reimbursement() never exceeds its base, so remaining stays >= 0
        let amount = program.reimbursement(remaining);
        remaining -= amount;
        per_program.push(amount);
    }

    StackedReimbursement {
        per_program,
        total: total_cost.max(Decimal::ZERO) - remaining,
        capped: false,
    }
}
