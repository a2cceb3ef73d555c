use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::DrugCostError;
use crate::types::{Money, PeriodKind, Rate};
use crate::DrugCostResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Figures derived from the final out-of-pocket cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub period_kind: PeriodKind,
    /// current_reimbursement / total_cost, 0 when the total is 0
    pub savings_rate: Rate,
    /// final_cost / days, 0 when days is 0
    pub daily_average_cost: Money,
    /// final_cost / 12, only for annual periods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_average_cost: Option<Money>,
}

/// `numerator / denominator`, failing on a zero denominator.
pub fn ratio_or_error(
    numerator: Decimal,
    denominator: Decimal,
    context: &str,
) -> DrugCostResult<Decimal> {
    if denominator.is_zero() {
        return Err(DrugCostError::DivisionUndefined {
            context: context.to_string(),
        });
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| DrugCostError::DivisionUndefined {
            context: context.to_string(),
        })
}

/// `numerator / denominator`, resolving an undefined division to 0.
pub fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    ratio_or_error(numerator, denominator, "ratio").unwrap_or(Decimal::ZERO)
}

/// Derive savings rate and period averages.
///
/// Undefined divisions never escape: they are reported in `warnings` and
/// resolved to 0.
pub fn derive_metrics(
    total_cost: Money,
    current_reimbursement: Money,
    final_cost: Money,
    days: i64,
    period_kind: PeriodKind,
    warnings: &mut Vec<String>,
) -> DerivedMetrics {
    let savings_rate = match ratio_or_error(current_reimbursement, total_cost, "savings_rate") {
        Ok(rate) => rate,
        Err(e) => {
            warnings.push(format!("{e}; savings rate reported as 0"));
            Decimal::ZERO
        }
    };

    let daily_average_cost = ratio_or_zero(final_cost, Decimal::from(days));

    let monthly_average_cost = match period_kind {
        PeriodKind::Annual => Some(final_cost / MONTHS_PER_YEAR),
        PeriodKind::Cycle => None,
    };

    DerivedMetrics {
        period_kind,
        savings_rate,
        daily_average_cost,
        monthly_average_cost,
    }
}
