use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DrugCostError;
use crate::types::{Money, Rate};
use crate::DrugCostResult;

// ---------------------------------------------------------------------------
// Program definitions
// ---------------------------------------------------------------------------

/// Deductible-and-rate program, e.g. a city supplementary health plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinsuranceProgram {
    pub id: String,
    pub enabled: bool,
    /// Out-of-pocket threshold below which nothing is reimbursed.
    pub deductible: Money,
    /// Share of the cost above the deductible that is reimbursed.
    pub rate: Rate,
}

/// What a flat-rate program pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlatBenefit {
    /// Fixed share of the base amount (0.5 = half of the base).
    Rate(Rate),
    /// Fixed currency amount, limited to the base it is applied against.
    Amount(Money),
}

/// No-deductible program, e.g. a manufacturer patient-assistance scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRateProgram {
    pub id: String,
    pub enabled: bool,
    pub benefit: FlatBenefit,
}

/// A reimbursement program that can be stacked with others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BenefitProgram {
    Coinsurance(CoinsuranceProgram),
    FlatRate(FlatRateProgram),
}

/// Discriminant of [`BenefitProgram`], carried into results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgramKind {
    Coinsurance,
    FlatRate,
}

impl BenefitProgram {
    pub fn coinsurance(id: impl Into<String>, deductible: Money, rate: Rate) -> Self {
        BenefitProgram::Coinsurance(CoinsuranceProgram {
            id: id.into(),
            enabled: true,
            deductible,
            rate,
        })
    }

    pub fn flat_rate(id: impl Into<String>, rate: Rate) -> Self {
        BenefitProgram::FlatRate(FlatRateProgram {
            id: id.into(),
            enabled: true,
            benefit: FlatBenefit::Rate(rate),
        })
    }

    pub fn flat_amount(id: impl Into<String>, amount: Money) -> Self {
        BenefitProgram::FlatRate(FlatRateProgram {
            id: id.into(),
            enabled: true,
            benefit: FlatBenefit::Amount(amount),
        })
    }

    /// Same program with the enrolment flag replaced.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        match &mut self {
            BenefitProgram::Coinsurance(p) => p.enabled = enabled,
            BenefitProgram::FlatRate(p) => p.enabled = enabled,
        }
        self
    }

    pub fn id(&self) -> &str {
        match self {
            BenefitProgram::Coinsurance(p) => &p.id,
            BenefitProgram::FlatRate(p) => &p.id,
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            BenefitProgram::Coinsurance(p) => p.enabled,
            BenefitProgram::FlatRate(p) => p.enabled,
        }
    }

    pub fn kind(&self) -> ProgramKind {
        match self {
            BenefitProgram::Coinsurance(_) => ProgramKind::Coinsurance,
            BenefitProgram::FlatRate(_) => ProgramKind::FlatRate,
        }
    }

    /// Amount this program reimburses when applied against `base`.
    ///
    /// The enabled flag is ignored here; callers decide whether the amount
    /// counts. The result always lies in `[0, base]`.
    pub fn reimbursement(&self, base: Money) -> Money {
        if base <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let raw = match self {
            // Strictly above the deductible: base == deductible pays nothing.
            BenefitProgram::Coinsurance(p) => {
                if base > p.deductible {
                    (base - p.deductible) * p.rate
                } else {
                    Decimal::ZERO
                }
            }
            BenefitProgram::FlatRate(p) => match p.benefit {
                FlatBenefit::Rate(rate) => base * rate,
                FlatBenefit::Amount(amount) => amount,
            },
        };
        raw.max(Decimal::ZERO).min(base)
    }

    /// Check the program's own parameters. `index` locates it in the
    /// request so the error can name the offending field.
    pub fn validate(&self, index: usize) -> DrugCostResult<()> {
        let field = |name: &str| format!("programs[{index}].{name}");

        if self.id().trim().is_empty() {
            return Err(DrugCostError::invalid(field("id"), "Program id must not be empty"));
        }

        match self {
            BenefitProgram::Coinsurance(p) => {
                if p.deductible < Decimal::ZERO {
                    return Err(DrugCostError::invalid(
                        field("deductible"),
                        format!("Deductible cannot be negative (got {})", p.deductible),
                    ));
                }
                check_rate(&field("rate"), p.rate)?;
            }
            BenefitProgram::FlatRate(p) => match p.benefit {
                FlatBenefit::Rate(rate) => check_rate(&field("benefit.Rate"), rate)?,
                FlatBenefit::Amount(amount) => {
                    if amount < Decimal::ZERO {
                        return Err(DrugCostError::invalid(
                            field("benefit.Amount"),
                            format!("Flat amount cannot be negative (got {amount})"),
                        ));
                    }
                }
            },
        }
        Ok(())
    }

    /// True when the program can never pay anything, whatever the base.
    pub(crate) fn pays_nothing(&self) -> bool {
        match self {
            BenefitProgram::Coinsurance(p) => p.rate.is_zero(),
            BenefitProgram::FlatRate(p) => match p.benefit {
                FlatBenefit::Rate(rate) => rate.is_zero(),
                FlatBenefit::Amount(amount) => amount.is_zero(),
            },
        }
    }
}

fn check_rate(field: &str, rate: Rate) -> DrugCostResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(DrugCostError::invalid(
            field,
            format!("Rate must be between 0 and 1 (got {rate})"),
        ));
    }
    Ok(())
}
