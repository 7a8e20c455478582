use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanSimError;
use crate::types::{Money, Percent};
use crate::LoanSimResult;

/// Risk band of a debt-to-income ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffortTier {
    Safe,
    Caution,
    Risky,
    Acceptable,
    High,
}

/// Threshold scheme used to band an effort rate.
///
/// The generic effort-rate simulator and the lending simulators (mortgage,
/// consolidation) use different schemes; both are kept as separate policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum EffortRateScheme {
    /// `< caution_from` Safe, `caution_from..=risky_above` Caution, above Risky.
    ThreeTier {
        caution_from: Percent,
        risky_above: Percent,
    },
    /// `< high_from` Acceptable, otherwise High.
    TwoTier { high_from: Percent },
}

impl EffortRateScheme {
    /// 30% / 40% bands of the stand-alone effort-rate simulator.
    pub fn generic() -> Self {
        EffortRateScheme::ThreeTier {
            caution_from: dec!(30),
            risky_above: dec!(40),
        }
    }

    /// 50% ceiling applied by the mortgage and consolidation simulators.
    pub fn lending() -> Self {
        EffortRateScheme::TwoTier {
            high_from: dec!(50),
        }
    }

    pub fn classify(&self, rate_percent: Percent) -> EffortTier {
        match self {
            EffortRateScheme::ThreeTier {
                caution_from,
                risky_above,
            } => {
                if rate_percent < *caution_from {
                    EffortTier::Safe
                } else if rate_percent <= *risky_above {
                    EffortTier::Caution
                } else {
                    EffortTier::Risky
                }
            }
            EffortRateScheme::TwoTier { high_from } => {
                if rate_percent < *high_from {
                    EffortTier::Acceptable
                } else {
                    EffortTier::High
                }
            }
        }
    }

    pub(crate) fn validate(&self, field: &str) -> LoanSimResult<()> {
        let ok = match self {
            EffortRateScheme::ThreeTier {
                caution_from,
                risky_above,
            } => *caution_from >= Decimal::ZERO && caution_from <= risky_above,
            EffortRateScheme::TwoTier { high_from } => *high_from > Decimal::ZERO,
        };
        if !ok {
            return Err(LoanSimError::InvalidNumeric {
                field: field.into(),
                reason: "Effort-rate thresholds must be non-negative and ascending".into(),
            });
        }
        Ok(())
    }
}

/// Generic-scheme classification of an effort rate.
pub fn classify_effort_rate(rate_percent: Percent) -> EffortTier {
    EffortRateScheme::generic().classify(rate_percent)
}

/// Share of monthly income committed to debt payments, in percent.
pub fn effort_rate_percent(monthly_income: Money, obligations: Money) -> LoanSimResult<Percent> {
    if monthly_income <= Decimal::ZERO {
        return Err(LoanSimError::InvalidNumeric {
            field: "monthly_income".into(),
            reason: "Monthly income must be greater than zero".into(),
        });
    }
    obligations
        .checked_div(monthly_income)
        .and_then(|share| share.checked_mul(dec!(100)))
        .ok_or_else(|| LoanSimError::overflow("effort rate"))
}

/// Effort rate together with its band under a given scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffortAssessment {
    pub rate_percent: Percent,
    pub tier: EffortTier,
}

pub fn assess(
    scheme: &EffortRateScheme,
    monthly_income: Money,
    obligations: Money,
) -> LoanSimResult<EffortAssessment> {
    let rate_percent = effort_rate_percent(monthly_income, obligations)?;
    Ok(EffortAssessment {
        rate_percent,
        tier: scheme.classify(rate_percent),
    })
}
