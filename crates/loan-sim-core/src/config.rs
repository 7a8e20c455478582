use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanSimError;
use crate::policy::age_term::AgeTermPolicy;
use crate::policy::effort_rate::EffortRateScheme;
use crate::types::Percent;
use crate::LoanSimResult;

/// Loan products that carry a reference rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanCategory {
    Auto,
    Personal,
    Mortgage,
    Consolidation,
}

/// Indicative nominal annual rates, in percent, used when a request omits its own rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    pub auto: Percent,
    pub personal: Percent,
    pub mortgage: Percent,
    pub consolidation: Percent,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            auto: dec!(8.10),
            personal: dec!(8.60),
            mortgage: dec!(2.60),
            consolidation: dec!(2.60),
        }
    }
}

impl RateTable {
    pub fn rate_for(&self, category: LoanCategory) -> Percent {
        match category {
            LoanCategory::Auto => self.auto,
            LoanCategory::Personal => self.personal,
            LoanCategory::Mortgage => self.mortgage,
            LoanCategory::Consolidation => self.consolidation,
        }
    }

    /// The caller's rate when given, otherwise the table rate for `category`.
    pub fn resolve(&self, category: LoanCategory, requested: Option<Percent>) -> Percent {
        requested.unwrap_or_else(|| self.rate_for(category))
    }
}

/// Where a simulation's rate came from, for the assumptions block.
pub(crate) fn rate_source(requested: Option<Percent>) -> &'static str {
    if requested.is_some() {
        "request"
    } else {
        "rate_table"
    }
}

/// Policy knobs shared by every simulator.
///
/// Partial documents deserialize onto the defaults, so a config file only
/// needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub rates: RateTable,
    /// Bands for the stand-alone effort-rate simulator.
    pub effort_scheme: EffortRateScheme,
    /// Bands for effort checks inside mortgage and consolidation.
    pub lending_scheme: EffortRateScheme,
    pub age_terms: AgeTermPolicy,
    /// Share of income that may go to debt service when sizing affordability.
    pub affordability_cap_percent: Percent,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            rates: RateTable::default(),
            effort_scheme: EffortRateScheme::generic(),
            lending_scheme: EffortRateScheme::lending(),
            age_terms: AgeTermPolicy::default(),
            affordability_cap_percent: dec!(50),
        }
    }
}

impl SimulatorConfig {
    pub fn from_json(json: &str) -> LoanSimResult<Self> {
        let config: SimulatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LoanSimResult<()> {
        let rates = [
            ("rates.auto", self.rates.auto),
            ("rates.personal", self.rates.personal),
            ("rates.mortgage", self.rates.mortgage),
            ("rates.consolidation", self.rates.consolidation),
        ];
        for (field, rate) in rates {
            if rate < Decimal::ZERO {
                return Err(LoanSimError::InvalidNumeric {
                    field: field.into(),
                    reason: "Reference rate cannot be negative".into(),
                });
            }
        }
        if self.affordability_cap_percent <= Decimal::ZERO
            || self.affordability_cap_percent > dec!(100)
        {
            return Err(LoanSimError::InvalidNumeric {
                field: "affordability_cap_percent".into(),
                reason: "Cap must be within (0, 100]".into(),
            });
        }
        self.effort_scheme.validate("effort_scheme")?;
        self.lending_scheme.validate("lending_scheme")?;
        self.age_terms.validate("age_terms")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates() {
        let rates = RateTable::default();
        assert_eq!(rates.rate_for(LoanCategory::Auto), dec!(8.10));
        assert_eq!(rates.rate_for(LoanCategory::Personal), dec!(8.60));
        assert_eq!(rates.rate_for(LoanCategory::Mortgage), dec!(2.60));
        assert_eq!(rates.rate_for(LoanCategory::Consolidation), dec!(2.60));
    }

    #[test]
    fn test_requested_rate_wins() {
        let rates = RateTable::default();
        assert_eq!(rates.resolve(LoanCategory::Auto, Some(dec!(5))), dec!(5));
        assert_eq!(rates.resolve(LoanCategory::Auto, None), dec!(8.10));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = SimulatorConfig::from_json(r#"{"rates":{"mortgage":"3.1"}}"#).unwrap();
        assert_eq!(config.rates.mortgage, dec!(3.1));
        assert_eq!(config.rates.auto, dec!(8.10));
        assert_eq!(config.lending_scheme, EffortRateScheme::lending());
        assert_eq!(config.affordability_cap_percent, dec!(50));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = SimulatorConfig::from_json(r#"{"rates":{"auto":"-1"}}"#).unwrap_err();
        match err {
            LoanSimError::InvalidNumeric { field, .. } => assert_eq!(field, "rates.auto"),
            other => panic!("Expected InvalidNumeric, got {other:?}"),
        }
    }

    #[test]
    fn test_cap_out_of_range_rejected() {
        let config = SimulatorConfig {
            affordability_cap_percent: dec!(120),
            ..SimulatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_incoherent_age_table_rejected() {
        let err = SimulatorConfig::from_json(r#"{"age_terms":{"floor_term_years":0}}"#).unwrap_err();
        match err {
            LoanSimError::InvalidNumeric { field, .. } => assert_eq!(field, "age_terms"),
            other => panic!("Expected InvalidNumeric, got {other:?}"),
        }

        let config = SimulatorConfig {
            age_terms: AgeTermPolicy {
                young_max_age: 50,
                ..AgeTermPolicy::default()
            },
            ..SimulatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = SimulatorConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, LoanSimError::SerializationError(_)));
    }
}
