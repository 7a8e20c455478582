use serde::{Deserialize, Serialize};

use crate::error::LoanSimError;
use crate::LoanSimResult;

/// Tiered cap on loan term by applicant age.
///
/// Ages up to `young_max_age` get `young_term_years`; ages up to
/// `middle_max_age` share `middle_term_years`; older applicants get
/// `repayment_horizon_age - age`, never less than `floor_term_years`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeTermPolicy {
    pub min_age: u32,
    pub young_max_age: u32,
    pub young_term_years: u32,
    pub middle_max_age: u32,
    pub middle_term_years: u32,
    pub repayment_horizon_age: u32,
    pub floor_term_years: u32,
}

impl Default for AgeTermPolicy {
    fn default() -> Self {
        Self {
            min_age: 18,
            young_max_age: 30,
            young_term_years: 40,
            middle_max_age: 40,
            middle_term_years: 37,
            repayment_horizon_age: 75,
            floor_term_years: 5,
        }
    }
}

impl AgeTermPolicy {
    pub fn max_term_years(&self, age: u32) -> LoanSimResult<u32> {
        if age < self.min_age {
            return Err(LoanSimError::InvalidNumeric {
                field: "applicant_age".into(),
                reason: format!("Applicant must be at least {} years old", self.min_age),
            });
        }

        let years = if age <= self.young_max_age {
            self.young_term_years
        } else if age <= self.middle_max_age {
            self.middle_term_years
        } else {
            self.repayment_horizon_age
                .saturating_sub(age)
                .max(self.floor_term_years)
        };
        Ok(years)
    }

    pub fn max_term_months(&self, age: u32) -> LoanSimResult<u32> {
        let years = self.max_term_years(age)?;
        years.checked_mul(12).ok_or_else(|| LoanSimError::InvalidNumeric {
            field: "age_terms".into(),
            reason: format!("A {years}-year term does not fit in whole months"),
        })
    }

    /// Ages must ascend, every term must be positive and expressible in months.
    pub(crate) fn validate(&self, field: &str) -> LoanSimResult<()> {
        let invalid = |reason: &str| LoanSimError::InvalidNumeric {
            field: field.into(),
            reason: reason.into(),
        };

        if !(self.min_age <= self.young_max_age
            && self.young_max_age <= self.middle_max_age
            && self.middle_max_age < self.repayment_horizon_age)
        {
            return Err(invalid(
                "Ages must ascend: min_age <= young_max_age <= middle_max_age < repayment_horizon_age",
            ));
        }

        let terms = [
            self.young_term_years,
            self.middle_term_years,
            self.floor_term_years,
        ];
        if terms.contains(&0) {
            return Err(invalid("Term years must be greater than zero"));
        }

        // Beyond middle_max_age the term is at most the horizon distance.
        let longest = terms
            .into_iter()
            .chain(std::iter::once(self.repayment_horizon_age - self.middle_max_age))
            .max()
            .unwrap_or(0);
        if longest.checked_mul(12).is_none() {
            return Err(invalid("Term years overflow whole months"));
        }
        Ok(())
    }
}

/// Maximum term in years under the standard age table.
pub fn max_term_years(age: u32) -> LoanSimResult<u32> {
    AgeTermPolicy::default().max_term_years(age)
}
