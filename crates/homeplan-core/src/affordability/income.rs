//! Household income bases.
//!
//! A two-earner household plans around the primary earner stepping back
//! (childbirth, career break), so affordability is judged against three
//! bases: everything, the secondary earner's base plus variable pay, and the
//! secondary earner's base alone.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Monthly gross income split by earner and stability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdIncome {
    pub primary: Money,
    pub secondary_base: Money,
    /// Bonus/commission component of the secondary earner's pay.
    pub secondary_variable: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeScenarios {
    pub full_income: Money,
    pub conservative_income: Money,
    pub family_planning_income: Money,
}

pub fn income_scenarios(income: &HouseholdIncome) -> IncomeScenarios {
    IncomeScenarios {
        full_income: income.primary + income.secondary_base + income.secondary_variable,
        conservative_income: income.secondary_base + income.secondary_variable,
        family_planning_income: income.secondary_base,
    }
}

/// Mean of a detailed variable-income history (one entry per month).
pub fn average_variable_income(entries: &[Money]) -> Money {
    if entries.is_empty() {
        return Decimal::ZERO;
    }
    entries.iter().copied().sum::<Decimal>() / Decimal::from(entries.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_income_bases() {
        let s = income_scenarios(&HouseholdIncome {
            primary: dec!(8000),
            secondary_base: dec!(5000),
            secondary_variable: dec!(1500),
        });
        assert_eq!(s.full_income, dec!(14500));
        assert_eq!(s.conservative_income, dec!(6500));
        assert_eq!(s.family_planning_income, dec!(5000));
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let income: HouseholdIncome = serde_json::from_str(r#"{"primary": 9000}"#).unwrap();
        let s = income_scenarios(&income);
        assert_eq!(s.full_income, dec!(9000));
        assert_eq!(s.family_planning_income, Decimal::ZERO);
    }

    #[test]
    fn test_average_variable_income() {
        assert_eq!(
            average_variable_income(&[dec!(1000), dec!(2000), dec!(0), dec!(1000)]),
            dec!(1000)
        );
        assert_eq!(average_variable_income(&[]), Decimal::ZERO);
    }
}
