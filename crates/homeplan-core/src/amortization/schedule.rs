//! Fixed-rate mortgage amortization.
//!
//! Level monthly payment from the annuity formula, the month-by-month
//! schedule that payment produces, and a per-year roll-up of that schedule.
//! All math in `rust_decimal::Decimal`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calendar::add_months;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: u32 = 12;

/// Converts an annual percentage rate into a monthly decimal rate.
const ANNUAL_PCT_TO_MONTHLY: Decimal = dec!(1200);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Fixed-rate loan terms.
///
/// `principal` is expected to be non-negative and `term_years` positive; the
/// functions below do not reject other values, they degrade to zero payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual interest rate in percentage points (6.5 = 6.5%).
    pub annual_rate_pct: Percent,
    pub term_years: u32,
}

/// Schedule request: loan terms plus an optional first-period anchor date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    #[serde(flatten)]
    pub loan: LoanTerms,
    /// Closing date. Row payment dates and the payoff date are only produced
    /// when this is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One month of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Month number (1-indexed).
    pub month: u32,
    /// Loan year, `ceil(month / 12)`.
    pub year: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// Remaining balance after this month, never below zero.
    pub balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

/// Full schedule for one (principal, rate, term, start date) tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub rows: Vec<AmortizationRow>,
    pub monthly_payment: Money,
    /// `monthly_payment × months`. This is not the sum of the rows and may
    /// differ from it in the last cents.
    pub total_payments: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
}

/// Per-year roll-up of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: u32,
    pub total_payments: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    pub ending_balance: Money,
}

/// Payment-only summary (no rows).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub monthly_payment: Money,
    pub number_of_payments: u32,
    pub total_payments: Money,
    pub total_interest: Money,
}

/// Schedule plus its yearly roll-up, as returned to CLI and binding callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    #[serde(flatten)]
    pub schedule: AmortizationSchedule,
    pub yearly_summary: Vec<YearlySummary>,
}

// ---------------------------------------------------------------------------
// Core calculations
// ---------------------------------------------------------------------------

/// Level monthly payment: `P·r·(1+r)^n / ((1+r)^n − 1)`.
///
/// `r = annual_rate_pct / 1200`, `n = term_years × 12`. A non-positive
/// principal (or an empty term) pays nothing; a non-positive rate amortizes
/// straight-line as `principal / n`.
pub fn monthly_payment(principal: Money, annual_rate_pct: Percent, term_years: u32) -> Money {
    let n = term_years.saturating_mul(MONTHS_PER_YEAR);
    if principal <= Decimal::ZERO || n == 0 {
        return Decimal::ZERO;
    }

    let r = monthly_rate(annual_rate_pct);
    if r.is_zero() {
        return principal / Decimal::from(n);
    }

    let factor = compound(r, n);
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        // Rate too small to register at 28 digits.
        return principal / Decimal::from(n);
    }

    principal * r * factor / denominator
}

/// Build the month-by-month schedule.
pub fn generate_schedule(terms: &LoanTerms, start_date: Option<NaiveDate>) -> AmortizationSchedule {
    let n = terms.term_years.saturating_mul(MONTHS_PER_YEAR);
    let payment = monthly_payment(terms.principal, terms.annual_rate_pct, terms.term_years);
    let r = monthly_rate(terms.annual_rate_pct);

    let mut rows = Vec::with_capacity(n as usize);
    let mut balance = terms.principal;
    let mut cumulative_interest = Decimal::ZERO;
    let mut cumulative_principal = Decimal::ZERO;

    for month in 1..=n {
        let interest = balance * r;
        let principal_portion = payment - interest;

        balance -= principal_portion;
        if balance < Decimal::ZERO {
            balance = Decimal::ZERO;
        }

        cumulative_interest += interest;
        cumulative_principal += principal_portion;

        rows.push(AmortizationRow {
            month,
            year: month.div_ceil(MONTHS_PER_YEAR),
            payment_date: start_date.map(|d| add_months(d, month)),
            payment,
            principal: principal_portion,
            interest,
            balance,
            cumulative_interest,
            cumulative_principal,
        });
    }

    let total_payments = payment * Decimal::from(n);
    let total_principal = terms.principal.max(Decimal::ZERO);

    tracing::debug!(
        principal = %terms.principal,
        rate = %terms.annual_rate_pct,
        months = n,
        payment = %payment,
        "generated amortization schedule"
    );

    AmortizationSchedule {
        rows,
        monthly_payment: payment,
        total_payments,
        total_interest: total_payments - total_principal,
        total_principal,
        payoff_date: start_date.map(|d| add_months(d, n)),
    }
}

/// Group schedule rows by loan year.
///
/// Rows arrive in month order, so each year's ending balance is the balance
/// of the last row seen for it.
pub fn yearly_summary(schedule: &AmortizationSchedule) -> Vec<YearlySummary> {
    let mut years: Vec<YearlySummary> = Vec::new();

    for row in &schedule.rows {
        match years.last_mut() {
            Some(summary) if summary.year == row.year => {
                summary.total_payments += row.payment;
                summary.total_principal += row.principal;
                summary.total_interest += row.interest;
                summary.ending_balance = row.balance;
            }
            _ => years.push(YearlySummary {
                year: row.year,
                total_payments: row.payment,
                total_principal: row.principal,
                total_interest: row.interest,
                ending_balance: row.balance,
            }),
        }
    }

    years
}

// ---------------------------------------------------------------------------
// Envelope entry points
// ---------------------------------------------------------------------------

/// Payment summary wrapped with methodology and warnings.
pub fn calculate_payment(terms: &LoanTerms) -> ComputationOutput<PaymentSummary> {
    let start = Instant::now();
    let warnings = loan_warnings(terms);

    let n = terms.term_years.saturating_mul(MONTHS_PER_YEAR);
    let payment = monthly_payment(terms.principal, terms.annual_rate_pct, terms.term_years);
    let total_payments = payment * Decimal::from(n);

    let output = PaymentSummary {
        monthly_payment: payment,
        number_of_payments: n,
        total_payments,
        total_interest: total_payments - terms.principal.max(Decimal::ZERO),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata("Fixed-Rate Annuity Payment", terms, warnings, elapsed, output)
}

/// Full schedule plus yearly roll-up wrapped with methodology and warnings.
pub fn build_amortization(input: &AmortizationInput) -> ComputationOutput<AmortizationOutput> {
    let start = Instant::now();
    let warnings = loan_warnings(&input.loan);

    let schedule = generate_schedule(&input.loan, input.start_date);
    let yearly = yearly_summary(&schedule);

    let output = AmortizationOutput {
        schedule,
        yearly_summary: yearly,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Fixed-Rate Amortization Schedule",
        input,
        warnings,
        elapsed,
        output,
    )
}

fn loan_warnings(terms: &LoanTerms) -> Vec<String> {
    let mut warnings = Vec::new();
    if terms.principal <= Decimal::ZERO {
        warnings.push(format!(
            "Principal {} is not positive; payments are zero",
            terms.principal
        ));
    }
    if terms.annual_rate_pct <= Decimal::ZERO {
        warnings.push("Non-positive interest rate; straight-line amortization applied".into());
    }
    if terms.term_years == 0 {
        warnings.push("Term of zero years produces an empty schedule".into());
    }
    warnings
}

// ---------------------------------------------------------------------------
// Decimal math helpers
// ---------------------------------------------------------------------------

/// Monthly decimal rate; zero for non-positive annual rates.
pub(crate) fn monthly_rate(annual_rate_pct: Percent) -> Rate {
    if annual_rate_pct <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        annual_rate_pct / ANNUAL_PCT_TO_MONTHLY
    }
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
fn compound(rate: Rate, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn standard_terms() -> LoanTerms {
        LoanTerms {
            principal: dec!(300000),
            annual_rate_pct: dec!(6),
            term_years: 30,
        }
    }

    #[test]
    fn test_standard_payment() {
        let pmt = monthly_payment(dec!(300000), dec!(6), 30);
        assert_eq!(pmt.round_dp(2), dec!(1798.65));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        assert_eq!(monthly_payment(dec!(120000), Decimal::ZERO, 10), dec!(1000));
    }

    #[test]
    fn test_negative_rate_is_straight_line() {
        assert_eq!(monthly_payment(dec!(120000), dec!(-1), 10), dec!(1000));
    }

    #[test]
    fn test_zero_principal_pays_nothing() {
        assert_eq!(monthly_payment(Decimal::ZERO, dec!(6), 30), Decimal::ZERO);
        assert_eq!(monthly_payment(dec!(-5000), dec!(6), 30), Decimal::ZERO);
    }

    #[test]
    fn test_zero_term_pays_nothing() {
        assert_eq!(monthly_payment(dec!(100000), dec!(6), 0), Decimal::ZERO);
        let schedule = generate_schedule(
            &LoanTerms {
                principal: dec!(100000),
                annual_rate_pct: dec!(6),
                term_years: 0,
            },
            None,
        );
        assert!(schedule.rows.is_empty());
        assert_eq!(schedule.total_payments, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_row_count() {
        let schedule = generate_schedule(&standard_terms(), None);
        assert_eq!(schedule.rows.len(), 360);
        assert_eq!(schedule.rows[0].month, 1);
        assert_eq!(schedule.rows[359].month, 360);
    }

    #[test]
    fn test_schedule_pays_off() {
        let schedule = generate_schedule(&standard_terms(), None);
        let last = schedule.rows.last().unwrap();
        assert_close(last.balance, Decimal::ZERO, dec!(0.000001), "final balance");

        let principal_sum: Decimal = schedule.rows.iter().map(|r| r.principal).sum();
        assert_close(principal_sum, dec!(300000), dec!(0.000001), "principal sum");
    }

    #[test]
    fn test_first_month_split() {
        let schedule = generate_schedule(&standard_terms(), None);
        let first = &schedule.rows[0];
        // 300,000 × 0.005 = 1,500 interest
        assert_eq!(first.interest, dec!(1500));
        assert_close(first.principal, dec!(298.65), dec!(0.01), "first principal");
        assert_eq!(first.principal + first.interest, first.payment);
    }

    #[test]
    fn test_balance_monotonically_non_increasing() {
        let schedule = generate_schedule(&standard_terms(), None);
        let mut prev = dec!(300000);
        for row in &schedule.rows {
            assert!(row.balance <= prev, "month {} balance rose", row.month);
            assert!(row.balance >= Decimal::ZERO);
            prev = row.balance;
        }
    }

    #[test]
    fn test_year_is_ceiling_of_month() {
        let schedule = generate_schedule(&standard_terms(), None);
        assert_eq!(schedule.rows[0].year, 1);
        assert_eq!(schedule.rows[11].year, 1);
        assert_eq!(schedule.rows[12].year, 2);
        assert_eq!(schedule.rows[359].year, 30);
    }

    #[test]
    fn test_totals_use_payment_times_months() {
        let schedule = generate_schedule(&standard_terms(), None);
        assert_eq!(
            schedule.total_payments,
            schedule.monthly_payment * Decimal::from(360u32)
        );
        assert_eq!(schedule.total_principal, dec!(300000));
        assert_eq!(
            schedule.total_interest,
            schedule.total_payments - dec!(300000)
        );
    }

    #[test]
    fn test_cumulative_columns() {
        let schedule = generate_schedule(&standard_terms(), None);
        let last = schedule.rows.last().unwrap();
        let interest_sum: Decimal = schedule.rows.iter().map(|r| r.interest).sum();
        assert_eq!(last.cumulative_interest, interest_sum);
        assert_close(last.cumulative_principal, dec!(300000), dec!(0.000001), "cumulative principal");
    }

    #[test]
    fn test_zero_principal_schedule() {
        let schedule = generate_schedule(
            &LoanTerms {
                principal: Decimal::ZERO,
                annual_rate_pct: dec!(6),
                term_years: 15,
            },
            None,
        );
        assert_eq!(schedule.rows.len(), 180);
        assert!(schedule.rows.iter().all(|r| r.payment.is_zero() && r.balance.is_zero()));
        assert_eq!(schedule.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_schedule_has_no_interest() {
        let schedule = generate_schedule(
            &LoanTerms {
                principal: dec!(120000),
                annual_rate_pct: Decimal::ZERO,
                term_years: 10,
            },
            None,
        );
        assert!(schedule.rows.iter().all(|r| r.interest.is_zero()));
        assert_eq!(schedule.rows[0].balance, dec!(119000));
        assert_eq!(schedule.rows.last().unwrap().balance, Decimal::ZERO);
        assert_eq!(schedule.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_dates_follow_start_date() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let schedule = generate_schedule(&standard_terms(), Some(start));
        assert_eq!(
            schedule.rows[0].payment_date,
            NaiveDate::from_ymd_opt(2025, 2, 28)
        );
        assert_eq!(schedule.payoff_date, NaiveDate::from_ymd_opt(2055, 1, 31));
    }

    #[test]
    fn test_no_start_date_no_dates() {
        let schedule = generate_schedule(&standard_terms(), None);
        assert!(schedule.payoff_date.is_none());
        assert!(schedule.rows.iter().all(|r| r.payment_date.is_none()));
    }

    #[test]
    fn test_yearly_summary() {
        let schedule = generate_schedule(&standard_terms(), None);
        let years = yearly_summary(&schedule);
        assert_eq!(years.len(), 30);

        let first_year_interest: Decimal = schedule.rows[..12].iter().map(|r| r.interest).sum();
        assert_eq!(years[0].year, 1);
        assert_eq!(years[0].total_interest, first_year_interest);
        assert_eq!(years[0].ending_balance, schedule.rows[11].balance);
        assert_close(
            years[0].total_payments,
            schedule.monthly_payment * Decimal::from(12u32),
            dec!(0.000001),
            "year 1 payments",
        );
        assert_eq!(years[29].ending_balance, schedule.rows[359].balance);
    }

    #[test]
    fn test_yearly_summary_empty() {
        let schedule = generate_schedule(
            &LoanTerms {
                principal: dec!(1000),
                annual_rate_pct: dec!(5),
                term_years: 0,
            },
            None,
        );
        assert!(yearly_summary(&schedule).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let a = generate_schedule(&standard_terms(), None);
        let b = generate_schedule(&standard_terms(), None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_envelope_warnings() {
        let out = build_amortization(&AmortizationInput {
            loan: LoanTerms {
                principal: dec!(120000),
                annual_rate_pct: Decimal::ZERO,
                term_years: 10,
            },
            start_date: None,
        });
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.result.yearly_summary.len(), 10);
        assert!(!out.methodology.is_empty());
    }

    #[test]
    fn test_payment_summary() {
        let out = calculate_payment(&standard_terms());
        assert!(out.warnings.is_empty());
        assert_eq!(out.result.number_of_payments, 360);
        assert_eq!(out.result.monthly_payment.round_dp(2), dec!(1798.65));
    }
}
