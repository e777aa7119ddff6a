use chrono::NaiveDate;
use homeplan_core::amortization::deduction::{analyze_interest_deduction, InterestDeductionInput};
use homeplan_core::amortization::schedule::{
    build_amortization, calculate_payment, generate_schedule, monthly_payment, yearly_summary,
    AmortizationInput, LoanTerms,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{msg}: expected ~{expected}, got {actual} (diff={diff}, tol={tol})"
    );
}

fn terms(principal: Decimal, rate: Decimal, years: u32) -> LoanTerms {
    LoanTerms {
        principal,
        annual_rate_pct: rate,
        term_years: years,
    }
}

// ===========================================================================
// Payment
// ===========================================================================

#[test]
fn test_payment_reference_loan() {
    let payment = monthly_payment(dec!(300000), dec!(6), 30);
    assert_close(payment, dec!(1798.65), dec!(0.01), "300k @ 6% / 30y");
}

#[test]
fn test_payment_zero_rate_is_exact() {
    assert_eq!(monthly_payment(dec!(120000), dec!(0), 10), dec!(1000));
}

#[test]
fn test_payment_zero_principal() {
    assert_eq!(monthly_payment(dec!(0), dec!(6), 30), Decimal::ZERO);
    assert_eq!(monthly_payment(dec!(-5000), dec!(6), 30), Decimal::ZERO);
}

#[test]
fn test_payment_negative_rate_is_straight_line() {
    assert_eq!(monthly_payment(dec!(120000), dec!(-1), 10), dec!(1000));
}

#[test]
fn test_payment_envelope_warns_on_zero_rate() {
    let out = calculate_payment(&terms(dec!(120000), dec!(0), 10));
    assert_eq!(out.result.monthly_payment, dec!(1000));
    assert_eq!(out.result.number_of_payments, 120);
    assert_eq!(out.result.total_interest, Decimal::ZERO);
    assert!(out.warnings.iter().any(|w| w.contains("straight-line")));
}

// ===========================================================================
// Schedule properties
// ===========================================================================

#[test]
fn test_schedule_properties_hold_across_loans() {
    let cases = [
        (dec!(300000), dec!(6), 30u32),
        (dec!(450000), dec!(7.25), 15),
        (dec!(120000), dec!(0), 10),
        (dec!(85000), dec!(3.125), 20),
        (dec!(1000), dec!(12), 1),
    ];

    for (principal, rate, years) in cases {
        let schedule = generate_schedule(&terms(principal, rate, years), None);
        let label = format!("{principal} @ {rate}% / {years}y");

        assert_eq!(schedule.rows.len(), (years * 12) as usize, "{label}: row count");

        let last = schedule.rows.last().unwrap();
        assert_close(last.balance, Decimal::ZERO, dec!(0.01), &label);

        let principal_paid: Decimal = schedule.rows.iter().map(|r| r.principal).sum();
        assert_close(principal_paid, principal, dec!(0.01), &label);

        for pair in schedule.rows.windows(2) {
            assert!(pair[1].balance <= pair[0].balance, "{label}: balance rose");
        }
        assert!(schedule.rows.iter().all(|r| r.balance >= Decimal::ZERO));
    }
}

#[test]
fn test_schedule_totals_use_payment_times_months() {
    let schedule = generate_schedule(&terms(dec!(300000), dec!(6), 30), None);
    assert_eq!(
        schedule.total_payments,
        schedule.monthly_payment * Decimal::from(360)
    );
    assert_eq!(schedule.total_principal, dec!(300000));
    assert_eq!(
        schedule.total_interest,
        schedule.total_payments - dec!(300000)
    );
}

#[test]
fn test_schedule_year_numbers() {
    let schedule = generate_schedule(&terms(dec!(200000), dec!(5), 2), None);
    assert_eq!(schedule.rows[0].year, 1);
    assert_eq!(schedule.rows[11].year, 1);
    assert_eq!(schedule.rows[12].year, 2);
    assert_eq!(schedule.rows[23].year, 2);
}

#[test]
fn test_schedule_without_start_date_has_no_dates() {
    let schedule = generate_schedule(&terms(dec!(200000), dec!(5), 2), None);
    assert!(schedule.payoff_date.is_none());
    assert!(schedule.rows.iter().all(|r| r.payment_date.is_none()));
}

#[test]
fn test_schedule_dates_follow_start() {
    let start = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
    let schedule = generate_schedule(&terms(dec!(200000), dec!(5), 1), Some(start));
    assert_eq!(
        schedule.rows[0].payment_date,
        NaiveDate::from_ymd_opt(2026, 4, 15)
    );
    assert_eq!(schedule.payoff_date, NaiveDate::from_ymd_opt(2027, 3, 15));
}

#[test]
fn test_zero_term_gives_empty_schedule() {
    let schedule = generate_schedule(&terms(dec!(200000), dec!(5), 0), None);
    assert!(schedule.rows.is_empty());
    assert_eq!(schedule.monthly_payment, Decimal::ZERO);
    assert!(yearly_summary(&schedule).is_empty());
}

// ===========================================================================
// Yearly summary
// ===========================================================================

#[test]
fn test_yearly_summary_ending_balance_matches_last_row() {
    let schedule = generate_schedule(&terms(dec!(300000), dec!(6), 30), None);
    let years = yearly_summary(&schedule);
    assert_eq!(years.len(), 30);

    for summary in &years {
        let last_month = summary.year * 12;
        let row = &schedule.rows[(last_month - 1) as usize];
        assert_eq!(summary.ending_balance, row.balance);
    }

    let interest: Decimal = years.iter().map(|y| y.total_interest).sum();
    let row_interest: Decimal = schedule.rows.iter().map(|r| r.interest).sum();
    assert_close(interest, row_interest, dec!(0.000001), "interest roll-up");
}

#[test]
fn test_interest_front_loaded() {
    let years = yearly_summary(&generate_schedule(&terms(dec!(300000), dec!(6), 30), None));
    assert!(years[0].total_interest > years[0].total_principal);
    assert!(years[29].total_interest < years[29].total_principal);
}

#[test]
fn test_build_amortization_envelope() {
    let input = AmortizationInput {
        loan: terms(dec!(300000), dec!(6), 30),
        start_date: None,
    };
    let out = build_amortization(&input);
    assert_eq!(out.result.schedule.rows.len(), 360);
    assert_eq!(out.result.yearly_summary.len(), 30);
    assert!(out.warnings.is_empty());
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
}

// ===========================================================================
// Interest deduction
// ===========================================================================

#[test]
fn test_deduction_large_loan_worth_itemizing() {
    let input: InterestDeductionInput = serde_json::from_value(serde_json::json!({
        "principal": "800000",
        "annual_rate_pct": "7",
        "term_years": 30,
        "marginal_tax_rate_pct": "32"
    }))
    .unwrap();
    let out = analyze_interest_deduction(&input);
    let r = &out.result;
    assert_eq!(r.analysis_years, 5);
    assert_eq!(r.yearly_interest.len(), 5);
    assert!(r.average_annual_interest > r.standard_deduction);
    assert!(r.worth_itemizing);
    assert_close(
        r.annual_tax_savings,
        r.average_annual_interest * dec!(0.32),
        dec!(0.0001),
        "tax savings",
    );
}

#[test]
fn test_deduction_small_loan_not_worth_itemizing() {
    let input: InterestDeductionInput = serde_json::from_value(serde_json::json!({
        "principal": "150000",
        "annual_rate_pct": "4",
        "term_years": 30,
        "marginal_tax_rate_pct": "22"
    }))
    .unwrap();
    let out = analyze_interest_deduction(&input);
    assert!(!out.result.worth_itemizing);
    assert_eq!(out.result.incremental_tax_savings, Decimal::ZERO);
}

// ===========================================================================
// Boundary decoding
// ===========================================================================

#[test]
fn test_nan_principal_is_rejected_at_decode() {
    let result: Result<LoanTerms, _> = serde_json::from_value(serde_json::json!({
        "principal": "NaN",
        "annual_rate_pct": "6",
        "term_years": 30
    }));
    assert!(result.is_err());
}

#[test]
fn test_negative_term_is_rejected_at_decode() {
    let result: Result<LoanTerms, _> = serde_json::from_value(serde_json::json!({
        "principal": "300000",
        "annual_rate_pct": "6",
        "term_years": -30
    }));
    assert!(result.is_err());
}
