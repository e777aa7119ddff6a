use chrono::NaiveDate;
use homeplan_core::affordability::scenario::AffordabilityStatus;
use homeplan_core::plan::{
    compare_purchase_timings, evaluate_plan, run_plan, run_timing_comparison, CalculatorState,
    PurchaseTiming, TimingComparisonInput,
};
use homeplan_core::HomeplanError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn state() -> CalculatorState {
    serde_json::from_value(serde_json::json!({
        "income": {
            "primary": "9500",
            "secondary_base": "5500",
            "secondary_variable": "1200"
        },
        "property": {
            "home_price": "425000",
            "down_payment": "42500",
            "annual_rate_pct": "6.75",
            "tax_rate_pct": "2.2",
            "annual_insurance": "2600",
            "monthly_utilities": "350",
            "exemptions": { "homestead": true }
        },
        "debts": { "car_payments": "450", "student_loans": "250" },
        "savings": {
            "current_savings": "55000",
            "monthly_savings_rate": "2500"
        },
        "purchase_date": "2027-08-01",
        "marginal_tax_rate_pct": "24"
    }))
    .unwrap()
}

#[test]
fn test_plan_composes_modules() {
    let plan = evaluate_plan(&state(), as_of()).unwrap();

    // (425k - 100k) × 2.2%
    assert_eq!(plan.property_tax.annual_tax, dec!(7150));
    assert_eq!(plan.scenario.loan_amount, dec!(382500));
    assert_eq!(plan.income_scenarios.full_income, dec!(16200));
    assert_eq!(plan.dti.total_monthly_debt, dec!(700));
    assert_eq!(plan.stress_test.len(), 4);
    let drift = plan.stress_test[0].total_monthly_housing - plan.scenario.total_monthly_housing;
    assert!(drift.abs() < dec!(0.000001));
    assert!(plan.pmi.required);
    assert_eq!(plan.savings_goal.closing_costs_target, plan.closing_costs.total);
    assert_eq!(
        plan.savings_goal.reserves_target,
        plan.scenario.total_monthly_housing * dec!(3)
    );
    assert_eq!(plan.yearly_summary.len(), 30);
    assert_eq!(plan.payoff_date, NaiveDate::from_ymd_opt(2057, 8, 1));
}

#[test]
fn test_plan_is_deterministic() {
    let s = state();
    assert_eq!(
        evaluate_plan(&s, as_of()).unwrap(),
        evaluate_plan(&s, as_of()).unwrap()
    );
}

#[test]
fn test_plan_envelope_warns_on_pmi() {
    let out = run_plan(&state(), as_of()).unwrap();
    assert!(out.warnings.iter().any(|w| w.contains("PMI")));
    assert!(out.methodology.contains("Plan"));
}

#[test]
fn test_plan_invalid_date_is_date_error() {
    let mut s = state();
    s.target_date = Some("2027-13-01".into());
    match evaluate_plan(&s, as_of()) {
        Err(HomeplanError::DateError(msg)) => assert!(msg.contains("target_date")),
        other => panic!("expected DateError, got {other:?}"),
    }
}

#[test]
fn test_plan_zero_income_does_not_fail() {
    let mut s = state();
    s.income = Default::default();
    let plan = evaluate_plan(&s, as_of()).unwrap();
    assert_eq!(plan.dti.front_end_ratio, Decimal::ZERO);
    assert_eq!(plan.scenario.family_percentage, Decimal::ZERO);
    assert_eq!(plan.scenario.affordability_status, AffordabilityStatus::Affordable);
}

#[test]
fn test_timing_comparison_later_dates_save_more() {
    let timings = vec![
        PurchaseTiming {
            label: "spring".into(),
            purchase_date: "2027-04-01".into(),
            home_price: None,
            annual_rate_pct: None,
        },
        PurchaseTiming {
            label: "next fall".into(),
            purchase_date: "2027-10-01".into(),
            home_price: Some(dec!(440000)),
            annual_rate_pct: Some(dec!(6.25)),
        },
    ];
    let outcomes = compare_purchase_timings(&state(), &timings, as_of()).unwrap();

    assert_eq!(outcomes[0].label, "spring");
    assert_eq!(outcomes[0].months_until_purchase, 6);
    assert_eq!(outcomes[0].projected_savings, dec!(70000));
    assert_eq!(outcomes[1].months_until_purchase, 12);
    assert_eq!(outcomes[1].projected_savings, dec!(85000));
    assert_eq!(outcomes[1].home_price, dec!(440000));
    assert_eq!(outcomes[1].scenario.loan_amount, dec!(397500));

    for o in &outcomes {
        assert_eq!(
            o.shortfall,
            (o.savings_target - o.projected_savings).max(Decimal::ZERO)
        );
        assert_eq!(o.goal_met, o.shortfall.is_zero());
    }
}

#[test]
fn test_timing_comparison_bad_date() {
    let timings = vec![PurchaseTiming {
        label: "typo".into(),
        purchase_date: "2027/04/01".into(),
        home_price: None,
        annual_rate_pct: None,
    }];
    assert!(compare_purchase_timings(&state(), &timings, as_of()).is_err());
}

#[test]
fn test_timing_envelope_flags_past_dates() {
    let input = TimingComparisonInput {
        state: state(),
        timings: vec![PurchaseTiming {
            label: "already".into(),
            purchase_date: "2026-01-01".into(),
            home_price: None,
            annual_rate_pct: None,
        }],
    };
    let out = run_timing_comparison(&input, as_of()).unwrap();
    assert_eq!(out.result.outcomes[0].months_until_purchase, 0);
    assert!(out.warnings.iter().any(|w| w.contains("not in the future")));
}
