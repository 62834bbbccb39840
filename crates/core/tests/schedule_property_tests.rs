//! Property-based integration tests for loan schedules and the installment ledger.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uangkita_core::loans::{
    cancel_payment, generate_schedule, mark_paid, summarize, Loan, PaymentMeta,
};

// =============================================================================
// Generators
// =============================================================================

/// Principal between 0.01 and 10 billion, in cents.
fn arb_principal() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Annual rate between 0% and 40% with two decimals.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=4_000).prop_map(|basis| Decimal::new(basis, 2))
}

fn arb_tenor() -> impl Strategy<Value = i32> {
    1i32..=360
}

fn arb_origination() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn loan_from(
    principal: Decimal,
    rate: Decimal,
    tenor: i32,
    origination: NaiveDate,
) -> Loan {
    Loan {
        id: "loan-prop".to_string(),
        principal,
        annual_rate_percent: rate,
        tenor_months: tenor as u32,
        origination_date: origination,
        installments: generate_schedule(principal, rate, tenor, origination).unwrap(),
        created_at: origination.and_hms_opt(0, 0, 0).unwrap(),
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A schedule has exactly `tenor` installments numbered 1..=tenor.
    #[test]
    fn prop_schedule_length_and_sequence(
        principal in arb_principal(),
        rate in arb_rate(),
        tenor in arb_tenor(),
        origination in arb_origination(),
    ) {
        let schedule = generate_schedule(principal, rate, tenor, origination).unwrap();

        prop_assert_eq!(schedule.len(), tenor as usize);
        for (index, installment) in schedule.iter().enumerate() {
            prop_assert_eq!(installment.sequence, index as u32 + 1);
        }
        prop_assert!(schedule.windows(2).all(|pair| pair[0].due_date < pair[1].due_date));
    }

    /// Principal slices add back up to the principal and the balance ends at zero.
    #[test]
    fn prop_principal_is_fully_repaid(
        principal in arb_principal(),
        rate in arb_rate(),
        tenor in arb_tenor(),
        origination in arb_origination(),
    ) {
        let schedule = generate_schedule(principal, rate, tenor, origination).unwrap();

        let repaid: Decimal = schedule.iter().map(|i| i.principal_component).sum();
        prop_assert!((repaid - principal).abs() < Decimal::ONE);
        prop_assert_eq!(schedule.last().unwrap().remaining_principal, Decimal::ZERO);
        prop_assert!(schedule.iter().all(|i| i.remaining_principal >= Decimal::ZERO));
    }

    /// Every installment carries the same flat total.
    #[test]
    fn prop_flat_total(
        principal in arb_principal(),
        rate in arb_rate(),
        tenor in arb_tenor(),
        origination in arb_origination(),
    ) {
        let schedule = generate_schedule(principal, rate, tenor, origination).unwrap();
        let expected = principal / Decimal::from(tenor)
            + principal * rate / Decimal::ONE_HUNDRED / Decimal::from(12);

        for installment in &schedule {
            prop_assert_eq!(installment.total_amount, schedule[0].total_amount);
            prop_assert!((installment.total_amount - expected).abs() < Decimal::new(1, 6));
        }
    }

    /// Paying then cancelling an installment restores it exactly.
    #[test]
    fn prop_pay_cancel_round_trip(
        principal in arb_principal(),
        rate in arb_rate(),
        tenor in arb_tenor(),
        origination in arb_origination(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut loan = loan_from(principal, rate, tenor, origination);
        let original = loan.clone();
        let target = loan.installments[pick.index(loan.installments.len())].id.clone();

        mark_paid(&mut loan, &target, PaymentMeta::on(origination)).unwrap();
        cancel_payment(&mut loan, &target).unwrap();

        prop_assert_eq!(loan, original);
    }

    /// Percent paid is 0 with nothing paid and 100 with everything paid.
    #[test]
    fn prop_summary_bounds(
        principal in arb_principal(),
        rate in arb_rate(),
        tenor in 1i32..=60,
        origination in arb_origination(),
    ) {
        let mut loan = loan_from(principal, rate, tenor, origination);
        prop_assert_eq!(summarize(&loan.installments).unwrap().percent_paid, Decimal::ZERO);

        let ids: Vec<String> = loan.installments.iter().map(|i| i.id.clone()).collect();
        for id in &ids {
            mark_paid(&mut loan, id, PaymentMeta::on(origination)).unwrap();
        }
        let summary = summarize(&loan.installments).unwrap();
        prop_assert_eq!(summary.total_unpaid, Decimal::ZERO);
        prop_assert_eq!(summary.percent_paid, Decimal::ONE_HUNDRED);
    }
}
