//! Flat-interest installment schedule generation.
//!
//! Interest is charged on the *original* principal every month, so it does not
//! shrink as the principal is repaid. Every installment in a schedule has the
//! same principal slice, the same interest slice and therefore the same total.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::loans_errors::LoanError;
use super::loans_model::{Installment, InstallmentStatus};
use crate::constants::{MAX_TENOR_MONTHS, MONTHS_PER_YEAR};
use crate::utils::time_utils::installment_due_date;

/// Identifier of the `sequence`-th installment of a schedule.
pub fn installment_id(sequence: u32) -> String {
    format!("installment-{}", sequence)
}

/// Validates loan terms and returns the tenor as a count of months.
///
/// Tenors above [`MAX_TENOR_MONTHS`] are rejected.
pub fn validate_terms(
    principal: Decimal,
    annual_rate_percent: Decimal,
    tenor_months: i32,
) -> Result<u32, LoanError> {
    if principal <= Decimal::ZERO {
        return Err(LoanError::InvalidInput(format!(
            "principal must be positive, got {}",
            principal
        )));
    }
    if annual_rate_percent.is_sign_negative() && !annual_rate_percent.is_zero() {
        return Err(LoanError::InvalidInput(format!(
            "annual interest rate must not be negative, got {}",
            annual_rate_percent
        )));
    }
    let tenor = u32::try_from(tenor_months)
        .ok()
        .filter(|tenor| *tenor > 0)
        .ok_or_else(|| {
            LoanError::InvalidInput(format!(
                "tenor must be a positive number of months, got {}",
                tenor_months
            ))
        })?;
    if tenor > MAX_TENOR_MONTHS {
        return Err(LoanError::InvalidInput(format!(
            "tenor must be at most {} months, got {}",
            MAX_TENOR_MONTHS, tenor
        )));
    }
    Ok(tenor)
}

/// Builds the full installment schedule for the given loan terms.
///
/// Installment `i` falls due on the billing day `i` months after the origination
/// month. All installments start `unpaid`. The remaining principal never goes
/// negative and is exactly zero after the final installment.
pub fn generate_schedule(
    principal: Decimal,
    annual_rate_percent: Decimal,
    tenor_months: i32,
    origination_date: NaiveDate,
) -> Result<Vec<Installment>, LoanError> {
    let tenor = validate_terms(principal, annual_rate_percent, tenor_months)?;
    let too_large = || LoanError::InvalidInput("loan amounts are too large".to_string());

    let monthly_rate = annual_rate_percent / Decimal::ONE_HUNDRED / Decimal::from(MONTHS_PER_YEAR);
    let principal_component = principal
        .checked_div(Decimal::from(tenor))
        .ok_or_else(too_large)?;
    let interest_component = principal.checked_mul(monthly_rate).ok_or_else(too_large)?;
    let total_amount = principal_component
        .checked_add(interest_component)
        .ok_or_else(too_large)?;
    // The sum over the whole schedule must stay representable.
    total_amount
        .checked_mul(Decimal::from(tenor))
        .ok_or_else(too_large)?;

    let mut remaining = principal;
    let mut installments = Vec::with_capacity(tenor as usize);

    for sequence in 1..=tenor {
        remaining -= principal_component;
        let remaining_principal = if sequence == tenor {
            Decimal::ZERO
        } else {
            remaining.max(Decimal::ZERO)
        };

        let due_date = installment_due_date(origination_date, sequence).ok_or_else(|| {
            LoanError::InvalidInput(format!(
                "due date of installment {} is out of range",
                sequence
            ))
        })?;

        installments.push(Installment {
            id: installment_id(sequence),
            sequence,
            due_date,
            principal_component,
            interest_component,
            total_amount,
            remaining_principal,
            status: InstallmentStatus::Unpaid,
            payment_date: None,
            proof_reference: None,
        });
    }

    Ok(installments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reference_schedule() {
        let schedule = generate_schedule(dec!(10000000), dec!(3), 10, date(2024, 1, 1)).unwrap();

        assert_eq!(schedule.len(), 10);
        for (index, installment) in schedule.iter().enumerate() {
            assert_eq!(installment.sequence, index as u32 + 1);
            assert_eq!(installment.principal_component, dec!(1000000));
            assert_eq!(installment.interest_component, dec!(25000));
            assert_eq!(installment.total_amount, dec!(1025000));
            assert_eq!(installment.status, InstallmentStatus::Unpaid);
            assert!(installment.payment_date.is_none());
            assert!(installment.proof_reference.is_none());
        }
        assert_eq!(schedule[0].remaining_principal, dec!(9000000));
        assert_eq!(schedule[8].remaining_principal, dec!(1000000));
        assert_eq!(schedule[9].remaining_principal, Decimal::ZERO);
    }

    #[test]
    fn test_due_dates_start_the_month_after_origination() {
        let schedule = generate_schedule(dec!(10000000), dec!(3), 10, date(2024, 1, 1)).unwrap();
        let due_dates: Vec<NaiveDate> = schedule.iter().map(|i| i.due_date).collect();

        assert_eq!(
            due_dates,
            vec![
                date(2024, 2, 5),
                date(2024, 3, 5),
                date(2024, 4, 5),
                date(2024, 5, 5),
                date(2024, 6, 5),
                date(2024, 7, 5),
                date(2024, 8, 5),
                date(2024, 9, 5),
                date(2024, 10, 5),
                date(2024, 11, 5),
            ]
        );
    }

    #[test]
    fn test_due_dates_roll_over_the_year() {
        let schedule = generate_schedule(dec!(1200), dec!(0), 3, date(2024, 11, 28)).unwrap();
        assert_eq!(schedule[0].due_date, date(2024, 12, 5));
        assert_eq!(schedule[1].due_date, date(2025, 1, 5));
        assert_eq!(schedule[2].due_date, date(2025, 2, 5));
    }

    #[test]
    fn test_installment_ids_follow_sequence() {
        let schedule = generate_schedule(dec!(300), dec!(12), 3, date(2024, 1, 1)).unwrap();
        let ids: Vec<&str> = schedule.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["installment-1", "installment-2", "installment-3"]);
    }

    #[test]
    fn test_non_terminating_split_ends_at_zero() {
        let schedule = generate_schedule(dec!(10000000), dec!(5), 3, date(2024, 1, 1)).unwrap();

        let principal_sum: Decimal = schedule.iter().map(|i| i.principal_component).sum();
        assert!((principal_sum - dec!(10000000)).abs() < dec!(0.01));
        assert_eq!(schedule[2].remaining_principal, Decimal::ZERO);
        assert!(schedule
            .windows(2)
            .all(|pair| pair[0].remaining_principal >= pair[1].remaining_principal));
    }

    #[test]
    fn test_zero_rate_has_no_interest() {
        let schedule = generate_schedule(dec!(600), dec!(0), 6, date(2024, 1, 1)).unwrap();
        assert!(schedule
            .iter()
            .all(|i| i.interest_component.is_zero() && i.total_amount == dec!(100)));
    }

    #[test]
    fn test_rejects_invalid_terms() {
        let start = date(2024, 1, 1);
        assert!(matches!(
            generate_schedule(dec!(1000), dec!(3), 0, start),
            Err(LoanError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_schedule(dec!(1000), dec!(3), -4, start),
            Err(LoanError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_schedule(dec!(0), dec!(3), 12, start),
            Err(LoanError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_schedule(dec!(-5), dec!(3), 12, start),
            Err(LoanError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_schedule(dec!(1000), dec!(-0.5), 12, start),
            Err(LoanError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_tenor_beyond_maximum() {
        let start = date(2024, 1, 1);
        assert!(matches!(
            generate_schedule(dec!(1000), dec!(3), i32::MAX, start),
            Err(LoanError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_terms(dec!(1000), dec!(3), MAX_TENOR_MONTHS as i32 + 1),
            Err(LoanError::InvalidInput(_))
        ));

        let longest =
            generate_schedule(dec!(1200000), dec!(6), MAX_TENOR_MONTHS as i32, start).unwrap();
        assert_eq!(longest.len(), MAX_TENOR_MONTHS as usize);
        assert_eq!(longest[1199].due_date, date(2124, 1, 5));
    }

    #[test]
    fn test_rejects_schedule_whose_total_overflows() {
        let result = generate_schedule(
            dec!(70000000000000000000000000000),
            dec!(100),
            2,
            date(2024, 1, 1),
        );
        assert!(matches!(result, Err(LoanError::InvalidInput(_))));
    }
}
