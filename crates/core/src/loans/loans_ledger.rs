//! Installment status transitions and loan-level aggregates.

use rust_decimal::Decimal;

use super::loans_errors::LoanError;
use super::loans_model::{Installment, InstallmentStatus, Loan, LoanSummary, PaymentMeta};

pub fn find_installment<'a>(
    loan: &'a Loan,
    installment_id: &str,
) -> Result<&'a Installment, LoanError> {
    loan.installments
        .iter()
        .find(|i| i.id == installment_id)
        .ok_or_else(|| installment_not_found(loan, installment_id))
}

fn find_installment_mut<'a>(
    loan: &'a mut Loan,
    installment_id: &str,
) -> Result<&'a mut Installment, LoanError> {
    let loan_id = loan.id.clone();
    loan.installments
        .iter_mut()
        .find(|i| i.id == installment_id)
        .ok_or_else(|| LoanError::InstallmentNotFound {
            loan_id,
            installment_id: installment_id.to_string(),
        })
}

fn installment_not_found(loan: &Loan, installment_id: &str) -> LoanError {
    LoanError::InstallmentNotFound {
        loan_id: loan.id.clone(),
        installment_id: installment_id.to_string(),
    }
}

/// Moves an unpaid installment to `paid`, recording the payment metadata.
///
/// Only the targeted installment changes. Returns its updated state.
pub fn mark_paid(
    loan: &mut Loan,
    installment_id: &str,
    meta: PaymentMeta,
) -> Result<Installment, LoanError> {
    let installment = find_installment_mut(loan, installment_id)?;
    if installment.is_paid() {
        return Err(LoanError::InvalidTransition {
            installment_id: installment.id.clone(),
            status: installment.status,
            action: "mark paid",
        });
    }

    installment.status = InstallmentStatus::Paid;
    installment.payment_date = Some(meta.payment_date);
    installment.proof_reference = meta.proof_reference;
    Ok(installment.clone())
}

/// Moves a paid installment back to `unpaid` and clears its payment metadata.
pub fn cancel_payment(loan: &mut Loan, installment_id: &str) -> Result<Installment, LoanError> {
    let installment = find_installment_mut(loan, installment_id)?;
    if !installment.is_paid() {
        return Err(LoanError::InvalidTransition {
            installment_id: installment.id.clone(),
            status: installment.status,
            action: "cancel payment",
        });
    }

    installment.status = InstallmentStatus::Unpaid;
    installment.payment_date = None;
    installment.proof_reference = None;
    Ok(installment.clone())
}

/// Totals over a set of installments.
///
/// `percent_paid` is left unrounded; display code rounds it. Fails with
/// `AmountOverflow` when a total does not fit in a `Decimal`.
pub fn summarize(installments: &[Installment]) -> Result<LoanSummary, LoanError> {
    let mut total_paid = Decimal::ZERO;
    let mut total_unpaid = Decimal::ZERO;
    let mut paid_count = 0usize;

    for installment in installments {
        let total = if installment.is_paid() {
            paid_count += 1;
            &mut total_paid
        } else {
            &mut total_unpaid
        };
        *total = total
            .checked_add(installment.total_amount)
            .ok_or(LoanError::AmountOverflow)?;
    }

    let owed = total_paid
        .checked_add(total_unpaid)
        .ok_or(LoanError::AmountOverflow)?;
    let percent_paid = if owed.is_zero() {
        Decimal::ZERO
    } else {
        total_paid / owed * Decimal::ONE_HUNDRED
    };

    Ok(LoanSummary {
        total_paid,
        total_unpaid,
        percent_paid,
        paid_count,
        installment_count: installments.len(),
    })
}
