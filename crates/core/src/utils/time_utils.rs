use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, Utc};

use crate::constants::{BILLING_DAY_OF_MONTH, DATE_FORMAT};
use crate::errors::{Result, ValidationError};

/// Due date of the `sequence`-th installment (1-based) of a loan originated on `origination`.
///
/// The origination day is normalized to the billing day, then moved forward
/// `sequence` months, so the first installment falls due the month after origination.
pub fn installment_due_date(origination: NaiveDate, sequence: u32) -> Option<NaiveDate> {
    origination
        .with_day(BILLING_DAY_OF_MONTH)?
        .checked_add_months(Months::new(sequence))
}

/// Parses a `YYYY-MM-DD` date coming from the presentation layer.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField("date".to_string()).into());
    }
    Ok(NaiveDate::parse_from_str(trimmed, DATE_FORMAT)?)
}

/// `YYYY-MM` bucket key for monthly aggregates.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}
