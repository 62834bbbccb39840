use std::time::Duration;

/// Day of the month every installment falls due on.
pub const BILLING_DAY_OF_MONTH: u32 = 5;

/// Longest accepted loan tenor (100 years).
pub const MAX_TENOR_MONTHS: u32 = 1200;

/// Months in a year, used to turn an annual rate into a monthly one.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Default freshness window of the loan read cache.
pub const DEFAULT_LOAN_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Date format used on every wire and storage boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
