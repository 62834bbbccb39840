//! Conversion helpers shared by the row models.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

/// Parses a decimal stored as text.
pub fn parse_decimal(value: &str, field: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value)
        .map_err(|e| StorageError::CorruptRow(format!("{} '{}': {}", field, value, e)))
}

/// Converts a stored integer that must not be negative.
pub fn non_negative(value: i32, field: &str) -> Result<u32, StorageError> {
    u32::try_from(value)
        .map_err(|_| StorageError::CorruptRow(format!("{} is negative: {}", field, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_keeps_precision() {
        let value = parse_decimal("3333333.333333333333333333333", "principal_component").unwrap();
        assert_eq!(value.to_string(), "3333333.333333333333333333333");
    }

    #[test]
    fn test_bad_values_are_corrupt_rows() {
        assert!(matches!(
            parse_decimal("12,5", "amount"),
            Err(StorageError::CorruptRow(_))
        ));
        assert!(matches!(
            non_negative(-1, "sequence"),
            Err(StorageError::CorruptRow(_))
        ));
        assert_eq!(non_negative(7, "sequence").unwrap(), 7);
    }
}
