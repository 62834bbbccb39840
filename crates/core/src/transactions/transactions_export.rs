//! CSV export of transactions.

use csv::WriterBuilder;

use super::transactions_model::Transaction;
use crate::constants::DATE_FORMAT;
use crate::errors::{Error, Result};

pub const CSV_HEADER: [&str; 7] = [
    "id",
    "date",
    "type",
    "main_category",
    "sub_category",
    "amount",
    "description",
];

/// Writes `transactions` as CSV in the order given, header first.
pub fn transactions_to_csv(transactions: &[Transaction]) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(csv_error)?;

    for transaction in transactions {
        let date = transaction.date.format(DATE_FORMAT).to_string();
        let amount = transaction.amount.normalize().to_string();
        writer
            .write_record([
                transaction.id.as_str(),
                date.as_str(),
                transaction.transaction_type.as_str(),
                transaction.main_category.label(),
                transaction.sub_category.label(),
                amount.as_str(),
                transaction.description.as_str(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Unexpected(format!("Failed to flush CSV export: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::Unexpected(format!("CSV export is not valid UTF-8: {}", e)))
}

fn csv_error(err: csv::Error) -> Error {
    Error::Unexpected(format!("Failed to write CSV export: {}", err))
}
