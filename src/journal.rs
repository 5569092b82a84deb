//! CSV journal of raw transaction fields
//!
//! Each row is handed to the [`TransactionFactory`], so a journal can only
//! ever yield valid transactions. Expected header:
//!
//! ```text
//! order_type,ticker,settlement_date,shares,price,commission,amount
//! ```
//!
//! Share rows leave `amount` empty, cash rows leave `ticker`, `shares`,
//! `price` and `commission` empty. Dates are `YYYY-MM-DD` (midnight UTC) or
//! RFC 3339.

use crate::error::{LedgerError, Result};
use crate::finance::{Transaction, TransactionFactory};
use crate::order::OrderType;
use crate::types::Timestamp;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io;
use std::str::FromStr;

/// One journal row, as text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub order_type: String,
    #[serde(default)]
    pub ticker: String,
    pub settlement_date: String,
    #[serde(default)]
    pub shares: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub commission: String,
    #[serde(default)]
    pub amount: String,
}

impl JournalRecord {
    /// Build the transaction this row describes
    pub fn to_transaction(&self, factory: &TransactionFactory) -> Result<Transaction> {
        let order_type = OrderType::from_str(&self.order_type)?;
        let date = parse_date(&self.settlement_date)?;
        factory.construct_transaction(
            order_type,
            self.ticker.trim(),
            date,
            parse_decimal("shares", &self.shares)?,
            parse_decimal("price", &self.price)?,
            parse_decimal("commission", &self.commission)?,
            parse_decimal("amount", &self.amount)?,
        )
    }

    /// Row describing an existing transaction
    pub fn from_transaction(transaction: &Transaction) -> Self {
        let settlement_date = transaction
            .settlement_date()
            .to_rfc3339_opts(SecondsFormat::Nanos, true);
        match transaction {
            Transaction::Share(t) => JournalRecord {
                order_type: t.order_type().code().to_string(),
                ticker: t.ticker().to_string(),
                settlement_date,
                shares: t.shares().to_string(),
                price: t.price().abs().to_string(),
                commission: t.commission().to_string(),
                amount: String::new(),
            },
            Transaction::Cash(t) => JournalRecord {
                order_type: t.order_type().code().to_string(),
                settlement_date,
                amount: t.amount().to_string(),
                ..Default::default()
            },
        }
    }
}

/// Parse `YYYY-MM-DD` as midnight UTC, or a full RFC 3339 timestamp
pub fn parse_date(text: &str) -> Result<Timestamp> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| LedgerError::invalid(format!("invalid date '{}'", text)));
    }
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| LedgerError::invalid(format!("invalid date '{}': {}", text, e)))
}

/// Empty fields read as zero
fn parse_decimal(field: &str, text: &str) -> Result<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(text)
        .map_err(|e| LedgerError::invalid(format!("invalid {} '{}': {}", field, text, e)))
}

/// Read every row; the first bad row fails the whole journal
pub fn read_journal<R: io::Read>(
    reader: R,
    factory: &TransactionFactory,
) -> Result<Vec<Transaction>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut transactions = Vec::new();

    for (idx, row) in csv_reader.deserialize::<JournalRecord>().enumerate() {
        // header is line 1
        let line = idx + 2;
        let record = row?;
        let transaction = record.to_transaction(factory).map_err(|e| match e {
            LedgerError::InvalidArgument(msg) => {
                LedgerError::InvalidArgument(format!("line {}: {}", line, msg))
            }
            other => other,
        })?;
        transactions.push(transaction);
    }

    log::debug!("Read {} journal rows", transactions.len());
    Ok(transactions)
}

/// Read every row, skipping (and logging) rows that fail to parse or validate
pub fn read_journal_lenient<R: io::Read>(
    reader: R,
    factory: &TransactionFactory,
) -> Vec<Transaction> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut transactions = Vec::new();

    for (idx, row) in csv_reader.deserialize::<JournalRecord>().enumerate() {
        let line = idx + 2;
        match row
            .map_err(LedgerError::from)
            .and_then(|r| r.to_transaction(factory))
        {
            Ok(t) => transactions.push(t),
            Err(e) => log::warn!("Skipping journal line {}: {}", line, e),
        }
    }

    transactions
}

/// Write transactions as journal rows, header included
pub fn write_journal<W: io::Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for transaction in transactions {
        csv_writer.serialize(JournalRecord::from_transaction(transaction))?;
    }
    csv_writer.flush()?;
    Ok(())
}
