//! Core types shared across the ledger

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Timestamp type used throughout the library (settlement dates, bar dates)
pub type Timestamp = DateTime<Utc>;

/// Ticker symbol
pub type Ticker = String;

/// Signed amount of money
pub type Money = Decimal;

/// Share quantity
pub type Quantity = Decimal;

/// Per-share price
pub type Price = Decimal;
