//! # rusty-ledger
//!
//! Brokerage position tracking: share and cash transactions, cash accounts
//! (plain and marginable), holdings and profit.
//!
//! Transactions are built only through a seeded [`TransactionFactory`],
//! which validates inputs, normalizes signs per order type and assigns a
//! deterministic identity.
//!
//! ## Example
//!
//! ```rust
//! use rusty_ledger::prelude::*;
//! use chrono::{TimeZone, Utc};
//! use rust_decimal_macros::dec;
//!
//! let factory = TransactionFactory::new(42);
//! let date = Utc.with_ymd_and_hms(2011, 1, 3, 0, 0, 0).unwrap();
//!
//! let mut account = CashAccount::new(factory);
//! account.deposit(date, dec!(500)).unwrap();
//! account.withdraw(date, dec!(500)).unwrap();
//! assert_eq!(account.cash_balance(date), dec!(0));
//!
//! let holding = HoldingFactory::construct_holding(dec!(5), dec!(10), dec!(20), dec!(2), dec!(3)).unwrap();
//! assert_eq!(ProfitCalculator::net_profit(&holding), dec!(45));
//! ```
//!
//! [`TransactionFactory`]: finance::TransactionFactory

pub mod config;
pub mod data;
pub mod error;
pub mod finance;
pub mod journal;
pub mod order;
pub mod types;
pub mod universe;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::config::LedgerConfig;
    pub use crate::data::{InMemoryPriceSource, PriceBar, PriceSeries, PriceSource, Resolution};
    pub use crate::error::{LedgerError, Result};
    pub use crate::finance::{
        is_closing_transaction, is_opening_transaction, CashAccount, CashLedger,
        CashTransaction, Holding, HoldingFactory, MarginableCashAccount, Portfolio,
        PositionSide, ProfitCalculator, ShareTransaction, Transaction, TransactionFactory,
        TransactionId,
    };
    pub use crate::order::{OrderType, PositionEffect, TransactionDomain};
    pub use crate::types::*;
    pub use crate::universe::IndexMembership;
}
