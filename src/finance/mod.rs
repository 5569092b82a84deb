//! Finance module - transactions, factory, cash accounts, holdings, profit

pub mod account;
pub mod constants;
pub mod factory;
pub mod holding;
pub mod portfolio;
pub mod profit;
pub mod transaction;

pub use account::{CashAccount, CashLedger, MarginableCashAccount};
pub use factory::TransactionFactory;
pub use holding::{Holding, HoldingFactory, PositionSide};
pub use portfolio::Portfolio;
pub use profit::ProfitCalculator;
pub use transaction::{
    is_closing_transaction, is_opening_transaction, CashTransaction, ShareTransaction,
    Transaction, TransactionId,
};
