//! Cash accounts - append-only logs of cash transactions
//!
//! The balance at a date is the sum of every amount settled on or before
//! that date; insertion order does not matter. A marginable account may run
//! negative down to `-maximum_margin`. Breaches are reported through
//! [`CashLedger::transaction_is_valid`] rather than refused, so callers can
//! check a withdrawal before recording it.

use crate::error::{LedgerError, Result};
use crate::finance::constants::DEFAULT_MAXIMUM_MARGIN;
use crate::finance::factory::TransactionFactory;
use crate::finance::transaction::CashTransaction;
use crate::types::{Money, Timestamp};
use serde::{Deserialize, Serialize};

/// Behaviour shared by plain and marginable cash accounts
pub trait CashLedger {
    /// Factory used by `deposit`, `withdraw` and `receive_dividend`
    fn factory(&self) -> &TransactionFactory;

    /// All recorded transactions, in insertion order
    fn transactions(&self) -> &[CashTransaction];

    /// Append a transaction to the log
    fn record(&mut self, transaction: CashTransaction);

    /// Whether recording `transaction` keeps the account within its constraints
    fn transaction_is_valid(&self, transaction: &CashTransaction) -> bool;

    fn deposit(&mut self, date: Timestamp, amount: Money) -> Result<CashTransaction> {
        let transaction = self.factory().construct_deposit(date, amount)?;
        self.record(transaction);
        Ok(transaction)
    }

    fn withdraw(&mut self, date: Timestamp, amount: Money) -> Result<CashTransaction> {
        let transaction = self.factory().construct_withdrawal(date, amount)?;
        self.record(transaction);
        Ok(transaction)
    }

    fn receive_dividend(&mut self, date: Timestamp, amount: Money) -> Result<CashTransaction> {
        let transaction = self.factory().construct_dividend_receipt(date, amount)?;
        self.record(transaction);
        Ok(transaction)
    }

    /// Sum of all amounts settled on or before `date`
    fn cash_balance(&self, date: Timestamp) -> Money {
        self.transactions()
            .iter()
            .filter(|t| t.settlement_date() <= date)
            .map(|t| t.amount())
            .sum()
    }
}

/// Plain cash account: any balance, including negative, is allowed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashAccount {
    factory: TransactionFactory,
    transactions: Vec<CashTransaction>,
}

impl CashAccount {
    pub fn new(factory: TransactionFactory) -> Self {
        Self {
            factory,
            transactions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl CashLedger for CashAccount {
    fn factory(&self) -> &TransactionFactory {
        &self.factory
    }

    fn transactions(&self) -> &[CashTransaction] {
        &self.transactions
    }

    fn record(&mut self, transaction: CashTransaction) {
        log::debug!(
            "Recording {} of {} on {}",
            transaction.order_type(),
            transaction.amount(),
            transaction.settlement_date()
        );
        self.transactions.push(transaction);
    }

    fn transaction_is_valid(&self, _transaction: &CashTransaction) -> bool {
        true
    }
}

/// Cash account that may borrow up to `maximum_margin`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MarginableCashAccountRecord")]
pub struct MarginableCashAccount {
    account: CashAccount,
    maximum_margin: Money,
}

impl MarginableCashAccount {
    /// Create an account; a negative margin ceiling is rejected
    pub fn new(factory: TransactionFactory, maximum_margin: Money) -> Result<Self> {
        check_maximum_margin(maximum_margin)?;
        Ok(Self {
            account: CashAccount::new(factory),
            maximum_margin,
        })
    }

    /// Account with the default (zero) margin ceiling
    pub fn without_margin(factory: TransactionFactory) -> Self {
        Self {
            account: CashAccount::new(factory),
            maximum_margin: DEFAULT_MAXIMUM_MARGIN,
        }
    }

    pub fn maximum_margin(&self) -> Money {
        self.maximum_margin
    }

    /// Lowest balance the account may reach
    pub fn margin_floor(&self) -> Money {
        -self.maximum_margin
    }

    /// Whether the balance is at or above the margin floor on every settlement
    /// date in the log
    pub fn is_within_margin(&self) -> bool {
        let floor = self.margin_floor();
        self.account
            .transactions
            .iter()
            .all(|t| self.cash_balance(t.settlement_date()) >= floor)
    }
}

fn check_maximum_margin(maximum_margin: Money) -> Result<()> {
    if maximum_margin < Money::ZERO {
        return Err(LedgerError::invalid(format!(
            "maximum margin must not be negative, got {}",
            maximum_margin
        )));
    }
    Ok(())
}

#[derive(Deserialize)]
struct MarginableCashAccountRecord {
    account: CashAccount,
    maximum_margin: Money,
}

impl TryFrom<MarginableCashAccountRecord> for MarginableCashAccount {
    type Error = LedgerError;

    fn try_from(r: MarginableCashAccountRecord) -> Result<Self> {
        check_maximum_margin(r.maximum_margin)?;
        Ok(Self {
            account: r.account,
            maximum_margin: r.maximum_margin,
        })
    }
}

impl Default for MarginableCashAccount {
    fn default() -> Self {
        Self::without_margin(TransactionFactory::default())
    }
}

impl CashLedger for MarginableCashAccount {
    fn factory(&self) -> &TransactionFactory {
        &self.account.factory
    }

    fn transactions(&self) -> &[CashTransaction] {
        &self.account.transactions
    }

    fn record(&mut self, transaction: CashTransaction) {
        if !self.transaction_is_valid(&transaction) {
            log::warn!(
                "Withdrawal of {} on {} takes the balance below the margin floor {}",
                transaction.amount(),
                transaction.settlement_date(),
                self.margin_floor()
            );
        }
        self.account.record(transaction);
    }

    /// Deposits are always valid. A withdrawal is judged as if it were about
    /// to be recorded: it is valid when the balance stays at or above
    /// `-maximum_margin` on its settlement date and on every later settlement
    /// date already in the log.
    fn transaction_is_valid(&self, transaction: &CashTransaction) -> bool {
        if transaction.amount() >= Money::ZERO {
            return true;
        }

        let settled = transaction.settlement_date();
        let floor = self.margin_floor();
        std::iter::once(settled)
            .chain(
                self.account
                    .transactions
                    .iter()
                    .map(|t| t.settlement_date())
                    .filter(|d| *d > settled),
            )
            .all(|date| self.cash_balance(date) + transaction.amount() >= floor)
    }
}
