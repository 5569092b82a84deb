//! Transaction - a single ledger event
//!
//! Transactions are only built by [`TransactionFactory`](super::TransactionFactory)
//! or by deserialization, and both paths validate. Once a value exists it is
//! known to respect the sign and range rules of its order type, so nothing
//! downstream re-checks them.

use crate::error::{LedgerError, Result};
use crate::order::{CommissionRule, OrderType, TransactionDomain};
use crate::types::{Money, Price, Quantity, Ticker, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Deterministic transaction identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub Uuid);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Purchase, sale, short sale, cover or dividend reinvestment of shares
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ShareTransactionRecord")]
pub struct ShareTransaction {
    id: TransactionId,
    ticker: Ticker,
    settlement_date: Timestamp,
    /// Positive for opening (paid out), negative for closing (received)
    price: Price,
    shares: Quantity,
    commission: Money,
    order_type: OrderType,
}

impl ShareTransaction {
    pub(crate) fn new_unchecked(
        id: TransactionId,
        order_type: OrderType,
        ticker: Ticker,
        settlement_date: Timestamp,
        shares: Quantity,
        price: Price,
        commission: Money,
    ) -> Self {
        Self {
            id,
            ticker,
            settlement_date,
            price,
            shares,
            commission,
            order_type,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn settlement_date(&self) -> Timestamp {
        self.settlement_date
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn shares(&self) -> Quantity {
        self.shares
    }

    pub fn commission(&self) -> Money {
        self.commission
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Signed cash-flow impact including commission
    ///
    /// Opening: `shares * price + commission`. Closing: `shares * price - commission`.
    pub fn total_value(&self) -> Money {
        let gross = self.shares * self.price;
        if self.order_type.is_closing() {
            gross - self.commission
        } else {
            gross + self.commission
        }
    }

    /// Change in held shares: positive adds to the position, negative removes
    pub fn share_delta(&self) -> Quantity {
        self.shares * Quantity::from(self.order_type.traits().share_direction)
    }

    /// Cash the trade moves into (positive) or out of (negative) the account
    ///
    /// Short sales bring in their proceeds even though their stored price is
    /// positive; commissions always flow out.
    pub fn cash_flow(&self) -> Money {
        -self.share_delta() * self.price.abs() - self.commission
    }

    pub fn is_opening(&self) -> bool {
        self.order_type.is_opening()
    }

    pub fn is_closing(&self) -> bool {
        self.order_type.is_closing()
    }
}

/// Wire form of [`ShareTransaction`], validated on the way in
#[derive(Deserialize)]
struct ShareTransactionRecord {
    id: TransactionId,
    ticker: Ticker,
    settlement_date: Timestamp,
    price: Price,
    shares: Quantity,
    commission: Money,
    order_type: OrderType,
}

impl TryFrom<ShareTransactionRecord> for ShareTransaction {
    type Error = LedgerError;

    fn try_from(r: ShareTransactionRecord) -> Result<Self> {
        check_share_fields(r.order_type, &r.ticker, r.shares, r.commission)?;
        let traits = r.order_type.traits();
        if !traits.sign.holds_for(r.price) {
            return Err(LedgerError::invalid(format!(
                "stored price {} has the wrong sign for {}",
                r.price, r.order_type
            )));
        }
        Ok(ShareTransaction::new_unchecked(
            r.id,
            r.order_type,
            r.ticker,
            r.settlement_date,
            r.shares,
            r.price,
            r.commission,
        ))
    }
}

/// Validation shared by the factory and deserialization
pub(crate) fn check_share_fields(
    order_type: OrderType,
    ticker: &str,
    shares: Quantity,
    commission: Money,
) -> Result<()> {
    let traits = order_type.traits();
    if traits.domain != TransactionDomain::Share {
        return Err(LedgerError::invalid(format!(
            "{} is not a share transaction",
            order_type
        )));
    }
    if ticker.trim().is_empty() {
        return Err(LedgerError::invalid("ticker must not be empty"));
    }
    if shares <= Quantity::ZERO {
        return Err(LedgerError::invalid(format!(
            "shares must be greater than zero, got {}",
            shares
        )));
    }
    if commission < Money::ZERO {
        return Err(LedgerError::invalid(format!(
            "commission must not be negative, got {}",
            commission
        )));
    }
    if traits.commission == CommissionRule::MustBeZero && !commission.is_zero() {
        return Err(LedgerError::invalid(format!(
            "{} must carry zero commission, got {}",
            order_type, commission
        )));
    }
    Ok(())
}

/// Deposit, withdrawal or dividend receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CashTransactionRecord")]
pub struct CashTransaction {
    id: TransactionId,
    settlement_date: Timestamp,
    /// Positive for deposits and dividends, negative for withdrawals
    amount: Money,
    order_type: OrderType,
}

impl CashTransaction {
    pub(crate) fn new_unchecked(
        id: TransactionId,
        order_type: OrderType,
        settlement_date: Timestamp,
        amount: Money,
    ) -> Self {
        Self {
            id,
            settlement_date,
            amount,
            order_type,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn settlement_date(&self) -> Timestamp {
        self.settlement_date
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn is_withdrawal(&self) -> bool {
        self.order_type == OrderType::Withdrawal
    }
}

#[derive(Deserialize)]
struct CashTransactionRecord {
    id: TransactionId,
    settlement_date: Timestamp,
    amount: Money,
    order_type: OrderType,
}

impl TryFrom<CashTransactionRecord> for CashTransaction {
    type Error = LedgerError;

    fn try_from(r: CashTransactionRecord) -> Result<Self> {
        if !r.order_type.is_cash() {
            return Err(LedgerError::invalid(format!(
                "{} is not a cash transaction",
                r.order_type
            )));
        }
        if r.order_type.traits().sign.apply(r.amount) != r.amount {
            return Err(LedgerError::invalid(format!(
                "stored amount {} has the wrong sign for {}",
                r.amount, r.order_type
            )));
        }
        Ok(CashTransaction::new_unchecked(
            r.id,
            r.order_type,
            r.settlement_date,
            r.amount,
        ))
    }
}

/// Any ledger event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transaction {
    Share(ShareTransaction),
    Cash(CashTransaction),
}

impl Transaction {
    pub fn id(&self) -> TransactionId {
        match self {
            Transaction::Share(t) => t.id(),
            Transaction::Cash(t) => t.id(),
        }
    }

    pub fn settlement_date(&self) -> Timestamp {
        match self {
            Transaction::Share(t) => t.settlement_date(),
            Transaction::Cash(t) => t.settlement_date(),
        }
    }

    pub fn order_type(&self) -> OrderType {
        match self {
            Transaction::Share(t) => t.order_type(),
            Transaction::Cash(t) => t.order_type(),
        }
    }

    pub fn as_share(&self) -> Option<&ShareTransaction> {
        match self {
            Transaction::Share(t) => Some(t),
            Transaction::Cash(_) => None,
        }
    }

    pub fn as_cash(&self) -> Option<&CashTransaction> {
        match self {
            Transaction::Cash(t) => Some(t),
            Transaction::Share(_) => None,
        }
    }
}

impl From<ShareTransaction> for Transaction {
    fn from(t: ShareTransaction) -> Self {
        Transaction::Share(t)
    }
}

impl From<CashTransaction> for Transaction {
    fn from(t: CashTransaction) -> Self {
        Transaction::Cash(t)
    }
}

/// True for transactions that establish or increase a position
pub fn is_opening_transaction(transaction: &Transaction) -> bool {
    transaction.order_type().is_opening()
}

/// True for transactions that reduce or terminate a position
pub fn is_closing_transaction(transaction: &Transaction) -> bool {
    transaction.order_type().is_closing()
}
