//! TransactionFactory - the single constructor of ledger transactions
//!
//! The factory is a seeded value. Identities are name-based UUIDs derived
//! from the seed and a canonical rendering of the transaction fields, so
//! the same inputs always produce the same id under the same seed and a
//! different id under any other seed.

use crate::error::{LedgerError, Result};
use crate::finance::constants::DEFAULT_FACTORY_SEED;
use crate::finance::transaction::{
    check_share_fields, CashTransaction, ShareTransaction, Transaction, TransactionId,
};
use crate::order::{OrderType, TransactionDomain};
use crate::types::{Money, Price, Quantity, Timestamp};
use chrono::SecondsFormat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Builds validated, sign-normalized transactions with deterministic ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionFactory {
    seed: u64,
}

impl TransactionFactory {
    /// Create a factory whose identities are derived from `seed`
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn namespace(&self) -> Uuid {
        let name = format!("rusty-ledger/factory/{}", self.seed);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
    }

    /// Derive the identity of a transaction from its stored fields
    pub fn derive_id(
        &self,
        order_type: OrderType,
        ticker: &str,
        settlement_date: Timestamp,
        shares: Quantity,
        price: Price,
        commission: Money,
    ) -> TransactionId {
        let canonical = [
            order_type.code().to_string(),
            ticker.to_string(),
            settlement_date.to_rfc3339_opts(SecondsFormat::Nanos, true),
            canonical_decimal(shares),
            canonical_decimal(price),
            canonical_decimal(commission),
        ]
        .join("|");
        TransactionId(Uuid::new_v5(&self.namespace(), canonical.as_bytes()))
    }

    /// Validate and build a share transaction
    ///
    /// Only the magnitude of `price` is used: opening types store it
    /// positive, closing types negative.
    pub fn construct_share_transaction(
        &self,
        order_type: OrderType,
        ticker: &str,
        settlement_date: Timestamp,
        shares: Quantity,
        price: Price,
        commission: Money,
    ) -> Result<ShareTransaction> {
        check_share_fields(order_type, ticker, shares, commission)?;
        if price.is_zero() {
            return Err(LedgerError::invalid(format!(
                "price must be nonzero for {} of {}",
                order_type, ticker
            )));
        }

        let stored_price = order_type.traits().sign.apply(price);
        let id = self.derive_id(
            order_type,
            ticker,
            settlement_date,
            shares,
            stored_price,
            commission,
        );
        log::debug!(
            "Constructed {} {} x {} @ {} (id {})",
            order_type,
            ticker,
            shares,
            stored_price,
            id
        );

        Ok(ShareTransaction::new_unchecked(
            id,
            order_type,
            ticker.to_string(),
            settlement_date,
            shares,
            stored_price,
            commission,
        ))
    }

    /// Validate and build a cash transaction
    ///
    /// Deposits and dividend receipts store `|amount|`, withdrawals `-|amount|`.
    pub fn construct_cash_transaction(
        &self,
        order_type: OrderType,
        settlement_date: Timestamp,
        amount: Money,
    ) -> Result<CashTransaction> {
        if !order_type.is_cash() {
            return Err(LedgerError::invalid(format!(
                "{} is not a cash transaction type",
                order_type
            )));
        }

        let stored = if amount.is_zero() {
            Money::ZERO
        } else {
            order_type.traits().sign.apply(amount)
        };
        let id = self.derive_id(
            order_type,
            "",
            settlement_date,
            Quantity::ZERO,
            Price::ZERO,
            stored,
        );
        log::debug!("Constructed {} of {} (id {})", order_type, stored, id);

        Ok(CashTransaction::new_unchecked(
            id,
            order_type,
            settlement_date,
            stored,
        ))
    }

    /// Build any transaction from raw field values
    ///
    /// Share types read `ticker`, `shares`, `price` and `commission`; cash
    /// types read only `amount`.
    #[allow(clippy::too_many_arguments)]
    pub fn construct_transaction(
        &self,
        order_type: OrderType,
        ticker: &str,
        settlement_date: Timestamp,
        shares: Quantity,
        price: Price,
        commission: Money,
        amount: Money,
    ) -> Result<Transaction> {
        match order_type.domain() {
            TransactionDomain::Share => self
                .construct_share_transaction(
                    order_type,
                    ticker,
                    settlement_date,
                    shares,
                    price,
                    commission,
                )
                .map(Transaction::Share),
            TransactionDomain::Cash => self
                .construct_cash_transaction(order_type, settlement_date, amount)
                .map(Transaction::Cash),
        }
    }

    pub fn construct_buy(
        &self,
        ticker: &str,
        settlement_date: Timestamp,
        shares: Quantity,
        price: Price,
        commission: Money,
    ) -> Result<ShareTransaction> {
        self.construct_share_transaction(
            OrderType::Buy,
            ticker,
            settlement_date,
            shares,
            price,
            commission,
        )
    }

    pub fn construct_sell(
        &self,
        ticker: &str,
        settlement_date: Timestamp,
        shares: Quantity,
        price: Price,
        commission: Money,
    ) -> Result<ShareTransaction> {
        self.construct_share_transaction(
            OrderType::Sell,
            ticker,
            settlement_date,
            shares,
            price,
            commission,
        )
    }

    pub fn construct_sell_short(
        &self,
        ticker: &str,
        settlement_date: Timestamp,
        shares: Quantity,
        price: Price,
        commission: Money,
    ) -> Result<ShareTransaction> {
        self.construct_share_transaction(
            OrderType::SellShort,
            ticker,
            settlement_date,
            shares,
            price,
            commission,
        )
    }

    pub fn construct_buy_to_cover(
        &self,
        ticker: &str,
        settlement_date: Timestamp,
        shares: Quantity,
        price: Price,
        commission: Money,
    ) -> Result<ShareTransaction> {
        self.construct_share_transaction(
            OrderType::BuyToCover,
            ticker,
            settlement_date,
            shares,
            price,
            commission,
        )
    }

    /// Reinvested dividends never carry a commission
    pub fn construct_dividend_reinvestment(
        &self,
        ticker: &str,
        settlement_date: Timestamp,
        shares: Quantity,
        price: Price,
    ) -> Result<ShareTransaction> {
        self.construct_share_transaction(
            OrderType::DividendReinvestment,
            ticker,
            settlement_date,
            shares,
            price,
            Money::ZERO,
        )
    }

    pub fn construct_deposit(
        &self,
        settlement_date: Timestamp,
        amount: Money,
    ) -> Result<CashTransaction> {
        self.construct_cash_transaction(OrderType::Deposit, settlement_date, amount)
    }

    pub fn construct_withdrawal(
        &self,
        settlement_date: Timestamp,
        amount: Money,
    ) -> Result<CashTransaction> {
        self.construct_cash_transaction(OrderType::Withdrawal, settlement_date, amount)
    }

    pub fn construct_dividend_receipt(
        &self,
        settlement_date: Timestamp,
        amount: Money,
    ) -> Result<CashTransaction> {
        self.construct_cash_transaction(OrderType::DividendReceipt, settlement_date, amount)
    }
}

impl Default for TransactionFactory {
    fn default() -> Self {
        Self::new(DEFAULT_FACTORY_SEED)
    }
}

/// Trailing zeros removed so `5` and `5.00` hash alike
fn canonical_decimal(d: Decimal) -> String {
    let normalized = d.normalize();
    if normalized.is_zero() {
        "0".to_string()
    } else {
        normalized.to_string()
    }
}
