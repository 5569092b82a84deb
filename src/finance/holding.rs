//! Holding - a completed position built from an opening and a closing leg

use crate::error::{LedgerError, Result};
use crate::finance::transaction::ShareTransaction;
use crate::order::OrderType;
use crate::types::{Money, Price, Quantity};
use serde::{Deserialize, Serialize};

/// Direction of the closed position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

/// Closed position summary used for profit computation
///
/// Prices are positive per-share magnitudes regardless of side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HoldingRecord")]
pub struct Holding {
    shares: Quantity,
    open_price: Price,
    close_price: Price,
    open_commission: Money,
    close_commission: Money,
    side: PositionSide,
    ticker: Option<String>,
}

impl Holding {
    pub fn shares(&self) -> Quantity {
        self.shares
    }

    pub fn open_price(&self) -> Price {
        self.open_price
    }

    pub fn close_price(&self) -> Price {
        self.close_price
    }

    pub fn open_commission(&self) -> Money {
        self.open_commission
    }

    pub fn close_commission(&self) -> Money {
        self.close_commission
    }

    pub fn side(&self) -> PositionSide {
        self.side
    }

    /// Ticker when built from transactions
    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }
}

#[derive(Deserialize)]
struct HoldingRecord {
    shares: Quantity,
    open_price: Price,
    close_price: Price,
    open_commission: Money,
    close_commission: Money,
    side: PositionSide,
    ticker: Option<String>,
}

impl TryFrom<HoldingRecord> for Holding {
    type Error = LedgerError;

    fn try_from(r: HoldingRecord) -> Result<Self> {
        check_holding_fields(r.shares, r.open_commission, r.close_commission)?;
        Ok(Holding {
            shares: r.shares,
            open_price: r.open_price,
            close_price: r.close_price,
            open_commission: r.open_commission,
            close_commission: r.close_commission,
            side: r.side,
            ticker: r.ticker,
        })
    }
}

fn check_holding_fields(
    shares: Quantity,
    open_commission: Money,
    close_commission: Money,
) -> Result<()> {
    if shares < Quantity::ZERO {
        return Err(LedgerError::invalid(format!(
            "holding shares must not be negative, got {}",
            shares
        )));
    }
    if open_commission < Money::ZERO || close_commission < Money::ZERO {
        return Err(LedgerError::invalid(format!(
            "holding commissions must not be negative, got {} and {}",
            open_commission, close_commission
        )));
    }
    Ok(())
}

/// Builds holdings from scalars or from matched transactions
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldingFactory;

impl HoldingFactory {
    /// Long holding from raw values
    pub fn construct_holding(
        shares: Quantity,
        open_price: Price,
        close_price: Price,
        open_commission: Money,
        close_commission: Money,
    ) -> Result<Holding> {
        check_holding_fields(shares, open_commission, close_commission)?;

        Ok(Holding {
            shares,
            open_price,
            close_price,
            open_commission,
            close_commission,
            side: PositionSide::Long,
            ticker: None,
        })
    }

    /// Pair an opening transaction with the closing transaction that ends it
    ///
    /// The closed quantity is the smaller of the two legs; each leg's
    /// commission is prorated to the closed quantity.
    pub fn from_transactions(open: &ShareTransaction, close: &ShareTransaction) -> Result<Holding> {
        if open.ticker() != close.ticker() {
            return Err(LedgerError::invalid(format!(
                "cannot pair {} with {}",
                open.ticker(),
                close.ticker()
            )));
        }

        let side = match (open.order_type(), close.order_type()) {
            (OrderType::Buy | OrderType::DividendReinvestment, OrderType::Sell) => {
                PositionSide::Long
            }
            (OrderType::SellShort, OrderType::BuyToCover) => PositionSide::Short,
            (o, c) => {
                return Err(LedgerError::invalid(format!(
                    "{} cannot be closed by {}",
                    o, c
                )))
            }
        };

        let shares = open.shares().min(close.shares());
        let prorate = |commission: Money, leg: Quantity| commission * shares / leg;

        Ok(Holding {
            shares,
            open_price: open.price().abs(),
            close_price: close.price().abs(),
            open_commission: prorate(open.commission(), open.shares()),
            close_commission: prorate(close.commission(), close.shares()),
            side,
            ticker: Some(open.ticker().to_string()),
        })
    }
}
