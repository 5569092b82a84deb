//! Portfolio - share transactions plus the cash account they settle against

use crate::data::PriceSource;
use crate::error::{LedgerError, Result};
use crate::finance::account::{CashAccount, CashLedger};
use crate::finance::transaction::{ShareTransaction, Transaction};
use crate::types::{Money, Quantity, Timestamp};
use crate::universe::IndexMembership;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Share log and cash account of one brokerage account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio<A = CashAccount> {
    cash: A,
    trades: Vec<ShareTransaction>,
}

impl<A: CashLedger> Portfolio<A> {
    pub fn new(cash: A) -> Self {
        Self {
            cash,
            trades: Vec::new(),
        }
    }

    pub fn cash_account(&self) -> &A {
        &self.cash
    }

    pub fn cash_account_mut(&mut self) -> &mut A {
        &mut self.cash
    }

    pub fn trades(&self) -> &[ShareTransaction] {
        &self.trades
    }

    /// Route a transaction to the share log or the cash account
    pub fn record(&mut self, transaction: Transaction) {
        match transaction {
            Transaction::Share(t) => {
                log::debug!("Recording {} {} x {}", t.order_type(), t.ticker(), t.shares());
                self.trades.push(t);
            }
            Transaction::Cash(t) => self.cash.record(t),
        }
    }

    /// Net shares of `ticker` settled on or before `date` (negative when short)
    pub fn shares_held(&self, ticker: &str, date: Timestamp) -> Quantity {
        self.settled_trades(date)
            .filter(|t| t.ticker() == ticker)
            .map(|t| t.share_delta())
            .sum()
    }

    /// Nonzero net positions by ticker
    pub fn positions(&self, date: Timestamp) -> BTreeMap<String, Quantity> {
        let mut positions: BTreeMap<String, Quantity> = BTreeMap::new();
        for t in self.settled_trades(date) {
            *positions.entry(t.ticker().to_string()).or_default() += t.share_delta();
        }
        positions.retain(|_, shares| !shares.is_zero());
        positions
    }

    /// Positions restricted to members of an index
    pub fn positions_in(
        &self,
        universe: &IndexMembership,
        date: Timestamp,
    ) -> BTreeMap<String, Quantity> {
        let mut positions = self.positions(date);
        positions.retain(|ticker, _| universe.contains(ticker));
        positions
    }

    /// Cash account balance plus the cash flows of settled share trades
    pub fn net_cash(&self, date: Timestamp) -> Money {
        let traded: Money = self.settled_trades(date).map(|t| t.cash_flow()).sum();
        self.cash.cash_balance(date) + traded
    }

    /// Market value of all positions at `date`
    pub fn market_value(&self, date: Timestamp, prices: &dyn PriceSource) -> Result<Money> {
        let mut value = Money::ZERO;
        for (ticker, shares) in self.positions(date) {
            let price = prices
                .close_price(&ticker, date)
                .ok_or_else(|| LedgerError::MissingPrice {
                    ticker: ticker.clone(),
                    date,
                })?;
            value += shares * price;
        }
        Ok(value)
    }

    /// Net cash plus market value
    pub fn total_value(&self, date: Timestamp, prices: &dyn PriceSource) -> Result<Money> {
        Ok(self.net_cash(date) + self.market_value(date, prices)?)
    }

    fn settled_trades(&self, date: Timestamp) -> impl Iterator<Item = &ShareTransaction> {
        self.trades.iter().filter(move |t| t.settlement_date() <= date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{InMemoryPriceSource, PriceBar, PriceSeries, Resolution};
    use crate::finance::{MarginableCashAccount, TransactionFactory};
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn day(n: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2011, 1, 3, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn portfolio() -> Portfolio {
        let factory = TransactionFactory::new(7);
        let mut p = Portfolio::new(CashAccount::new(factory));
        p.record(factory.construct_deposit(day(0), dec!(10000)).unwrap().into());
        p.record(
            factory
                .construct_buy("DE", day(1), dec!(10), dec!(80), dec!(5))
                .unwrap()
                .into(),
        );
        p.record(
            factory
                .construct_sell_short("CAT", day(2), dec!(4), dec!(100), dec!(5))
                .unwrap()
                .into(),
        );
        p.record(
            factory
                .construct_sell("DE", day(3), dec!(4), dec!(90), dec!(5))
                .unwrap()
                .into(),
        );
        p
    }

    #[test]
    fn test_shares_held() {
        let p = portfolio();
        assert_eq!(p.shares_held("DE", day(0)), dec!(0));
        assert_eq!(p.shares_held("DE", day(1)), dec!(10));
        assert_eq!(p.shares_held("DE", day(3)), dec!(6));
        assert_eq!(p.shares_held("CAT", day(3)), dec!(-4));
    }

    #[test]
    fn test_positions_drop_flat_tickers() {
        let factory = TransactionFactory::new(7);
        let mut p = portfolio();
        p.record(
            factory
                .construct_buy_to_cover("CAT", day(4), dec!(4), dec!(95), dec!(5))
                .unwrap()
                .into(),
        );

        let positions = p.positions(day(4));
        assert_eq!(positions.len(), 1);
        assert_eq!(positions["DE"], dec!(6));
    }

    #[test]
    fn test_positions_in_universe() {
        let p = portfolio();
        let dow = IndexMembership::new("DJIA", ["CAT"]);
        let positions = p.positions_in(&dow, day(3));
        assert_eq!(positions.len(), 1);
        assert!(positions.contains_key("CAT"));
    }

    #[test]
    fn test_net_cash() {
        let p = portfolio();
        // 10000 - (800 + 5) + (400 - 5) + (360 - 5)
        assert_eq!(p.net_cash(day(3)), dec!(9945));
        assert_eq!(p.cash_account().cash_balance(day(3)), dec!(10000));
    }

    #[test]
    fn test_market_value() {
        let p = portfolio();
        let mut prices = InMemoryPriceSource::new();
        for (ticker, close) in [("DE", dec!(85)), ("CAT", dec!(110))] {
            let mut series = PriceSeries::new(ticker, Resolution::Daily);
            series.add_bar(PriceBar::new(day(0), close, close, close, close, dec!(1)));
            prices.add_series(series);
        }

        // 6 * 85 - 4 * 110
        assert_eq!(p.market_value(day(3), &prices).unwrap(), dec!(70));
        assert_eq!(p.total_value(day(3), &prices).unwrap(), dec!(10015));
    }

    #[test]
    fn test_opening_short_costs_only_commission() {
        let factory = TransactionFactory::new(7);
        let mut p = Portfolio::new(CashAccount::new(factory));
        p.record(factory.construct_deposit(day(0), dec!(10000)).unwrap().into());
        p.record(
            factory
                .construct_sell_short("CAT", day(1), dec!(4), dec!(100), dec!(0))
                .unwrap()
                .into(),
        );

        let mut prices = InMemoryPriceSource::new();
        let mut series = PriceSeries::new("CAT", Resolution::Daily);
        series.add_bar(PriceBar::new(day(0), dec!(100), dec!(100), dec!(100), dec!(100), dec!(1)));
        prices.add_series(series);

        assert_eq!(p.net_cash(day(1)), dec!(10400));
        assert_eq!(p.market_value(day(1), &prices).unwrap(), dec!(-400));
        assert_eq!(p.total_value(day(1), &prices).unwrap(), dec!(10000));

        p.record(
            factory
                .construct_sell_short("CAT", day(2), dec!(1), dec!(100), dec!(5))
                .unwrap()
                .into(),
        );
        assert_eq!(p.total_value(day(2), &prices).unwrap(), dec!(9995));
    }

    #[test]
    fn test_market_value_missing_price() {
        let p = portfolio();
        let prices = InMemoryPriceSource::new();
        let err = p.market_value(day(3), &prices).unwrap_err();
        assert!(matches!(err, LedgerError::MissingPrice { .. }));
    }

    #[test]
    fn test_marginable_portfolio() {
        let factory = TransactionFactory::new(7);
        let account = MarginableCashAccount::new(factory, dec!(500)).unwrap();
        let mut p = Portfolio::new(account);
        p.record(factory.construct_withdrawal(day(0), dec!(400)).unwrap().into());
        assert_eq!(p.cash_account().cash_balance(day(0)), dec!(-400));
        assert_eq!(p.cash_account().maximum_margin(), dec!(500));
    }
}
