//! Market price data consumed for valuation
//!
//! Prices are supplied from outside the ledger; this module only stores the
//! bars handed to it and answers "last close at or before a date".

use crate::types::{Price, Quantity, Timestamp};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Bar resolution of a price series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    Daily,
    Weekly,
    Monthly,
}

/// OHLCV price bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Quantity,
}

impl PriceBar {
    pub fn new(
        date: Timestamp,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Bars for one ticker, kept sorted by date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    resolution: Resolution,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, resolution: Resolution) -> Self {
        Self {
            ticker: ticker.into(),
            resolution,
            bars: Vec::new(),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Insert a bar, replacing any bar with the same date
    pub fn add_bar(&mut self, bar: PriceBar) {
        match self.bars.binary_search_by_key(&bar.date, |b| b.date) {
            Ok(idx) => self.bars[idx] = bar,
            Err(idx) => self.bars.insert(idx, bar),
        }
    }

    /// Last bar dated at or before `date`
    pub fn bar_at(&self, date: Timestamp) -> Option<&PriceBar> {
        let idx = self.bars.partition_point(|b| b.date <= date);
        idx.checked_sub(1).map(|i| &self.bars[i])
    }

    pub fn close_at(&self, date: Timestamp) -> Option<Price> {
        self.bar_at(date).map(|b| b.close)
    }
}

/// Source of closing prices for valuation
pub trait PriceSource {
    /// Close of `ticker` at or before `date`
    fn close_price(&self, ticker: &str, date: Timestamp) -> Option<Price>;
}

/// In-memory price source keyed by ticker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryPriceSource {
    series: HashMap<String, PriceSeries>,
}

impl InMemoryPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the series for its ticker
    pub fn add_series(&mut self, series: PriceSeries) {
        self.series.insert(series.ticker().to_string(), series);
    }

    pub fn series(&self, ticker: &str) -> Option<&PriceSeries> {
        self.series.get(ticker)
    }
}

impl PriceSource for InMemoryPriceSource {
    fn close_price(&self, ticker: &str, date: Timestamp) -> Option<Price> {
        self.series.get(ticker).and_then(|s| s.close_at(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn day(n: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2011, 1, 3, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn bar(n: i64, close: Decimal) -> PriceBar {
        PriceBar::new(day(n), close, close, close, close, dec!(1000))
    }

    #[test]
    fn test_bars_stay_sorted() {
        let mut series = PriceSeries::new("DE", Resolution::Daily);
        series.add_bar(bar(2, dec!(12)));
        series.add_bar(bar(0, dec!(10)));
        series.add_bar(bar(1, dec!(11)));
        series.add_bar(bar(1, dec!(11.5)));

        let closes: Vec<_> = series.bars().iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![dec!(10), dec!(11.5), dec!(12)]);
    }

    #[test]
    fn test_close_at_uses_last_known_bar() {
        let mut series = PriceSeries::new("DE", Resolution::Weekly);
        series.add_bar(bar(0, dec!(10)));
        series.add_bar(bar(7, dec!(14)));

        assert_eq!(series.close_at(day(-1)), None);
        assert_eq!(series.close_at(day(0)), Some(dec!(10)));
        assert_eq!(series.close_at(day(6)), Some(dec!(10)));
        assert_eq!(series.close_at(day(30)), Some(dec!(14)));
    }

    #[test]
    fn test_in_memory_source() {
        let mut series = PriceSeries::new("DE", Resolution::Daily);
        series.add_bar(bar(0, dec!(10)));

        let mut source = InMemoryPriceSource::new();
        source.add_series(series);

        assert_eq!(source.close_price("DE", day(3)), Some(dec!(10)));
        assert_eq!(source.close_price("CAT", day(3)), None);
        assert!(source.series("DE").is_some());
    }
}
