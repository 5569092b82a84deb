//! Profit of closed holdings

use crate::finance::holding::{Holding, PositionSide};
use crate::types::Money;

/// Stateless profit calculations
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfitCalculator;

impl ProfitCalculator {
    /// Price gain times shares, before commissions
    ///
    /// Long: `shares * (close - open)`. Short: `shares * (open - close)`.
    pub fn gross_profit(holding: &Holding) -> Money {
        let per_share = match holding.side() {
            PositionSide::Long => holding.close_price() - holding.open_price(),
            PositionSide::Short => holding.open_price() - holding.close_price(),
        };
        holding.shares() * per_share
    }

    /// Gross profit less both commissions
    pub fn net_profit(holding: &Holding) -> Money {
        Self::gross_profit(holding) - holding.open_commission() - holding.close_commission()
    }

    /// Net profit over total cost of the opening leg, `None` when nothing was paid
    pub fn return_on_cost(holding: &Holding) -> Option<Money> {
        let cost = holding.shares() * holding.open_price() + holding.open_commission();
        if cost.is_zero() {
            None
        } else {
            Some(Self::net_profit(holding) / cost)
        }
    }

    /// Sum of net profits across holdings
    pub fn total_net_profit<'a>(holdings: impl IntoIterator<Item = &'a Holding>) -> Money {
        holdings.into_iter().map(Self::net_profit).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::holding::HoldingFactory;
    use crate::finance::TransactionFactory;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn sample() -> Holding {
        HoldingFactory::construct_holding(dec!(5), dec!(10), dec!(20), dec!(2), dec!(3)).unwrap()
    }

    #[test]
    fn test_gross_profit() {
        assert_eq!(ProfitCalculator::gross_profit(&sample()), dec!(50));
    }

    #[test]
    fn test_net_profit() {
        assert_eq!(ProfitCalculator::net_profit(&sample()), dec!(45));
    }

    #[test]
    fn test_losing_holding() {
        let holding =
            HoldingFactory::construct_holding(dec!(10), dec!(20), dec!(15), dec!(1), dec!(1)).unwrap();
        assert_eq!(ProfitCalculator::gross_profit(&holding), dec!(-50));
        assert_eq!(ProfitCalculator::net_profit(&holding), dec!(-52));
    }

    #[test]
    fn test_short_profit() {
        let factory = TransactionFactory::default();
        let date = Utc.with_ymd_and_hms(2011, 1, 3, 0, 0, 0).unwrap();
        let short = factory
            .construct_sell_short("DE", date, dec!(5), dec!(10), dec!(2))
            .unwrap();
        let cover = factory
            .construct_buy_to_cover("DE", date, dec!(5), dec!(20), dec!(3))
            .unwrap();
        let holding = HoldingFactory::from_transactions(&short, &cover).unwrap();
        assert_eq!(holding.side(), PositionSide::Short);
        assert_eq!(ProfitCalculator::gross_profit(&holding), dec!(-50));
        assert_eq!(ProfitCalculator::net_profit(&holding), dec!(-55));
    }

    #[test]
    fn test_return_on_cost() {
        // 45 / (50 + 2)
        let r = ProfitCalculator::return_on_cost(&sample()).unwrap();
        assert_eq!(r, dec!(45) / dec!(52));

        let empty =
            HoldingFactory::construct_holding(dec!(0), dec!(10), dec!(20), dec!(0), dec!(0)).unwrap();
        assert!(ProfitCalculator::return_on_cost(&empty).is_none());
    }

    #[test]
    fn test_total_net_profit() {
        let holdings = vec![sample(), sample()];
        assert_eq!(ProfitCalculator::total_net_profit(&holdings), dec!(90));
    }
}
