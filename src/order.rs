//! Order types and their classification
//!
//! Every rule that depends on the kind of a transaction (sign of the stored
//! price or amount, whether it opens or closes a position, which commissions
//! are allowed) is read from [`OrderType::traits`] rather than re-derived at
//! each call site.

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of ledger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderType {
    /// Purchase of shares (opens a long position)
    Buy,
    /// Sale of held shares (closes a long position)
    Sell,
    /// Sale of borrowed shares (opens a short position)
    SellShort,
    /// Purchase that returns borrowed shares (closes a short position)
    BuyToCover,
    /// Cash paid into the account
    Deposit,
    /// Cash taken out of the account
    Withdrawal,
    /// Cash dividend paid into the account
    DividendReceipt,
    /// Dividend paid out as additional shares
    DividendReinvestment,
}

/// Which kind of transaction an order type produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionDomain {
    Share,
    Cash,
}

/// Effect on a share position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionEffect {
    /// Establishes or increases a position
    Opening,
    /// Reduces or terminates a position
    Closing,
    /// No share position involved (cash transactions)
    Neutral,
}

/// Sign stored for the price (share) or amount (cash)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignConvention {
    Positive,
    Negative,
}

impl SignConvention {
    /// Apply the convention to the magnitude of `value`
    pub fn apply(self, value: rust_decimal::Decimal) -> rust_decimal::Decimal {
        match self {
            SignConvention::Positive => value.abs(),
            SignConvention::Negative => -value.abs(),
        }
    }

    /// Check that a stored value already follows the convention (zero never does)
    pub fn holds_for(self, value: rust_decimal::Decimal) -> bool {
        match self {
            SignConvention::Positive => value.is_sign_positive() && !value.is_zero(),
            SignConvention::Negative => value.is_sign_negative() && !value.is_zero(),
        }
    }
}

/// Which commissions an order type accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommissionRule {
    /// Any commission >= 0
    NonNegative,
    /// Commission must be exactly zero
    MustBeZero,
    /// Cash transactions carry no commission
    NotApplicable,
}

/// One row of the classification table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTraits {
    pub domain: TransactionDomain,
    pub effect: PositionEffect,
    pub sign: SignConvention,
    pub commission: CommissionRule,
    /// Change in held shares per share traded: +1, -1 or 0
    pub share_direction: i8,
}

impl OrderType {
    pub const ALL: [OrderType; 8] = [
        OrderType::Buy,
        OrderType::Sell,
        OrderType::SellShort,
        OrderType::BuyToCover,
        OrderType::Deposit,
        OrderType::Withdrawal,
        OrderType::DividendReceipt,
        OrderType::DividendReinvestment,
    ];

    /// Classification table
    pub const fn traits(self) -> OrderTraits {
        use CommissionRule::*;
        use PositionEffect::*;
        use SignConvention::*;
        use TransactionDomain::*;

        let (domain, effect, sign, commission, share_direction) = match self {
            OrderType::Buy => (Share, Opening, Positive, NonNegative, 1),
            OrderType::SellShort => (Share, Opening, Positive, NonNegative, -1),
            OrderType::DividendReinvestment => (Share, Opening, Positive, MustBeZero, 1),
            OrderType::Sell => (Share, Closing, Negative, NonNegative, -1),
            OrderType::BuyToCover => (Share, Closing, Negative, NonNegative, 1),
            OrderType::Deposit => (Cash, Neutral, Positive, NotApplicable, 0),
            OrderType::DividendReceipt => (Cash, Neutral, Positive, NotApplicable, 0),
            OrderType::Withdrawal => (Cash, Neutral, Negative, NotApplicable, 0),
        };

        OrderTraits {
            domain,
            effect,
            sign,
            commission,
            share_direction,
        }
    }

    pub fn domain(self) -> TransactionDomain {
        self.traits().domain
    }

    pub fn position_effect(self) -> PositionEffect {
        self.traits().effect
    }

    pub fn is_share(self) -> bool {
        self.domain() == TransactionDomain::Share
    }

    pub fn is_cash(self) -> bool {
        self.domain() == TransactionDomain::Cash
    }

    pub fn is_opening(self) -> bool {
        self.position_effect() == PositionEffect::Opening
    }

    pub fn is_closing(self) -> bool {
        self.position_effect() == PositionEffect::Closing
    }

    /// Stable code used in journals and identity derivation
    pub fn code(self) -> &'static str {
        match self {
            OrderType::Buy => "BUY",
            OrderType::Sell => "SELL",
            OrderType::SellShort => "SELL_SHORT",
            OrderType::BuyToCover => "BUY_TO_COVER",
            OrderType::Deposit => "DEPOSIT",
            OrderType::Withdrawal => "WITHDRAWAL",
            OrderType::DividendReceipt => "DIVIDEND",
            OrderType::DividendReinvestment => "DIVIDEND_REINVESTMENT",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for OrderType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        OrderType::ALL
            .into_iter()
            .find(|t| t.code() == normalized)
            .ok_or_else(|| LedgerError::invalid(format!("unrecognized order type '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_domains() {
        let share: Vec<_> = OrderType::ALL.into_iter().filter(|t| t.is_share()).collect();
        assert_eq!(
            share,
            vec![
                OrderType::Buy,
                OrderType::Sell,
                OrderType::SellShort,
                OrderType::BuyToCover,
                OrderType::DividendReinvestment,
            ]
        );

        assert!(OrderType::Deposit.is_cash());
        assert!(OrderType::Withdrawal.is_cash());
        assert!(OrderType::DividendReceipt.is_cash());
    }

    #[test]
    fn test_position_effects() {
        assert!(OrderType::Buy.is_opening());
        assert!(OrderType::SellShort.is_opening());
        assert!(OrderType::DividendReinvestment.is_opening());
        assert!(OrderType::Sell.is_closing());
        assert!(OrderType::BuyToCover.is_closing());

        for t in [OrderType::Deposit, OrderType::Withdrawal, OrderType::DividendReceipt] {
            assert_eq!(t.position_effect(), PositionEffect::Neutral);
            assert!(!t.is_opening() && !t.is_closing());
        }
    }

    #[test]
    fn test_dividend_reinvestment_commission_rule() {
        assert_eq!(
            OrderType::DividendReinvestment.traits().commission,
            CommissionRule::MustBeZero
        );
        assert_eq!(OrderType::Buy.traits().commission, CommissionRule::NonNegative);
    }

    #[test]
    fn test_sign_convention() {
        assert_eq!(SignConvention::Positive.apply(dec!(-12.5)), dec!(12.5));
        assert_eq!(SignConvention::Negative.apply(dec!(12.5)), dec!(-12.5));
        assert_eq!(SignConvention::Negative.apply(dec!(-12.5)), dec!(-12.5));
        assert!(!SignConvention::Positive.holds_for(dec!(0)));
        assert!(SignConvention::Negative.holds_for(dec!(-1)));
    }

    #[test]
    fn test_codes_parse_back() {
        for t in OrderType::ALL {
            assert_eq!(t.code().parse::<OrderType>().unwrap(), t);
        }
        assert_eq!("sell short".parse::<OrderType>().unwrap(), OrderType::SellShort);
        assert_eq!("buy-to-cover".parse::<OrderType>().unwrap(), OrderType::BuyToCover);
    }

    #[test]
    fn test_unknown_code_is_invalid_argument() {
        let err = "SPLIT".parse::<OrderType>().unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("SPLIT"));
    }
}
