//! Ledger constants and defaults

use rust_decimal::Decimal;

/// Seed used by `TransactionFactory::default()`
pub const DEFAULT_FACTORY_SEED: u64 = 0;

/// Margin ceiling of a marginable account when none is configured (no slack)
pub const DEFAULT_MAXIMUM_MARGIN: Decimal = Decimal::ZERO;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_FACTORY_SEED, 0);
        assert!(DEFAULT_MAXIMUM_MARGIN.is_zero());
    }
}
