//! Ledger configuration loaded from TOML
//!
//! ```toml
//! seed = 42
//! marginable = true
//! maximum_margin = "2500"
//! ```

use crate::error::{LedgerError, Result};
use crate::finance::constants::{DEFAULT_FACTORY_SEED, DEFAULT_MAXIMUM_MARGIN};
use crate::finance::{CashAccount, MarginableCashAccount, TransactionFactory};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Identity seed handed to the transaction factory
    pub seed: u64,
    /// Whether accounts built from this config may borrow
    pub marginable: bool,
    /// Margin ceiling for marginable accounts
    pub maximum_margin: Decimal,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_FACTORY_SEED,
            marginable: false,
            maximum_margin: DEFAULT_MAXIMUM_MARGIN,
        }
    }
}

impl LedgerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: LedgerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
            .map_err(|e| LedgerError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.maximum_margin < Decimal::ZERO {
            return Err(LedgerError::invalid(format!(
                "maximum_margin must not be negative, got {}",
                self.maximum_margin
            )));
        }
        Ok(())
    }

    pub fn factory(&self) -> TransactionFactory {
        TransactionFactory::new(self.seed)
    }

    pub fn cash_account(&self) -> CashAccount {
        CashAccount::new(self.factory())
    }

    pub fn marginable_account(&self) -> Result<MarginableCashAccount> {
        MarginableCashAccount::new(self.factory(), self.maximum_margin)
    }
}
