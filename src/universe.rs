//! Index membership lists

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Read-only set of ticker symbols belonging to a market index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMembership {
    name: String,
    tickers: BTreeSet<String>,
}

impl IndexMembership {
    /// Build a membership list; symbols are trimmed and upper-cased, blanks dropped
    pub fn new<I, S>(name: impl Into<String>, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tickers = tickers
            .into_iter()
            .map(|t| t.as_ref().trim().to_ascii_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self {
            name: name.into(),
            tickers,
        }
    }

    /// Parse one symbol per line; text after `#` is ignored
    pub fn parse_list(name: impl Into<String>, text: &str) -> Self {
        Self::new(
            name,
            text.lines()
                .map(|line| line.split('#').next().unwrap_or_default()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.tickers.contains(&ticker.trim().to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tickers.iter().map(String::as_str)
    }
}
