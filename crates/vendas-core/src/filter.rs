//! Filter resolution
//!
//! Turns the three dashboard selections (region, year, sellers) into the
//! sales API query and the local seller predicate applied after the fetch.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{Region, Transaction, YearSelection};

/// User-selected dashboard filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesFilter {
    pub region: Region,
    pub year: YearSelection,
    /// Empty means no seller filter
    pub sellers: BTreeSet<String>,
}

impl SalesFilter {
    pub fn new(region: Region, year: YearSelection) -> Self {
        Self {
            region,
            year,
            sellers: BTreeSet::new(),
        }
    }

    pub fn with_sellers<I, S>(mut self, sellers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sellers = sellers
            .into_iter()
            .map(Into::into)
            .map(|s: String| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    /// Remote query parameters for this filter
    pub fn api_query(&self) -> ApiQuery {
        ApiQuery {
            regiao: self.region.query_value(),
            ano: self.year.query_value(),
        }
    }

    /// Local row predicate (seller selection)
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.sellers.is_empty() || self.sellers.contains(&tx.seller)
    }

    /// Keep only rows accepted by [`SalesFilter::matches`]
    pub fn apply(&self, transactions: Vec<Transaction>) -> Vec<Transaction> {
        if self.sellers.is_empty() {
            return transactions;
        }
        transactions.into_iter().filter(|tx| self.matches(tx)).collect()
    }
}

/// Sales API query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiQuery {
    /// Lowercase region name, empty for the whole country
    pub regiao: String,
    /// Year as text, empty for all years
    pub ano: String,
}

impl ApiQuery {
    /// Both keys are always sent, possibly empty
    pub fn pairs(&self) -> [(&'static str, &str); 2] {
        [("regiao", self.regiao.as_str()), ("ano", self.ano.as_str())]
    }

    /// The requested year, if `ano` holds one
    pub fn year(&self) -> Option<i32> {
        self.ano.trim().parse().ok()
    }
}

/// Years offered by the year slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            min: 2020,
            max: 2023,
        }
    }
}

impl YearRange {
    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    /// Validate an explicit year selection; `All` always passes
    pub fn check(&self, year: YearSelection) -> std::result::Result<YearSelection, String> {
        match year {
            YearSelection::Year(y) if !self.contains(y) => Err(format!(
                "Year {} out of range ({}-{})",
                y, self.min, self.max
            )),
            other => Ok(other),
        }
    }
}
