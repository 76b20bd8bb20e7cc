//! In-memory source for testing
//!
//! Answers queries the way the sales API does: `ano` keeps rows purchased in
//! that year, `regiao` keeps rows whose state belongs to that macro-region.

use async_trait::async_trait;
use chrono::Datelike;

use crate::error::{Error, Result};
use crate::filter::ApiQuery;
use crate::models::{Region, Transaction};

use super::SalesSource;

/// Fixture-backed source
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    transactions: Vec<Transaction>,
    /// When set, every fetch fails with this upstream status
    pub fail_status: Option<u16>,
}

impl FixtureSource {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            fail_status: None,
        }
    }

    /// A source whose every fetch fails as if the API answered `status`
    pub fn failing(status: u16) -> Self {
        Self {
            transactions: Vec::new(),
            fail_status: Some(status),
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[async_trait]
impl SalesSource for FixtureSource {
    async fn fetch(&self, query: &ApiQuery) -> Result<Vec<Transaction>> {
        if let Some(status) = self.fail_status {
            return Err(Error::Status {
                status,
                url: "fixture://sales".to_string(),
            });
        }

        let year = query.year();
        let region = query.regiao.trim();

        Ok(self
            .transactions
            .iter()
            .filter(|tx| year.map_or(true, |y| tx.date.year() == y))
            .filter(|tx| {
                region.is_empty()
                    || region_of_state(&tx.state).is_some_and(|r| r.query_value() == region)
            })
            .cloned()
            .collect())
    }

    fn describe(&self) -> String {
        format!("fixture ({} transactions)", self.transactions.len())
    }
}

/// Macro-region for a Brazilian state abbreviation (UF)
pub fn region_of_state(state: &str) -> Option<Region> {
    let region = match state.trim().to_uppercase().as_str() {
        "AC" | "AP" | "AM" | "PA" | "RO" | "RR" | "TO" => Region::Norte,
        "AL" | "BA" | "CE" | "MA" | "PB" | "PE" | "PI" | "RN" | "SE" => Region::Nordeste,
        "DF" | "GO" | "MT" | "MS" => Region::CentroOeste,
        "ES" | "MG" | "RJ" | "SP" => Region::Sudeste,
        "PR" | "RS" | "SC" => Region::Sul,
        _ => return None,
    };
    Some(region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SalesFilter;
    use crate::models::YearSelection;
    use chrono::NaiveDate;

    fn tx(state: &str, year: i32) -> Transaction {
        Transaction::new(
            50.0,
            NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
            state,
            (0.0, 0.0),
            "brinquedos",
            "Ana",
        )
    }

    fn source() -> FixtureSource {
        FixtureSource::new(vec![
            tx("SP", 2020),
            tx("RJ", 2021),
            tx("BA", 2021),
            tx("RS", 2022),
            tx("DF", 2022),
        ])
    }

    #[tokio::test]
    async fn test_fixture_all() {
        let rows = source().fetch(&SalesFilter::default().api_query()).await.unwrap();
        assert_eq!(rows.len(), 5);
    }

    #[tokio::test]
    async fn test_fixture_year() {
        let query = SalesFilter::new(Region::Brasil, YearSelection::Year(2021)).api_query();
        let rows = source().fetch(&query).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|t| t.date.year() == 2021));
    }

    #[tokio::test]
    async fn test_fixture_region() {
        let query = SalesFilter::new(Region::Sudeste, YearSelection::All).api_query();
        let rows = source().fetch(&query).await.unwrap();
        let states: Vec<_> = rows.iter().map(|t| t.state.as_str()).collect();
        assert_eq!(states, vec!["SP", "RJ"]);

        let query = SalesFilter::new(Region::CentroOeste, YearSelection::Year(2022)).api_query();
        let rows = source().fetch(&query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].state, "DF");
    }

    #[tokio::test]
    async fn test_fixture_failing() {
        let err = FixtureSource::failing(503)
            .fetch(&ApiQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Status { status: 503, .. }));
        assert!(err.is_upstream());
    }

    #[test]
    fn test_region_of_state() {
        assert_eq!(region_of_state("sp"), Some(Region::Sudeste));
        assert_eq!(region_of_state("AM"), Some(Region::Norte));
        assert_eq!(region_of_state("PE"), Some(Region::Nordeste));
        assert_eq!(region_of_state("MS"), Some(Region::CentroOeste));
        assert_eq!(region_of_state("SC"), Some(Region::Sul));
        assert_eq!(region_of_state("XX"), None);
    }
}
