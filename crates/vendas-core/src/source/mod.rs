//! Sales data sources
//!
//! A source answers one [`ApiQuery`] with the matching transactions:
//! - `HttpSalesSource` - the remote sales API (one GET per query)
//! - `FixtureSource` - in-memory transactions, for tests and local development

mod fixture;
mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::filter::ApiQuery;
use crate::models::Transaction;

pub use fixture::{region_of_state, FixtureSource};
pub use http::{parse_payload, HttpSalesSource};

/// Trait implemented by every transaction source
///
/// Sources must be Send + Sync so a single instance can be shared by
/// concurrent server requests.
#[async_trait]
pub trait SalesSource: Send + Sync {
    /// Fetch the transactions matching the region/year query
    async fn fetch(&self, query: &ApiQuery) -> Result<Vec<Transaction>>;

    /// Human-readable description (URL, fixture size) for logs and health output
    fn describe(&self) -> String;
}
