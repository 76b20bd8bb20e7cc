//! Vendas Core Library
//!
//! Shared functionality for the Vendas sales dashboard:
//! - Filter resolution (region, year, sellers → API query + seller predicate)
//! - Sales sources (remote HTTP API, in-memory fixtures)
//! - Aggregation into the state / month / category / seller tables
//! - Magnitude formatting for dashboard metrics
//! - Dashboard assembly (tabs, metrics, charts)
//! - Layered configuration (embedded defaults, TOML file, environment)

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod format;
pub mod models;
pub mod source;

/// Test utilities including a mock sales API server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::AggregateTables;
pub use config::{Config, ConfigSource};
pub use dashboard::{load_dashboard, Dashboard, DashboardOptions, TabKind, TopSellers};
pub use error::{Error, Result};
pub use filter::{ApiQuery, SalesFilter, YearRange};
pub use format::{format_count, format_currency, format_number};
pub use models::{Region, Transaction, YearSelection};
pub use source::{FixtureSource, HttpSalesSource, SalesSource};
