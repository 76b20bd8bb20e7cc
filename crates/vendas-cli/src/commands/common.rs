//! Shared command utilities

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use vendas_core::{Config, HttpSalesSource, Region, SalesFilter, YearSelection};

/// Load the layered configuration; `--api-url` wins over every other layer
pub fn load_config(path: Option<&Path>, api_url: Option<&str>) -> Result<Config> {
    let mut config = Config::load(path).context("Failed to load configuration")?;
    if let Some(url) = api_url.map(str::trim).filter(|u| !u.is_empty()) {
        config.api.base_url = url.to_string();
    }
    debug!(source = %config.source, api = %config.api.base_url, "Configuration loaded");
    Ok(config)
}

/// Build the sales filter, rejecting years outside the configured range
pub fn resolve_filter(
    config: &Config,
    region: Region,
    year: Option<i32>,
    sellers: &[String],
) -> Result<SalesFilter> {
    let year = config
        .dashboard
        .year_range()
        .check(YearSelection::from(year))
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(SalesFilter::new(region, year).with_sellers(sellers.iter().map(String::as_str)))
}

/// HTTP sales source for the configured API
pub fn http_source(config: &Config) -> HttpSalesSource {
    HttpSalesSource::from_config(&config.api)
}

/// Human label for a year selection
pub fn year_label(year: YearSelection) -> String {
    match year {
        YearSelection::All => "all years".to_string(),
        YearSelection::Year(y) => y.to_string(),
    }
}
