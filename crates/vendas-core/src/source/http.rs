//! HTTP client for the sales API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::filter::ApiQuery;
use crate::models::{RawTransaction, Transaction};

use super::SalesSource;

/// Default request timeout when none is configured
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote sales API source
///
/// Issues a single `GET {base_url}?regiao=..&ano=..` per fetch. There is no
/// retry and no caching: every call goes to the network.
#[derive(Clone)]
pub struct HttpSalesSource {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSalesSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.base_url).with_timeout(config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SalesSource for HttpSalesSource {
    async fn fetch(&self, query: &ApiQuery) -> Result<Vec<Transaction>> {
        debug!(
            url = %self.base_url,
            regiao = %query.regiao,
            ano = %query.ano,
            "Requesting sales"
        );

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&query.pairs())
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.bytes().await?;
        let transactions = parse_payload(&body)?;
        info!(
            rows = transactions.len(),
            regiao = %query.regiao,
            ano = %query.ano,
            "Fetched sales"
        );

        Ok(transactions)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Decode a sales API body (JSON array of records) into transactions
pub fn parse_payload(body: &[u8]) -> Result<Vec<Transaction>> {
    let raw: Vec<RawTransaction> = serde_json::from_slice(body)?;
    raw.into_iter()
        .enumerate()
        .map(|(index, record)| record.into_transaction(index))
        .collect()
}
