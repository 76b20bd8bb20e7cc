//! Error types for Vendas

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Sales API returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed sales payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Invalid purchase date {value:?} in record {index} (expected DD/MM/YYYY)")]
    InvalidDate { index: usize, value: String },

    #[error("No sales found: {0}")]
    EmptyDataset(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the failure came from the upstream sales API (transport, status or payload)
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Status { .. } | Self::MalformedPayload(_) | Self::InvalidDate { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
