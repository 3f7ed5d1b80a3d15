//! Quotation source abstraction

use crate::core::quotation::QuotationEnvelope;
use async_trait::async_trait;
use thiserror::Error;

/// Why fetching a quotation from upstream failed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("upstream request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("upstream request exceeded its deadline")]
    Timeout,

    #[error("upstream answered with status {0}")]
    Status(u16),

    #[error("failed to read upstream body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("failed to decode upstream quotation: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Classifies a transport error, keeping deadline expiry distinct.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Request(err)
        }
    }
}

#[async_trait]
pub trait QuotationProvider: Send + Sync {
    async fn fetch_quotation(&self) -> Result<QuotationEnvelope, FetchError>;
}
