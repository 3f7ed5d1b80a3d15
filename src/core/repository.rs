//! Quotation persistence abstraction

use crate::core::quotation::{Quotation, QuotationRecord};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage write exceeded its deadline")]
    DeadlineExceeded,

    #[error("storage failure: {0}")]
    Storage(#[from] fjall::Error),

    #[error("failed to encode or decode record: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Append-only store of fetched quotations.
#[async_trait]
pub trait QuotationRepository: Send + Sync {
    /// Persists `quotation` as a new record. Identical quotations still get
    /// their own record.
    async fn save(&self, quotation: &Quotation) -> Result<QuotationRecord, StoreError>;

    /// Every record stored so far, in key order.
    async fn records(&self) -> Result<Vec<QuotationRecord>, StoreError>;
}
