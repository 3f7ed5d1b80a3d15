use crate::core::quotation::{Quotation, QuotationRecord};
use crate::core::repository::{QuotationRepository, StoreError};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

const QUOTATIONS_PARTITION: &str = "quotations";

/// Append-only quotation log on a fjall keyspace.
///
/// Each record lives under its id in the `quotations` partition as JSON.
/// Writes are bounded by `write_timeout`, measured from the moment `save`
/// is called.
#[derive(Clone)]
pub struct FjallQuotationStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
    write_timeout: Duration,
}

impl FjallQuotationStore {
    /// Opens (or creates) the keyspace at `path` and ensures the quotations
    /// partition exists. Safe to call on an existing database.
    pub fn open(path: &Path, write_timeout: Duration) -> Result<Self, StoreError> {
        let keyspace = fjall::Config::new(path).open()?;
        let partition =
            keyspace.open_partition(QUOTATIONS_PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened quotation store at {}", path.display());

        Ok(Self {
            keyspace,
            partition,
            write_timeout,
        })
    }
}

#[async_trait]
impl QuotationRepository for FjallQuotationStore {
    #[instrument(name = "QuotationSave", skip_all, fields(bid = %quotation.bid))]
    async fn save(&self, quotation: &Quotation) -> Result<QuotationRecord, StoreError> {
        let deadline = Instant::now() + self.write_timeout;
        let record = QuotationRecord::new(quotation.clone());

        let keyspace = self.keyspace.clone();
        let partition = self.partition.clone();
        let pending = record.clone();
        let write = tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            // The caller stops waiting at the deadline; never write after it.
            if Instant::now() >= deadline {
                return Err(StoreError::DeadlineExceeded);
            }
            let value = serde_json::to_vec(&pending)?;
            let key = pending.id.to_string();
            partition.insert(key.as_str(), value)?;
            keyspace.persist(PersistMode::SyncAll)?;
            Ok(())
        });

        match tokio::time::timeout(self.write_timeout, write).await {
            Ok(joined) => joined??,
            Err(_) => return Err(StoreError::DeadlineExceeded),
        }

        debug!(id = %record.id, "Stored quotation record");
        Ok(record)
    }

    async fn records(&self) -> Result<Vec<QuotationRecord>, StoreError> {
        let partition = self.partition.clone();
        tokio::task::spawn_blocking(move || {
            partition
                .iter()
                .map(|item| -> Result<QuotationRecord, StoreError> {
                    let (_, value) = item?;
                    Ok(serde_json::from_slice(&value)?)
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .await?
    }
}
