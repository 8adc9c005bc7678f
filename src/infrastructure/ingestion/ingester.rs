use std::sync::Arc;

use futures::{Stream, StreamExt};
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::status::{parse_created_at, StatusRecord};
use crate::domain::store::{BulkAction, StatusStore};
use crate::domain::DomainError;

/// Actions per bulk request
pub const DEFAULT_BULK_CHUNK_SIZE: usize = 500;

/// Statuses between two progress log lines
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// Field the store sorts statuses by
pub const TIMESTAMP_FIELD: &str = "@timestamp";

/// Outcome of a finished ingestion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Statuses read from the source
    pub received: usize,
    /// Statuses the store accepted
    pub indexed: usize,
    /// Bulk requests sent
    pub requests: usize,
}

/// Turn a status into its upsert, deriving `@timestamp` from `created_at`
pub fn prepare_action(index: &str, mut record: StatusRecord) -> Result<BulkAction, DomainError> {
    let id = record.document_id()?;
    let created_at = record.created_at().unwrap_or(&Value::Null);
    let timestamp = parse_created_at(&id, created_at)?;

    record.insert(TIMESTAMP_FIELD, Value::String(timestamp.to_rfc3339()));

    Ok(BulkAction::index(index, id, record.into_document()))
}

/// Writes a status stream into an index as bulk upserts keyed by status id
#[derive(Debug)]
pub struct BulkIngester<S: StatusStore> {
    store: Arc<S>,
    chunk_size: usize,
    progress_interval: usize,
}

impl<S: StatusStore> BulkIngester<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            chunk_size: DEFAULT_BULK_CHUNK_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_progress_interval(mut self, progress_interval: usize) -> Self {
        self.progress_interval = progress_interval.max(1);
        self
    }

    /// Drain `statuses` into `index`.
    ///
    /// The first failing status, unparseable timestamp or refused write ends
    /// the run; chunks flushed before that stay written.
    pub async fn ingest<St>(&self, index: &str, statuses: St) -> Result<IngestReport, DomainError>
    where
        St: Stream<Item = Result<StatusRecord, DomainError>> + Send,
    {
        let mut statuses = std::pin::pin!(statuses);
        let mut pending = Vec::with_capacity(self.chunk_size);
        let mut report = IngestReport::default();

        while let Some(status) = statuses.next().await {
            pending.push(prepare_action(index, status?)?);
            report.received += 1;

            if report.received % self.progress_interval == 0 {
                info!(index, received = report.received, "Ingestion progress");
            }

            if pending.len() >= self.chunk_size {
                self.flush(&mut pending, &mut report).await?;
            }
        }

        self.flush(&mut pending, &mut report).await?;

        info!(
            index,
            store = self.store.store_name(),
            indexed = report.indexed,
            requests = report.requests,
            "Ingestion finished"
        );

        Ok(report)
    }

    async fn flush(
        &self,
        pending: &mut Vec<BulkAction>,
        report: &mut IngestReport,
    ) -> Result<(), DomainError> {
        if pending.is_empty() {
            return Ok(());
        }

        let actions = std::mem::take(pending);
        debug!(actions = actions.len(), "Sending bulk request");

        let result = self.store.bulk_upsert(actions).await?;
        report.indexed += result.written;
        report.requests += 1;

        if !result.is_success() {
            return Err(DomainError::BulkWrite {
                written: report.indexed,
                failures: result.failures,
            });
        }

        Ok(())
    }
}
