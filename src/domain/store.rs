//! Destination search store

use async_trait::async_trait;
use serde_json::Value;

use super::error::FailedWrite;
use super::DomainError;

#[cfg(test)]
use mockall::automock;

/// One insert-or-overwrite keyed by document id
#[derive(Debug, Clone, PartialEq)]
pub struct BulkAction {
    pub index: String,
    pub id: String,
    pub document: Value,
}

impl BulkAction {
    pub fn index(index: impl Into<String>, id: impl Into<String>, document: Value) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            document,
        }
    }
}

/// Result of a bulk upsert
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkWriteResult {
    /// Documents written
    pub written: usize,
    /// Documents the store refused
    pub failures: Vec<FailedWrite>,
}

impl BulkWriteResult {
    pub fn success(written: usize) -> Self {
        Self {
            written,
            failures: Vec::new(),
        }
    }

    pub fn partial(written: usize, failures: Vec<FailedWrite>) -> Self {
        Self { written, failures }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Key-value search store holding ingested statuses
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Up to `limit` stored statuses, most recent `@timestamp` first.
    ///
    /// A missing index yields `DomainError::IndexNotFound`.
    async fn recent_statuses(&self, index: &str, limit: usize) -> Result<Vec<Value>, DomainError>;

    /// Write all actions as upserts keyed by `BulkAction::id`
    async fn bulk_upsert(&self, actions: Vec<BulkAction>) -> Result<BulkWriteResult, DomainError>;

    /// Store name for logging
    fn store_name(&self) -> &'static str;
}
