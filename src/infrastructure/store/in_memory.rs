//! In-memory status store for development and testing

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::domain::store::{BulkAction, BulkWriteResult, StatusStore};
use crate::domain::DomainError;

type Index = BTreeMap<String, Value>;

/// Store that keeps documents per index in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryStatusStore {
    indices: Arc<RwLock<HashMap<String, Index>>>,
}

impl InMemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn document_count(&self, index: &str) -> usize {
        self.indices
            .read()
            .await
            .get(index)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    pub async fn get(&self, index: &str, id: &str) -> Option<Value> {
        self.indices
            .read()
            .await
            .get(index)
            .and_then(|docs| docs.get(id))
            .cloned()
    }
}

fn timestamp_of(document: &Value) -> Option<DateTime<FixedOffset>> {
    document
        .get("@timestamp")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
}

#[async_trait]
impl StatusStore for InMemoryStatusStore {
    async fn recent_statuses(&self, index: &str, limit: usize) -> Result<Vec<Value>, DomainError> {
        let indices = self.indices.read().await;
        let docs = indices
            .get(index)
            .ok_or_else(|| DomainError::index_not_found(index))?;

        let mut statuses: Vec<&Value> = docs.values().collect();
        statuses.sort_by_key(|doc| std::cmp::Reverse(timestamp_of(doc)));

        Ok(statuses.into_iter().take(limit).cloned().collect())
    }

    async fn bulk_upsert(&self, actions: Vec<BulkAction>) -> Result<BulkWriteResult, DomainError> {
        let mut indices = self.indices.write().await;
        let written = actions.len();

        for action in actions {
            indices
                .entry(action.index)
                .or_default()
                .insert(action.id, action.document);
        }

        Ok(BulkWriteResult::success(written))
    }

    fn store_name(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: u64, timestamp: &str) -> BulkAction {
        BulkAction::index(
            "tweets",
            id.to_string(),
            json!({"id": id, "@timestamp": timestamp}),
        )
    }

    #[tokio::test]
    async fn test_missing_index() {
        let store = InMemoryStatusStore::new();
        let result = store.recent_statuses("tweets", 1).await;
        assert!(matches!(result, Err(DomainError::IndexNotFound { .. })));
    }

    #[tokio::test]
    async fn test_upsert_overwrites_same_id() {
        let store = InMemoryStatusStore::new();
        store
            .bulk_upsert(vec![doc(1, "2020-01-01T00:00:00+00:00")])
            .await
            .unwrap();
        store
            .bulk_upsert(vec![doc(1, "2021-01-01T00:00:00+00:00")])
            .await
            .unwrap();

        assert_eq!(store.document_count("tweets").await, 1);
        assert_eq!(
            store.get("tweets", "1").await.unwrap()["@timestamp"],
            "2021-01-01T00:00:00+00:00"
        );
    }

    #[tokio::test]
    async fn test_recent_statuses_by_timestamp_not_id() {
        let store = InMemoryStatusStore::new();
        store
            .bulk_upsert(vec![
                doc(30, "2019-06-01T00:00:00+00:00"),
                doc(10, "2022-01-01T00:00:00+02:00"),
                doc(20, "2020-01-01T00:00:00+00:00"),
            ])
            .await
            .unwrap();

        let recent = store.recent_statuses("tweets", 2).await.unwrap();
        let ids: Vec<u64> = recent.iter().map(|d| d["id"].as_u64().unwrap()).collect();
        assert_eq!(ids, vec![10, 20]);
    }
}
