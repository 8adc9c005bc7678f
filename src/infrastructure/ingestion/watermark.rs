use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::status::StatusRecord;
use crate::domain::store::StatusStore;
use crate::domain::watermark::Watermark;
use crate::domain::DomainError;

/// Reads the resume point of an index
#[derive(Debug)]
pub struct WatermarkResolver<S: StatusStore> {
    store: Arc<S>,
}

impl<S: StatusStore> WatermarkResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Most recently created stored status, or `None` when the index is
    /// missing, empty or unreachable
    pub async fn last_status(&self, index: &str) -> Result<Option<StatusRecord>, DomainError> {
        match self.store.recent_statuses(index, 1).await {
            Ok(statuses) => statuses
                .into_iter()
                .next()
                .map(StatusRecord::detect)
                .transpose(),
            Err(DomainError::IndexNotFound { .. }) => {
                info!(index, "Index does not exist yet");
                Ok(None)
            }
            Err(DomainError::StoreUnavailable { message }) => {
                warn!(
                    index,
                    store = self.store.store_name(),
                    error = %message,
                    "Store unavailable while reading last status, starting without watermark"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn resolve(&self, index: &str) -> Result<Watermark, DomainError> {
        let Some(last) = self.last_status(index).await? else {
            info!("No last status found in index {}", index);
            return Ok(Watermark::none());
        };

        let watermark = Watermark::from_last_status(&last)?;
        info!(
            "Last status in index {} is {} by {} created at {}",
            index,
            last.document_id()?,
            watermark.author().unwrap_or("unknown author"),
            watermark.created_at().unwrap_or("unknown time")
        );

        Ok(watermark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::StatusId;
    use crate::domain::store::MockStatusStore;
    use serde_json::json;

    fn resolver(store: MockStatusStore) -> WatermarkResolver<MockStatusStore> {
        WatermarkResolver::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_missing_index_means_no_watermark() {
        let mut store = MockStatusStore::new();
        store
            .expect_recent_statuses()
            .returning(|index, _| Err(DomainError::index_not_found(index)));

        let watermark = resolver(store).resolve("tweets").await.unwrap();
        assert!(watermark.is_none());
        assert_eq!(watermark.author(), None);
    }

    #[tokio::test]
    async fn test_empty_index_means_no_watermark() {
        let mut store = MockStatusStore::new();
        store
            .expect_recent_statuses()
            .returning(|_, _| Ok(Vec::new()));

        let watermark = resolver(store).resolve("tweets").await.unwrap();
        assert!(watermark.is_none());
    }

    #[tokio::test]
    async fn test_unavailable_store_means_no_watermark() {
        let mut store = MockStatusStore::new();
        store
            .expect_recent_statuses()
            .returning(|_, _| Err(DomainError::store_unavailable("connection refused")));
        store.expect_store_name().return_const("mock");

        let watermark = resolver(store).resolve("tweets").await.unwrap();
        assert!(watermark.is_none());
    }

    #[tokio::test]
    async fn test_other_store_errors_surface() {
        let mut store = MockStatusStore::new();
        store
            .expect_recent_statuses()
            .returning(|_, _| Err(DomainError::store("search_phase_execution_exception")));

        let result = resolver(store).resolve("tweets").await;
        assert!(matches!(result, Err(DomainError::Store { .. })));
    }

    #[tokio::test]
    async fn test_watermark_from_top_status() {
        let mut store = MockStatusStore::new();
        store
            .expect_recent_statuses()
            .returning(|index, limit| {
                assert_eq!(index, "tweets");
                assert_eq!(limit, 1);
                Ok(vec![json!({
                    "id": 100,
                    "created_at": "Wed Oct 10 20:19:24 +0000 2018",
                    "user": {"screen_name": "alice"}
                })])
            });

        let watermark = resolver(store).resolve("tweets").await.unwrap();
        assert_eq!(watermark.since_id(), Some(StatusId::new(100)));
        assert_eq!(watermark.author(), Some("alice"));
    }
}
