//! Twitter REST strategies: timelines, favorites and liked-id lookups

use std::path::PathBuf;
use std::sync::Arc;

use async_stream::try_stream;
use futures::Stream;
use tracing::info;

use super::archive::read_liked_ids;
use super::{log_ingesting, LoaderSettings};
use crate::domain::remote::{TimelineKind, TimelineQuery, TwitterApi};
use crate::domain::retry::retry_on_rate_limit;
use crate::domain::status::{Platform, StatusId, StatusRecord};
use crate::domain::watermark::Watermark;
use crate::domain::DomainError;

/// Page backward through a timeline until the provider returns an empty page.
///
/// `since_id` is applied server-side; each next page asks for ids below the
/// lowest one seen so far.
pub fn timeline_statuses(
    api: Arc<dyn TwitterApi>,
    kind: TimelineKind,
    screen_name: String,
    watermark: Watermark,
    settings: LoaderSettings,
) -> impl Stream<Item = Result<StatusRecord, DomainError>> + Send + 'static {
    try_stream! {
        let mut max_id: Option<StatusId> = None;

        loop {
            let query = TimelineQuery::new(&screen_name, settings.page_size)
                .with_since_id(watermark.since_id())
                .with_max_id(max_id);

            let page = {
                let api = api.as_ref();
                let query = &query;
                retry_on_rate_limit(&settings.retry, settings.sleeper.as_ref(), kind.as_str(), || async move {
                    api.timeline(kind, query).await
                })
                .await?
            };

            if page.is_empty() {
                break;
            }

            let mut lowest: Option<StatusId> = None;
            for status in page {
                let record = StatusRecord::new(Platform::Twitter, status)?;
                let id = record.id()?;
                lowest = Some(lowest.map_or(id, |seen| seen.min(id)));

                if !watermark.admits(id) {
                    continue;
                }

                log_ingesting(id, &record);
                yield record;
            }

            match lowest.and_then(|id| id.value().checked_sub(1)) {
                Some(next) => max_id = Some(StatusId::new(next)),
                None => break,
            }
        }
    }
}

/// Hydrate the ids of a likes archive in ascending batches.
///
/// Statuses come back in provider order; deleted or protected statuses are
/// simply missing from a batch.
pub fn liked_statuses(
    api: Arc<dyn TwitterApi>,
    path: PathBuf,
    settings: LoaderSettings,
) -> impl Stream<Item = Result<StatusRecord, DomainError>> + Send + 'static {
    try_stream! {
        let ids = read_liked_ids(&path).await?;
        let batch_size = settings.lookup_batch_size.max(1);
        let batches = ids.len().div_ceil(batch_size);
        info!(path = %path.display(), liked = ids.len(), batches, "Looking up liked statuses");

        for (batch_number, batch) in ids.chunks(batch_size).enumerate() {
            let statuses = {
                let api = api.as_ref();
                retry_on_rate_limit(&settings.retry, settings.sleeper.as_ref(), "lookup", || async move {
                    api.lookup_statuses(batch).await
                })
                .await?
            };

            info!(
                batch = batch_number + 1,
                batches,
                requested = batch.len(),
                returned = statuses.len(),
                "Looked up liked statuses"
            );

            for status in statuses {
                let record = StatusRecord::new(Platform::Twitter, status)?;
                log_ingesting(record.id()?, &record);
                yield record;
            }
        }
    }
}
