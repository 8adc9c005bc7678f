//! Source loading
//!
//! [`SourceLoader`] turns a classified [`SourceDescriptor`] into one lazy
//! stream of statuses newer than the watermark, with every status passed
//! through the run's [`IdentityReconciler`].

mod archive;
mod clients;
mod jsonl;
mod mastodon;
mod monthly;
mod twitter;

use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use serde_json::Value;
use tracing::info;

use crate::domain::identity::{IdentityMode, IdentityReconciler};
use crate::domain::remote::TimelineKind;
use crate::domain::retry::{RetryPolicy, Sleeper, TokioSleeper};
use crate::domain::source::SourceDescriptor;
use crate::domain::status::{StatusId, StatusRecord};
use crate::domain::watermark::Watermark;
use crate::domain::DomainError;

pub use archive::archive_statuses;
pub use clients::{ApiClientProvider, CredentialApiClients};
pub use jsonl::line_delimited_statuses;
pub use mastodon::account_statuses;
pub use monthly::monthly_statuses;
pub use twitter::{liked_statuses, timeline_statuses};

#[cfg(test)]
pub use clients::mock;

/// Lazily produced statuses of one source
pub type StatusStream = Pin<Box<dyn Stream<Item = Result<StatusRecord, DomainError>> + Send>>;

pub const DEFAULT_TIMELINE_PAGE_SIZE: u32 = 200;
pub const DEFAULT_LOOKUP_BATCH_SIZE: usize = 100;

/// Tuning shared by the remote strategies
#[derive(Debug, Clone)]
pub struct LoaderSettings {
    pub retry: RetryPolicy,
    pub sleeper: Arc<dyn Sleeper>,
    pub page_size: u32,
    pub lookup_batch_size: usize,
}

impl LoaderSettings {
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_lookup_batch_size(mut self, lookup_batch_size: usize) -> Self {
        self.lookup_batch_size = lookup_batch_size;
        self
    }
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
            page_size: DEFAULT_TIMELINE_PAGE_SIZE,
            lookup_batch_size: DEFAULT_LOOKUP_BATCH_SIZE,
        }
    }
}

fn display_created_at(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "unknown time".to_string(),
    }
}

/// Progress line for statuses coming from a remote API
pub(crate) fn log_ingesting(id: StatusId, record: &StatusRecord) {
    info!(
        "Ingesting status {} by {} created at {}",
        id,
        record.author().unwrap_or("unknown author"),
        display_created_at(record.created_at())
    );
}

/// Dispatches a source descriptor to its loading strategy
#[derive(Debug, Clone)]
pub struct SourceLoader {
    clients: Arc<dyn ApiClientProvider>,
    settings: LoaderSettings,
}

impl SourceLoader {
    pub fn new(clients: Arc<dyn ApiClientProvider>) -> Self {
        Self {
            clients,
            settings: LoaderSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: LoaderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Open the status stream of `source`.
    ///
    /// Fails before any remote call when a strict remote handle cannot
    /// belong to the run's author. Reconciliation errors surface as stream
    /// items and end the load.
    pub async fn load(
        &self,
        source: &SourceDescriptor,
        watermark: &Watermark,
        reconciler: &IdentityReconciler,
    ) -> Result<StatusStream, DomainError> {
        let mode = source.identity_mode();
        if mode == IdentityMode::Strict {
            if let Some(handle) = source.remote_handle() {
                reconciler.check_handle(handle)?;
            }
        }

        info!(
            source = %source,
            strategy = source.strategy_name(),
            since_id = ?watermark.since_id().map(|id| id.value()),
            "Loading statuses"
        );

        let watermark = watermark.clone();
        let settings = self.settings.clone();

        let statuses: StatusStream = match source {
            SourceDescriptor::Timeline { handle } => Box::pin(timeline_statuses(
                self.clients.twitter().await?,
                TimelineKind::UserTimeline,
                handle.clone(),
                watermark,
                settings,
            )),
            SourceDescriptor::Favorites { handle } => Box::pin(timeline_statuses(
                self.clients.twitter().await?,
                TimelineKind::Favorites,
                handle.clone(),
                watermark,
                settings,
            )),
            SourceDescriptor::MastodonStatuses { account } => Box::pin(account_statuses(
                self.clients.mastodon().await?,
                account.clone(),
                watermark,
                settings,
            )),
            SourceDescriptor::SingleFileArchive(path) => {
                Box::pin(archive_statuses(path.clone(), watermark))
            }
            SourceDescriptor::LineDelimited(path) => {
                Box::pin(line_delimited_statuses(path.clone(), watermark))
            }
            SourceDescriptor::MonthlyArchiveDir(path) => {
                Box::pin(monthly_statuses(path.clone(), watermark))
            }
            SourceDescriptor::LikesArchive(path) => Box::pin(liked_statuses(
                self.clients.twitter().await?,
                path.clone(),
                settings,
            )),
        };

        let reconciler = reconciler.clone();
        Ok(Box::pin(statuses.map(move |status| {
            status.and_then(|record| reconciler.reconcile(record, mode))
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::mock::StaticApiClients;
    use super::*;
    use crate::domain::remote::mock::{FakeMastodonApi, FakeTwitterApi};
    use crate::domain::retry::mock::RecordingSleeper;
    use futures::TryStreamExt;
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;

    fn jsonl(dir: &tempfile::TempDir, lines: &[Value]) -> PathBuf {
        let content = lines
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        let path = dir.path().join("statuses.jsonl");
        fs::write(&path, content).unwrap();
        path
    }

    fn tweet(id: u64, author: Option<&str>) -> Value {
        let mut status = json!({"id": id, "created_at": "Wed Oct 10 20:19:24 +0000 2018"});
        if let Some(author) = author {
            status["user"] = json!({"screen_name": author});
        }
        status
    }

    fn file_loader() -> SourceLoader {
        SourceLoader::new(Arc::new(StaticApiClients::new()))
    }

    async fn collect(
        loader: &SourceLoader,
        source: &SourceDescriptor,
        watermark: &Watermark,
        reconciler: &IdentityReconciler,
    ) -> Result<Vec<StatusRecord>, DomainError> {
        loader
            .load(source, watermark, reconciler)
            .await?
            .try_collect()
            .await
    }

    #[tokio::test]
    async fn test_empty_index_yields_every_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = jsonl(
            &dir,
            &[
                tweet(1, Some("alice")),
                tweet(2, Some("alice")),
                tweet(3, Some("alice")),
            ],
        );

        let records = collect(
            &file_loader(),
            &SourceDescriptor::LineDelimited(path),
            &Watermark::none(),
            &IdentityReconciler::default(),
        )
        .await
        .unwrap();

        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_resumes_after_watermark() {
        let dir = tempfile::tempdir().unwrap();
        let path = jsonl(
            &dir,
            &[99, 100, 101, 102]
                .iter()
                .map(|id| tweet(*id, Some("alice")))
                .collect::<Vec<_>>(),
        );
        let watermark = Watermark::new(StatusId::new(100), Some("alice".into()));
        let reconciler = IdentityReconciler::new(Some("alice".into()), None).unwrap();

        let records = collect(
            &file_loader(),
            &SourceDescriptor::LineDelimited(path),
            &watermark,
            &reconciler,
        )
        .await
        .unwrap();

        let ids: Vec<u64> = records.iter().map(|r| r.id().unwrap().value()).collect();
        assert_eq!(ids, vec![101, 102]);
    }

    #[tokio::test]
    async fn test_archive_without_author_and_fallback_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweet.js");
        fs::write(
            &path,
            r#"window.YTD.tweet.part0 = [{"tweet": {"id": "1", "created_at": "Wed Oct 10 20:19:24 +0000 2018"}}]"#,
        )
        .unwrap();

        let result = collect(
            &file_loader(),
            &SourceDescriptor::SingleFileArchive(path),
            &Watermark::none(),
            &IdentityReconciler::default(),
        )
        .await;

        assert!(matches!(result, Err(DomainError::MissingIdentity { .. })));
    }

    #[tokio::test]
    async fn test_archive_author_injected_from_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweet.js");
        fs::write(
            &path,
            r#"window.YTD.tweet.part0 = [{"tweet": {"id": "1", "created_at": "Wed Oct 10 20:19:24 +0000 2018"}}]"#,
        )
        .unwrap();
        let reconciler = IdentityReconciler::new(None, Some("alice".into())).unwrap();

        let records = collect(
            &file_loader(),
            &SourceDescriptor::SingleFileArchive(path),
            &Watermark::none(),
            &reconciler,
        )
        .await
        .unwrap();

        assert_eq!(records[0].author(), Some("alice"));
    }

    #[tokio::test]
    async fn test_foreign_author_aborts_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = jsonl(&dir, &[tweet(1, Some("alice")), tweet(2, Some("bob"))]);
        let reconciler = IdentityReconciler::new(Some("alice".into()), None).unwrap();

        let mut stream = file_loader()
            .load(
                &SourceDescriptor::LineDelimited(path),
                &Watermark::none(),
                &reconciler,
            )
            .await
            .unwrap();

        assert!(stream.next().await.unwrap().is_ok());
        assert!(matches!(
            stream.next().await.unwrap(),
            Err(DomainError::IdentityMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_favorites_may_belong_to_anyone() {
        let api = Arc::new(
            FakeTwitterApi::new().with_page(vec![tweet(5, Some("bob")), tweet(4, Some("carol"))]),
        );
        let loader = SourceLoader::new(Arc::new(StaticApiClients::new().with_twitter(api)))
            .with_settings(LoaderSettings::default().with_sleeper(Arc::new(RecordingSleeper::new())));
        let reconciler = IdentityReconciler::new(Some("alice".into()), None).unwrap();

        let records = collect(
            &loader,
            &SourceDescriptor::Favorites {
                handle: "alice".into(),
            },
            &Watermark::none(),
            &reconciler,
        )
        .await
        .unwrap();

        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_timeline_of_other_author_fails_before_fetching() {
        let api = Arc::new(FakeTwitterApi::new().with_page(vec![tweet(5, Some("bob"))]));
        let loader = SourceLoader::new(Arc::new(StaticApiClients::new().with_twitter(api.clone())));
        let reconciler = IdentityReconciler::new(Some("alice".into()), None).unwrap();

        let result = loader
            .load(
                &SourceDescriptor::Timeline {
                    handle: "bob".into(),
                },
                &Watermark::none(),
                &reconciler,
            )
            .await;

        assert!(matches!(result, Err(DomainError::IdentityMismatch { .. })));
        assert!(api.timeline_calls().is_empty());
    }

    #[tokio::test]
    async fn test_mastodon_handle_checked_against_index_author() {
        let api = Arc::new(FakeMastodonApi::new("42"));
        let loader =
            SourceLoader::new(Arc::new(StaticApiClients::new().with_mastodon(api.clone())));
        let reconciler =
            IdentityReconciler::new(Some("alice@example.social".into()), None).unwrap();

        let result = loader
            .load(
                &SourceDescriptor::MastodonStatuses {
                    account: "bob@example.social".into(),
                },
                &Watermark::none(),
                &reconciler,
            )
            .await;

        assert!(matches!(result, Err(DomainError::IdentityMismatch { .. })));
        assert!(api.lookups().is_empty());
    }

    #[tokio::test]
    async fn test_likes_are_not_filtered_by_watermark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("like.js");
        fs::write(
            &path,
            r#"window.YTD.like.part0 = [{"like": {"tweetId": "5"}}, {"like": {"tweetId": "500"}}]"#,
        )
        .unwrap();
        let api = Arc::new(FakeTwitterApi::new());
        let loader = SourceLoader::new(Arc::new(StaticApiClients::new().with_twitter(api)));
        let reconciler = IdentityReconciler::new(Some("alice".into()), None).unwrap();

        let records = collect(
            &loader,
            &SourceDescriptor::LikesArchive(path),
            &Watermark::new(StatusId::new(100), Some("alice".into())),
            &reconciler,
        )
        .await
        .unwrap();

        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_client_is_reported_on_load() {
        let result = file_loader()
            .load(
                &SourceDescriptor::Timeline {
                    handle: "alice".into(),
                },
                &Watermark::none(),
                &IdentityReconciler::default(),
            )
            .await;

        assert!(matches!(result, Err(DomainError::Credential { .. })));
    }
}
