//! End-to-end ingestion run: watermark, load, reconcile, bulk write

use std::sync::Arc;

use tracing::info;

use super::ingester::{BulkIngester, IngestReport};
use super::watermark::WatermarkResolver;
use crate::domain::identity::IdentityReconciler;
use crate::domain::source::SourceDescriptor;
use crate::domain::store::StatusStore;
use crate::domain::watermark::Watermark;
use crate::domain::DomainError;
use crate::infrastructure::loader::SourceLoader;

/// Parameters of one ingestion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionRequest {
    /// Source descriptor (`api:<handle>`, an archive path, ...)
    pub source: String,
    /// Destination index
    pub index: String,
    /// Author to inject into statuses without one; must match the index
    pub screen_name: Option<String>,
    /// Ingest everything without reading the index's last status first
    pub skip_last_status_check: bool,
}

impl IngestionRequest {
    pub fn new(source: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            index: index.into(),
            screen_name: None,
            skip_last_status_check: false,
        }
    }

    pub fn with_screen_name(mut self, screen_name: Option<String>) -> Self {
        self.screen_name = screen_name;
        self
    }

    pub fn with_skip_last_status_check(mut self, skip: bool) -> Self {
        self.skip_last_status_check = skip;
        self
    }
}

/// Ingestion pipeline for loading statuses into an index
#[derive(Debug)]
pub struct IngestionPipeline<S: StatusStore> {
    resolver: WatermarkResolver<S>,
    loader: SourceLoader,
    ingester: BulkIngester<S>,
}

impl<S: StatusStore> IngestionPipeline<S> {
    pub fn new(store: Arc<S>, loader: SourceLoader) -> Self {
        Self {
            resolver: WatermarkResolver::new(Arc::clone(&store)),
            loader,
            ingester: BulkIngester::new(store),
        }
    }

    pub fn with_ingester(mut self, ingester: BulkIngester<S>) -> Self {
        self.ingester = ingester;
        self
    }

    /// Resume point of `index` without ingesting anything
    pub async fn last_status(&self, index: &str) -> Result<Watermark, DomainError> {
        self.resolver.resolve(index).await
    }

    pub async fn run(&self, request: &IngestionRequest) -> Result<IngestReport, DomainError> {
        let source = SourceDescriptor::classify(&request.source)?;

        let watermark = if request.skip_last_status_check {
            info!(index = %request.index, "Skipping last status check");
            Watermark::none()
        } else {
            self.resolver.resolve(&request.index).await?
        };

        let reconciler = IdentityReconciler::new(
            watermark.author().map(str::to_string),
            request.screen_name.clone(),
        )?;

        let statuses = self.loader.load(&source, &watermark, &reconciler).await?;
        self.ingester.ingest(&request.index, statuses).await
    }
}
