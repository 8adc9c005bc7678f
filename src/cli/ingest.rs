//! Ingest command - loads one source into an index

use std::sync::Arc;

use clap::Args;
use tracing::info;

use super::{build_store, StoreArgs};
use crate::config::AppConfig;
use crate::domain::CredentialProvider;
use crate::infrastructure::credentials::CredentialProviderFactory;
use crate::infrastructure::ingestion::{BulkIngester, IngestionPipeline, IngestionRequest};
use crate::infrastructure::loader::{CredentialApiClients, SourceLoader};
use crate::infrastructure::HttpClient;

/// Arguments for the ingest command
#[derive(Args, Clone, Debug)]
pub struct IngestArgs {
    /// Source: api:<handle>, api-fav:<handle>, masto-api:<user@instance>,
    /// a .js archive file, a .jsonl file or a monthly archive directory
    pub source: String,

    /// Destination index
    pub index: String,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Author for statuses that carry none; must match the index's last author
    #[arg(long)]
    pub screen_name: Option<String>,

    /// Ingest everything without looking up the index's last status
    #[arg(long)]
    pub skip_last_status_check: bool,
}

impl IngestArgs {
    fn request(&self) -> IngestionRequest {
        IngestionRequest::new(&self.source, &self.index)
            .with_screen_name(self.screen_name.clone())
            .with_skip_last_status_check(self.skip_last_status_check)
    }
}

fn credential_provider(config: &AppConfig) -> Arc<dyn CredentialProvider> {
    match config.credentials.cache_ttl() {
        Some(ttl) => CredentialProviderFactory::create_cached(&config.credentials.provider, ttl),
        None => CredentialProviderFactory::create(&config.credentials.provider),
    }
}

/// Run one ingestion
pub async fn run(args: IngestArgs, config: &AppConfig) -> anyhow::Result<()> {
    let store = Arc::new(build_store(config, &args.store)?);

    let clients = CredentialApiClients::new(credential_provider(config), HttpClient::new())
        .with_twitter_base_url(&config.twitter.base_url);
    let loader =
        SourceLoader::new(Arc::new(clients)).with_settings(config.ingestion.loader_settings());

    let ingester = BulkIngester::new(Arc::clone(&store))
        .with_chunk_size(config.ingestion.bulk_chunk_size)
        .with_progress_interval(config.ingestion.progress_interval);
    let pipeline = IngestionPipeline::new(store, loader).with_ingester(ingester);

    info!(source = %args.source, index = %args.index, "Starting ingestion");
    let report = pipeline.run(&args.request()).await?;

    info!(
        received = report.received,
        indexed = report.indexed,
        requests = report.requests,
        "Ingested {} statuses into {}",
        report.indexed,
        args.index
    );

    Ok(())
}
