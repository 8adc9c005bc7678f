//! CLI module for tbeat
//!
//! Provides subcommands:
//! - `ingest`: load a source into an index, resuming after its last status
//! - `last-status`: show the resume point of an index

pub mod ingest;
pub mod last_status;

use clap::{Args, Parser, Subcommand};
use reqwest::Url;

use crate::config::{AppConfig, ElasticsearchConfig};
use crate::infrastructure::store::ElasticsearchStore;
use crate::infrastructure::HttpClient;

/// tbeat - Incremental ingestion of tweets, likes and Mastodon statuses into Elasticsearch
#[derive(Parser)]
#[command(name = "tbeat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest statuses from a source into an index
    Ingest(ingest::IngestArgs),

    /// Print the last status stored in an index
    LastStatus(last_status::LastStatusArgs),
}

/// Elasticsearch connection flags shared by all commands
#[derive(Args, Clone, Debug, Default)]
pub struct StoreArgs {
    /// Elasticsearch URL (overrides config)
    #[arg(long = "es", value_name = "URL")]
    pub es: Option<String>,
}

/// Resolve the Elasticsearch URL, embedding configured basic-auth credentials
pub fn elasticsearch_url(
    config: &ElasticsearchConfig,
    override_url: Option<&str>,
) -> anyhow::Result<String> {
    let raw = override_url.unwrap_or(&config.url);
    let mut url = Url::parse(raw)
        .map_err(|e| anyhow::anyhow!("Invalid Elasticsearch URL '{}': {}", raw, e))?;

    if let Some(username) = &config.username {
        if url.username().is_empty() {
            url.set_username(username)
                .map_err(|_| anyhow::anyhow!("Cannot set username on '{}'", raw))?;
            url.set_password(config.password.as_deref())
                .map_err(|_| anyhow::anyhow!("Cannot set password on '{}'", raw))?;
        }
    }

    Ok(url.to_string())
}

/// Build the Elasticsearch store from config and command-line overrides
pub fn build_store(
    config: &AppConfig,
    args: &StoreArgs,
) -> anyhow::Result<ElasticsearchStore<HttpClient>> {
    let url = elasticsearch_url(&config.elasticsearch, args.es.as_deref())?;
    let client = HttpClient::with_timeout(config.elasticsearch.timeout())?;
    let store = ElasticsearchStore::with_base_url(client, url);

    Ok(match &config.elasticsearch.api_key {
        Some(api_key) => store.with_api_key(api_key),
        None => store,
    })
}
