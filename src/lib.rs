//! tbeat
//!
//! Incremental ingestion of social-media statuses into Elasticsearch:
//! - Twitter timelines, favorites and likes through the v1.1 REST API
//! - Twitter data-export archives (single file, monthly directory, JSON lines)
//! - Mastodon account statuses
//!
//! Every run resumes after the most recent status already in the index and
//! refuses to mix statuses of different authors in one index.

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
