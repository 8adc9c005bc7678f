//! Last-status command - shows where the next ingestion resumes

use std::sync::Arc;

use clap::Args;

use super::{build_store, StoreArgs};
use crate::config::AppConfig;
use crate::domain::Watermark;
use crate::infrastructure::ingestion::WatermarkResolver;

/// Arguments for the last-status command
#[derive(Args, Clone, Debug)]
pub struct LastStatusArgs {
    /// Index to inspect
    pub index: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

fn describe(index: &str, watermark: &Watermark) -> String {
    match watermark.since_id() {
        Some(id) => format!(
            "{}: last status {} by {} created at {}",
            index,
            id,
            watermark.author().unwrap_or("unknown author"),
            watermark.created_at().unwrap_or("unknown time")
        ),
        None => format!("{}: no statuses", index),
    }
}

pub async fn run(args: LastStatusArgs, config: &AppConfig) -> anyhow::Result<()> {
    let store = Arc::new(build_store(config, &args.store)?);
    let watermark = WatermarkResolver::new(store).resolve(&args.index).await?;

    println!("{}", describe(&args.index, &watermark));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StatusId;

    #[test]
    fn test_describe_empty_index() {
        assert_eq!(describe("tweets", &Watermark::none()), "tweets: no statuses");
    }

    #[test]
    fn test_describe_watermark() {
        let watermark = Watermark::new(StatusId::new(42), Some("alice".into()));
        assert_eq!(
            describe("tweets", &watermark),
            "tweets: last status 42 by alice created at unknown time"
        );
    }
}
