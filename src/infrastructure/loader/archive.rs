//! Twitter archive exports
//!
//! Single-file exports (`tweet.js`, `tweets.js`, `tweets-part1.js`,
//! `like.js`) hold one JSON array behind a `window.YTD.<kind>.part<N> = `
//! assignment.

use std::path::{Path, PathBuf};

use async_stream::try_stream;
use futures::Stream;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::status::{Platform, StatusId, StatusRecord};
use crate::domain::watermark::Watermark;
use crate::domain::DomainError;

static ARCHIVE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*window\.YTD\.(\w+)\.part\d+\s*=\s*").unwrap());

/// Key each tweet archive element wraps its status under
const TWEET_WRAPPER: &str = "tweet";

/// Split the assignment prefix off an archive file, returning the archive
/// kind and the JSON payload
pub(crate) fn strip_archive_prefix<'a>(
    path: &Path,
    content: &'a str,
) -> Result<(&'a str, &'a str), DomainError> {
    let captures = ARCHIVE_PREFIX.captures(content).ok_or_else(|| {
        DomainError::malformed_archive(
            path.display().to_string(),
            "missing `window.YTD.<kind>.part<N> =` prefix",
        )
    })?;

    let kind = captures.get(1).map_or("", |m| m.as_str());
    let end = captures.get(0).map_or(0, |m| m.end());

    Ok((kind, &content[end..]))
}

/// Read an archive file and parse its JSON array, checking the archive kind
pub(crate) async fn read_archive_items(
    path: &Path,
    expected_kinds: &[&str],
) -> Result<Vec<Value>, DomainError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DomainError::io(path.display(), e))?;

    let (kind, payload) = strip_archive_prefix(path, &content)?;
    if !expected_kinds.contains(&kind) {
        return Err(DomainError::malformed_archive(
            path.display().to_string(),
            format!(
                "unexpected archive kind '{}', expected one of {:?}",
                kind, expected_kinds
            ),
        ));
    }

    parse_array(path, payload)
}

pub(crate) fn parse_array(path: &Path, payload: &str) -> Result<Vec<Value>, DomainError> {
    let value: Value = serde_json::from_str(payload).map_err(|e| {
        DomainError::malformed_archive(path.display().to_string(), format!("invalid JSON: {}", e))
    })?;

    match value {
        Value::Array(items) => Ok(items),
        _ => Err(DomainError::malformed_archive(
            path.display().to_string(),
            "expected a JSON array",
        )),
    }
}

/// Statuses of a single-file tweet archive newer than the watermark
pub fn archive_statuses(
    path: PathBuf,
    watermark: Watermark,
) -> impl Stream<Item = Result<StatusRecord, DomainError>> + Send + 'static {
    try_stream! {
        let items = read_archive_items(&path, &["tweet", "tweets"]).await?;
        info!(path = %path.display(), items = items.len(), "Read tweet archive");

        for item in items {
            let status = match item {
                Value::Object(mut wrapper) => wrapper.remove(TWEET_WRAPPER),
                _ => None,
            };
            let Some(status) = status else {
                Err(DomainError::malformed_archive(
                    path.display().to_string(),
                    format!("archive element without a `{}` object", TWEET_WRAPPER),
                ))?;
                return;
            };

            let record = StatusRecord::new(Platform::Twitter, status)?;
            let id = record.id()?;
            if !watermark.admits(id) {
                continue;
            }

            debug!(status_id = %id, "Read archived status");
            yield record;
        }
    }
}

/// Liked status ids of a `like.js` archive, ascending and deduplicated
pub(crate) async fn read_liked_ids(path: &Path) -> Result<Vec<StatusId>, DomainError> {
    let items = read_archive_items(path, &["like"]).await?;

    let mut ids = items
        .iter()
        .map(|item| {
            item.get("like")
                .and_then(|like| like.get("tweetId"))
                .and_then(StatusId::from_json)
                .ok_or_else(|| {
                    DomainError::malformed_archive(
                        path.display().to_string(),
                        format!("like without a numeric tweetId: {}", item),
                    )
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    ids.sort_unstable();
    ids.dedup();

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use std::fs;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    const TWEETS: &str = r#"window.YTD.tweet.part0 = [
  {"tweet": {"id": "99", "created_at": "Wed Oct 10 20:19:24 +0000 2018", "full_text": "a"}},
  {"tweet": {"id": "100", "created_at": "Wed Oct 10 20:19:25 +0000 2018", "full_text": "b"}},
  {"tweet": {"id": "101", "created_at": "Wed Oct 10 20:19:26 +0000 2018", "full_text": "c"}}
]"#;

    #[test]
    fn test_strip_prefix_any_part() {
        let path = Path::new("tweets-part1.js");
        let (kind, payload) =
            strip_archive_prefix(path, "window.YTD.tweets.part1 = [1]").unwrap();
        assert_eq!(kind, "tweets");
        assert_eq!(payload, "[1]");
    }

    #[test]
    fn test_missing_prefix_is_malformed() {
        let result = strip_archive_prefix(Path::new("tweet.js"), "[{\"tweet\": {}}]");
        assert!(matches!(result, Err(DomainError::MalformedArchive { .. })));
    }

    #[tokio::test]
    async fn test_archive_unwraps_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "tweet.js", TWEETS);

        let records: Vec<StatusRecord> =
            archive_statuses(path, Watermark::new(StatusId::new(100), None))
                .try_collect()
                .await
                .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id().unwrap(), StatusId::new(101));
        assert_eq!(records[0].get("full_text").unwrap(), "c");
    }

    #[tokio::test]
    async fn test_archive_without_watermark_yields_all() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "tweet.js", TWEETS);

        let records: Vec<StatusRecord> = archive_statuses(path, Watermark::none())
            .try_collect()
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_archive_of_wrong_kind_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "tweet.js", "window.YTD.like.part0 = []");

        let result: Result<Vec<StatusRecord>, _> = archive_statuses(path, Watermark::none())
            .try_collect()
            .await;

        assert!(matches!(result, Err(DomainError::MalformedArchive { .. })));
    }

    #[tokio::test]
    async fn test_element_without_wrapper_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "tweet.js", r#"window.YTD.tweet.part0 = [{"id": "1"}]"#);

        let result: Result<Vec<StatusRecord>, _> = archive_statuses(path, Watermark::none())
            .try_collect()
            .await;

        assert!(matches!(result, Err(DomainError::MalformedArchive { .. })));
    }

    #[tokio::test]
    async fn test_liked_ids_sorted_numerically() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "like.js",
            r#"window.YTD.like.part0 = [
  {"like": {"tweetId": "900", "fullText": "x"}},
  {"like": {"tweetId": "1000"}},
  {"like": {"tweetId": "95"}},
  {"like": {"tweetId": "900"}}
]"#,
        );

        let ids = read_liked_ids(&path).await.unwrap();
        assert_eq!(
            ids,
            vec![StatusId::new(95), StatusId::new(900), StatusId::new(1000)]
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = read_liked_ids(Path::new("/nonexistent/like.js")).await;
        assert!(matches!(result, Err(DomainError::Io { .. })));
    }
}
