//! Legacy archive exports: one `YYYY_MM.js` file per month, each starting
//! with a `Grailbird.data.tweets_YYYY_MM =` line

use std::path::{Path, PathBuf};

use async_stream::try_stream;
use futures::Stream;
use tracing::{debug, info};

use super::archive::parse_array;
use crate::domain::status::{Platform, StatusRecord};
use crate::domain::watermark::Watermark;
use crate::domain::DomainError;

/// `*.js` files of a directory in lexicographic (hence chronological) order
async fn monthly_files(dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| DomainError::io(dir.display(), e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DomainError::io(dir.display(), e))?
    {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "js") && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Drop the assignment preamble line
fn strip_preamble<'a>(path: &Path, content: &'a str) -> Result<&'a str, DomainError> {
    content
        .split_once('\n')
        .map(|(_, rest)| rest)
        .ok_or_else(|| {
            DomainError::malformed_archive(
                path.display().to_string(),
                "expected an assignment line followed by a JSON array",
            )
        })
}

/// Statuses of every monthly file newer than the watermark, file by file
pub fn monthly_statuses(
    dir: PathBuf,
    watermark: Watermark,
) -> impl Stream<Item = Result<StatusRecord, DomainError>> + Send + 'static {
    try_stream! {
        let files = monthly_files(&dir).await?;
        info!(dir = %dir.display(), files = files.len(), "Reading monthly archive");

        for file in files {
            let content = tokio::fs::read_to_string(&file)
                .await
                .map_err(|e| DomainError::io(file.display(), e))?;
            let statuses = parse_array(&file, strip_preamble(&file, &content)?)?;
            info!(file = %file.display(), statuses = statuses.len(), "Read monthly archive file");

            for status in statuses {
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
}
