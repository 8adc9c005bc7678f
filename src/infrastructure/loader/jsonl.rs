//! One status object per line

use std::path::PathBuf;

use async_stream::try_stream;
use futures::Stream;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::domain::status::StatusRecord;
use crate::domain::watermark::Watermark;
use crate::domain::DomainError;

/// Statuses of a line-delimited JSON file newer than the watermark.
///
/// The platform of each line is detected from its author container.
pub fn line_delimited_statuses(
    path: PathBuf,
    watermark: Watermark,
) -> impl Stream<Item = Result<StatusRecord, DomainError>> + Send + 'static {
    try_stream! {
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|e| DomainError::io(path.display(), e))?;
        let mut lines = BufReader::new(file).lines();
        let mut line_number = 0usize;

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| DomainError::io(path.display(), e))?
        {
            line_number += 1;
            if line.trim().is_empty() {
                continue;
            }

            let value = serde_json::from_str(&line).map_err(|e| {
                DomainError::malformed_archive(
                    path.display().to_string(),
                    format!("line {}: {}", line_number, e),
                )
            })?;

            let record = StatusRecord::detect(value)?;
            let id = record.id()?;
            if !watermark.admits(id) {
                continue;
            }

            debug!(status_id = %id, line = line_number, "Read status");
            yield record;
        }
    }
}
