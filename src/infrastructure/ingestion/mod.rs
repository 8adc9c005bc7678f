//! Status ingestion

mod ingester;
mod pipeline;
mod watermark;

pub use ingester::{
    prepare_action, BulkIngester, IngestReport, DEFAULT_BULK_CHUNK_SIZE,
    DEFAULT_PROGRESS_INTERVAL, TIMESTAMP_FIELD,
};
pub use pipeline::{IngestionPipeline, IngestionRequest};
pub use watermark::WatermarkResolver;
