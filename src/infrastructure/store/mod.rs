//! Status store implementations

mod elasticsearch;
mod in_memory;

pub use elasticsearch::{ElasticsearchStore, DEFAULT_ELASTICSEARCH_URL};
pub use in_memory::InMemoryStatusStore;
