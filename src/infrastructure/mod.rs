//! Infrastructure layer - External service implementations

pub mod credentials;
pub mod http_client;
pub mod ingestion;
pub mod loader;
pub mod logging;
pub mod mastodon;
pub mod store;
pub mod twitter;

pub use http_client::{HttpClient, HttpClientTrait};
