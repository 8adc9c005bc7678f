//! Twitter REST API client

mod client;

pub use client::{TwitterClient, DEFAULT_TWITTER_BASE_URL, LOOKUP_BATCH_LIMIT};
