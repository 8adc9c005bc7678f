//! Mastodon REST API client

mod client;
mod html;

pub use client::{MastodonClient, STATUSES_PAGE_LIMIT};
pub use html::{add_content_text, strip_html_tags, CONTENT_TEXT_FIELD};
