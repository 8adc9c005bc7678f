//! Remote status APIs
//!
//! Both platforms signal throttling with `DomainError::RateLimited`; callers
//! wrap calls in [`crate::domain::retry::retry_on_rate_limit`].

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use super::status::StatusId;
use super::DomainError;

/// Which per-user Twitter listing to page through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineKind {
    /// Statuses written by the user
    UserTimeline,
    /// Statuses the user favorited
    Favorites,
}

impl TimelineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserTimeline => "user_timeline",
            Self::Favorites => "favorites",
        }
    }
}

/// One page request against a Twitter timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineQuery {
    pub screen_name: String,
    /// Only statuses newer than this id (server-side filter)
    pub since_id: Option<StatusId>,
    /// Only statuses at or below this id (pagination cursor)
    pub max_id: Option<StatusId>,
    pub count: u32,
}

impl TimelineQuery {
    pub fn new(screen_name: impl Into<String>, count: u32) -> Self {
        Self {
            screen_name: screen_name.into(),
            since_id: None,
            max_id: None,
            count,
        }
    }

    pub fn with_since_id(mut self, since_id: Option<StatusId>) -> Self {
        self.since_id = since_id;
        self
    }

    pub fn with_max_id(mut self, max_id: Option<StatusId>) -> Self {
        self.max_id = max_id;
        self
    }
}

/// Twitter REST operations used by the loaders
#[async_trait]
pub trait TwitterApi: Send + Sync + Debug {
    /// One page of a timeline, newest first; empty when exhausted
    async fn timeline(
        &self,
        kind: TimelineKind,
        query: &TimelineQuery,
    ) -> Result<Vec<Value>, DomainError>;

    /// Full statuses for up to 100 ids, in provider order
    async fn lookup_statuses(&self, ids: &[StatusId]) -> Result<Vec<Value>, DomainError>;
}

/// Mastodon REST operations used by the loaders
#[async_trait]
pub trait MastodonApi: Send + Sync + Debug {
    /// Resolve `user@instance` to the instance-local account id
    async fn lookup_account(&self, acct: &str) -> Result<String, DomainError>;

    /// One page of an account's statuses below `max_id`, newest first
    async fn account_statuses(
        &self,
        account_id: &str,
        max_id: Option<&str>,
    ) -> Result<Vec<Value>, DomainError>;

    /// Host of the instance the client talks to, used to qualify local handles
    fn instance_host(&self) -> Option<&str>;
}
