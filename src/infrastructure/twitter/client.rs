use async_trait::async_trait;
use serde_json::Value;

use crate::domain::remote::{TimelineKind, TimelineQuery, TwitterApi};
use crate::domain::status::StatusId;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

pub const DEFAULT_TWITTER_BASE_URL: &str = "https://api.twitter.com/1.1";

/// Most ids `statuses/lookup` accepts per call
pub const LOOKUP_BATCH_LIMIT: usize = 100;

/// Twitter v1.1 REST client authenticated with an app bearer token
#[derive(Debug)]
pub struct TwitterClient<C: HttpClientTrait> {
    client: C,
    authorization: String,
    base_url: String,
}

impl<C: HttpClientTrait> TwitterClient<C> {
    pub fn with_base_url(
        client: C,
        bearer_token: impl AsRef<str>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            authorization: format!("Bearer {}", bearer_token.as_ref()),
            base_url,
        }
    }

    fn timeline_url(&self, kind: TimelineKind) -> String {
        match kind {
            TimelineKind::UserTimeline => format!("{}/statuses/user_timeline.json", self.base_url),
            TimelineKind::Favorites => format!("{}/favorites/list.json", self.base_url),
        }
    }

    fn lookup_url(&self) -> String {
        format!("{}/statuses/lookup.json", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![("Authorization", self.authorization.as_str())]
    }
}

fn status_list(response: Value, endpoint: &str) -> Result<Vec<Value>, DomainError> {
    match response {
        Value::Array(statuses) => Ok(statuses),
        other => Err(DomainError::provider(
            "twitter",
            format!("Expected a status array from {}, got: {}", endpoint, other),
        )),
    }
}

fn map_twitter_error(error: DomainError) -> DomainError {
    match error {
        DomainError::RateLimited { .. } => DomainError::rate_limited("twitter"),
        DomainError::Provider { message, .. } => DomainError::provider("twitter", message),
        other => other,
    }
}

#[async_trait]
impl<C: HttpClientTrait> TwitterApi for TwitterClient<C> {
    async fn timeline(
        &self,
        kind: TimelineKind,
        query: &TimelineQuery,
    ) -> Result<Vec<Value>, DomainError> {
        let mut params = vec![
            ("screen_name", query.screen_name.clone()),
            ("count", query.count.to_string()),
            ("tweet_mode", "extended".to_string()),
            ("include_entities", "true".to_string()),
        ];

        if kind == TimelineKind::UserTimeline {
            params.push(("trim_user", "false".to_string()));
        }
        if let Some(since_id) = query.since_id {
            params.push(("since_id", since_id.to_string()));
        }
        if let Some(max_id) = query.max_id {
            params.push(("max_id", max_id.to_string()));
        }

        let response = self
            .client
            .get_json(&self.timeline_url(kind), self.headers(), &params)
            .await
            .map_err(map_twitter_error)?;

        status_list(response, kind.as_str())
    }

    async fn lookup_statuses(&self, ids: &[StatusId]) -> Result<Vec<Value>, DomainError> {
        if ids.len() > LOOKUP_BATCH_LIMIT {
            return Err(DomainError::validation(format!(
                "statuses/lookup accepts at most {} ids, got {}",
                LOOKUP_BATCH_LIMIT,
                ids.len()
            )));
        }

        let id_list = ids
            .iter()
            .map(StatusId::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let params = [
            ("id", id_list),
            ("tweet_mode", "extended".to_string()),
            ("include_entities", "true".to_string()),
        ];

        let response = self
            .client
            .get_json(&self.lookup_url(), self.headers(), &params)
            .await
            .map_err(map_twitter_error)?;

        status_list(response, "lookup")
    }
}
