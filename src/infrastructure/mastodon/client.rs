use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::remote::MastodonApi;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

/// Page size of `accounts/:id/statuses`; the server maximum
pub const STATUSES_PAGE_LIMIT: u32 = 40;

/// Mastodon REST client bound to one instance
#[derive(Debug)]
pub struct MastodonClient<C: HttpClientTrait> {
    client: C,
    authorization: String,
    base_url: String,
    host: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Account {
    id: String,
}

impl<C: HttpClientTrait> MastodonClient<C> {
    pub fn new(client: C, base_url: impl Into<String>, access_token: impl AsRef<str>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let host = reqwest::Url::parse(&base_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string));

        Self {
            client,
            authorization: format!("Bearer {}", access_token.as_ref()),
            base_url,
            host,
        }
    }

    fn lookup_url(&self) -> String {
        format!("{}/api/v1/accounts/lookup", self.base_url)
    }

    fn statuses_url(&self, account_id: &str) -> String {
        format!("{}/api/v1/accounts/{}/statuses", self.base_url, account_id)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![("Authorization", self.authorization.as_str())]
    }
}

fn map_mastodon_error(error: DomainError) -> DomainError {
    match error {
        DomainError::RateLimited { .. } => DomainError::rate_limited("mastodon"),
        DomainError::Provider { message, .. } => DomainError::provider("mastodon", message),
        other => other,
    }
}

#[async_trait]
impl<C: HttpClientTrait> MastodonApi for MastodonClient<C> {
    async fn lookup_account(&self, acct: &str) -> Result<String, DomainError> {
        let response = self
            .client
            .get_json(&self.lookup_url(), self.headers(), &[("acct", acct.to_string())])
            .await
            .map_err(|e| match e {
                DomainError::NotFound { .. } => {
                    DomainError::not_found(format!("Mastodon account '{}'", acct))
                }
                other => map_mastodon_error(other),
            })?;

        let account: Account = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("mastodon", format!("Failed to parse account: {}", e))
        })?;

        Ok(account.id)
    }

    async fn account_statuses(
        &self,
        account_id: &str,
        max_id: Option<&str>,
    ) -> Result<Vec<Value>, DomainError> {
        let mut params = vec![("limit", STATUSES_PAGE_LIMIT.to_string())];
        if let Some(max_id) = max_id {
            params.push(("max_id", max_id.to_string()));
        }

        let response = self
            .client
            .get_json(&self.statuses_url(account_id), self.headers(), &params)
            .await
            .map_err(map_mastodon_error)?;

        match response {
            Value::Array(statuses) => Ok(statuses),
            other => Err(DomainError::provider(
                "mastodon",
                format!("Expected a status array, got: {}", other),
            )),
        }
    }

    fn instance_host(&self) -> Option<&str> {
        self.host.as_deref()
    }
}
