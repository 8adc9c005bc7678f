//! Construction of remote API clients from injected credentials

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::remote::{MastodonApi, TwitterApi};
use crate::domain::{Credential, CredentialProvider, CredentialType, DomainError};
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::mastodon::MastodonClient;
use crate::infrastructure::twitter::{TwitterClient, DEFAULT_TWITTER_BASE_URL};

/// Hands out authenticated API clients to the remote strategies
#[async_trait]
pub trait ApiClientProvider: Send + Sync + Debug {
    async fn twitter(&self) -> Result<Arc<dyn TwitterApi>, DomainError>;

    async fn mastodon(&self) -> Result<Arc<dyn MastodonApi>, DomainError>;
}

/// Builds clients on demand from a credential provider
#[derive(Debug)]
pub struct CredentialApiClients {
    credentials: Arc<dyn CredentialProvider>,
    http: HttpClient,
    twitter_base_url: String,
}

impl CredentialApiClients {
    pub fn new(credentials: Arc<dyn CredentialProvider>, http: HttpClient) -> Self {
        Self {
            credentials,
            http,
            twitter_base_url: DEFAULT_TWITTER_BASE_URL.to_string(),
        }
    }

    /// Twitter base URL used when the credential does not name one
    pub fn with_twitter_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.twitter_base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ApiClientProvider for CredentialApiClients {
    async fn twitter(&self) -> Result<Arc<dyn TwitterApi>, DomainError> {
        match self.credentials.get_credential(CredentialType::Twitter).await? {
            Credential::Twitter {
                bearer_token,
                api_base_url,
            } => Ok(Arc::new(TwitterClient::with_base_url(
                self.http.clone(),
                bearer_token,
                api_base_url.unwrap_or_else(|| self.twitter_base_url.clone()),
            ))),
            other => Err(unexpected_credential(CredentialType::Twitter, &other)),
        }
    }

    async fn mastodon(&self) -> Result<Arc<dyn MastodonApi>, DomainError> {
        match self.credentials.get_credential(CredentialType::Mastodon).await? {
            Credential::Mastodon {
                access_token,
                api_base_url,
            } => Ok(Arc::new(MastodonClient::new(
                self.http.clone(),
                api_base_url,
                access_token,
            ))),
            other => Err(unexpected_credential(CredentialType::Mastodon, &other)),
        }
    }
}

fn unexpected_credential(expected: CredentialType, found: &Credential) -> DomainError {
    DomainError::credential(format!(
        "expected a {} credential, provider returned a {} one",
        expected,
        found.credential_type()
    ))
}
