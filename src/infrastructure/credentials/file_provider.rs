use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::{Credential, CredentialProvider, CredentialType, DomainError};

pub const DEFAULT_TWITTER_TOKENS_FILE: &str = "tokens.json";
pub const DEFAULT_MASTODON_TOKENS_FILE: &str = "mastodon_tokens.json";

#[derive(Debug, Deserialize)]
struct TwitterTokens {
    bearer_token: String,
    #[serde(default)]
    api_base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MastodonTokens {
    api_base_url: String,
    access_token: String,
}

/// Credential provider that reads per-platform JSON token files
#[derive(Debug, Clone)]
pub struct FileCredentialProvider {
    twitter_tokens: PathBuf,
    mastodon_tokens: PathBuf,
}

impl FileCredentialProvider {
    pub fn new(twitter_tokens: impl Into<PathBuf>, mastodon_tokens: impl Into<PathBuf>) -> Self {
        Self {
            twitter_tokens: twitter_tokens.into(),
            mastodon_tokens: mastodon_tokens.into(),
        }
    }

    fn path_for(&self, credential_type: CredentialType) -> &Path {
        match credential_type {
            CredentialType::Twitter => &self.twitter_tokens,
            CredentialType::Mastodon => &self.mastodon_tokens,
        }
    }

    async fn read_credential(
        &self,
        credential_type: CredentialType,
    ) -> Result<Credential, DomainError> {
        let path = self.path_for(credential_type);
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::credential(format!(
                "Cannot read {} tokens from {}: {}",
                credential_type,
                path.display(),
                e
            ))
        })?;

        let invalid = |e: serde_json::Error| {
            DomainError::credential(format!(
                "Invalid {} tokens in {}: {}",
                credential_type,
                path.display(),
                e
            ))
        };

        let credential = match credential_type {
            CredentialType::Twitter => {
                let tokens: TwitterTokens = serde_json::from_str(&raw).map_err(invalid)?;
                let credential = Credential::twitter(tokens.bearer_token);

                match tokens.api_base_url {
                    Some(url) => credential.with_api_base_url(url),
                    None => credential,
                }
            }
            CredentialType::Mastodon => {
                let tokens: MastodonTokens = serde_json::from_str(&raw).map_err(invalid)?;
                Credential::mastodon(tokens.api_base_url, tokens.access_token)
            }
        };

        Ok(credential)
    }
}

impl Default for FileCredentialProvider {
    fn default() -> Self {
        Self::new(DEFAULT_TWITTER_TOKENS_FILE, DEFAULT_MASTODON_TOKENS_FILE)
    }
}

#[async_trait]
impl CredentialProvider for FileCredentialProvider {
    async fn get_credential(
        &self,
        credential_type: CredentialType,
    ) -> Result<Credential, DomainError> {
        self.read_credential(credential_type).await
    }

    fn provider_name(&self) -> &'static str {
        "file"
    }
}
