use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::file_provider::{DEFAULT_MASTODON_TOKENS_FILE, DEFAULT_TWITTER_TOKENS_FILE};
use super::{CachedCredentialProvider, EnvCredentialProvider, FileCredentialProvider};
use crate::domain::CredentialProvider;

/// Where API credentials are read from
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// `tokens.json` and `mastodon_tokens.json`
    File {
        #[serde(default = "default_twitter_tokens")]
        twitter_tokens: PathBuf,
        #[serde(default = "default_mastodon_tokens")]
        mastodon_tokens: PathBuf,
    },
    /// `<prefix>TWITTER_BEARER_TOKEN` and friends
    Env {
        #[serde(default)]
        prefix: String,
    },
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::File {
            twitter_tokens: default_twitter_tokens(),
            mastodon_tokens: default_mastodon_tokens(),
        }
    }
}

fn default_twitter_tokens() -> PathBuf {
    PathBuf::from(DEFAULT_TWITTER_TOKENS_FILE)
}

fn default_mastodon_tokens() -> PathBuf {
    PathBuf::from(DEFAULT_MASTODON_TOKENS_FILE)
}

/// Factory for creating credential providers
#[derive(Debug)]
pub struct CredentialProviderFactory;

impl CredentialProviderFactory {
    pub fn create(config: &ProviderConfig) -> Arc<dyn CredentialProvider> {
        match config {
            ProviderConfig::File {
                twitter_tokens,
                mastodon_tokens,
            } => Arc::new(FileCredentialProvider::new(twitter_tokens, mastodon_tokens)),
            ProviderConfig::Env { prefix } => Arc::new(EnvCredentialProvider::with_prefix(prefix)),
        }
    }

    /// Create a provider whose credentials are memoized for `cache_ttl`
    pub fn create_cached(
        config: &ProviderConfig,
        cache_ttl: Duration,
    ) -> Arc<dyn CredentialProvider> {
        Arc::new(CachedCredentialProvider::new(Self::create(config), cache_ttl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Credential, CredentialType};

    #[test]
    fn test_factory_creates_file_provider_by_default() {
        let provider = CredentialProviderFactory::create(&ProviderConfig::default());
        assert_eq!(provider.provider_name(), "file");
    }

    #[test]
    fn test_factory_creates_env_provider() {
        let config = ProviderConfig::Env {
            prefix: String::new(),
        };
        let provider = CredentialProviderFactory::create(&config);
        assert_eq!(provider.provider_name(), "env");
    }

    #[test]
    fn test_cached_provider_keeps_inner_name() {
        let provider = CredentialProviderFactory::create_cached(
            &ProviderConfig::Env {
                prefix: "TBEAT_".into(),
            },
            Duration::from_secs(60),
        );
        assert_eq!(provider.provider_name(), "env");
    }

    #[test]
    fn test_provider_config_deserializes_defaults() {
        let file: ProviderConfig = serde_json::from_str(r#"{"type": "file"}"#).unwrap();
        assert_eq!(file, ProviderConfig::default());

        let env: ProviderConfig = serde_json::from_str(r#"{"type": "env"}"#).unwrap();
        assert_eq!(
            env,
            ProviderConfig::Env {
                prefix: String::new()
            }
        );
    }

    #[tokio::test]
    async fn test_file_provider_reads_through_factory() {
        let dir = tempfile::tempdir().unwrap();
        let twitter = dir.path().join("tokens.json");
        std::fs::write(&twitter, r#"{"bearer_token": "AAAA"}"#).unwrap();

        let config = ProviderConfig::File {
            twitter_tokens: twitter,
            mastodon_tokens: dir.path().join("mastodon_tokens.json"),
        };
        let provider = CredentialProviderFactory::create_cached(&config, Duration::from_secs(60));

        let cred = provider
            .get_credential(CredentialType::Twitter)
            .await
            .unwrap();
        assert_eq!(cred, Credential::twitter("AAAA"));
    }
}
