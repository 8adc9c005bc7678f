use async_trait::async_trait;
use std::env;

use crate::domain::{Credential, CredentialProvider, CredentialType, DomainError};

/// Names of the variables holding one platform's token and API base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenVars {
    pub token: String,
    pub api_base_url: String,
}

impl TokenVars {
    fn prefixed(prefix: &str, token: &str, api_base_url: &str) -> Self {
        Self {
            token: format!("{}{}", prefix, token),
            api_base_url: format!("{}{}", prefix, api_base_url),
        }
    }
}

/// Credential provider reading the tokens from environment variables.
///
/// The Twitter base URL is optional; a Mastodon token is useless without
/// the instance that issued it, so both Mastodon variables are required.
#[derive(Debug, Clone)]
pub struct EnvCredentialProvider {
    twitter: TokenVars,
    mastodon: TokenVars,
}

impl EnvCredentialProvider {
    pub fn new(twitter: TokenVars, mastodon: TokenVars) -> Self {
        Self { twitter, mastodon }
    }

    /// `<prefix>TWITTER_BEARER_TOKEN`, `<prefix>TWITTER_API_BASE_URL`,
    /// `<prefix>MASTODON_ACCESS_TOKEN` and `<prefix>MASTODON_API_BASE_URL`
    pub fn with_prefix(prefix: &str) -> Self {
        Self::new(
            TokenVars::prefixed(prefix, "TWITTER_BEARER_TOKEN", "TWITTER_API_BASE_URL"),
            TokenVars::prefixed(prefix, "MASTODON_ACCESS_TOKEN", "MASTODON_API_BASE_URL"),
        )
    }

    fn credential_from(
        &self,
        credential_type: CredentialType,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Credential, DomainError> {
        let required = |var: &str| {
            lookup(var).ok_or_else(|| {
                DomainError::credential(format!(
                    "Environment variable '{}' not set for {} credentials",
                    var, credential_type
                ))
            })
        };

        match credential_type {
            CredentialType::Twitter => {
                let credential = Credential::twitter(required(&self.twitter.token)?);
                Ok(match lookup(&self.twitter.api_base_url) {
                    Some(url) => credential.with_api_base_url(url),
                    None => credential,
                })
            }
            CredentialType::Mastodon => Ok(Credential::mastodon(
                required(&self.mastodon.api_base_url)?,
                required(&self.mastodon.token)?,
            )),
        }
    }
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::with_prefix("")
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn get_credential(
        &self,
        credential_type: CredentialType,
    ) -> Result<Credential, DomainError> {
        self.credential_from(credential_type, non_empty_var)
    }

    fn provider_name(&self) -> &'static str {
        "env"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_variable_names() {
        let provider = EnvCredentialProvider::default();

        assert_eq!(provider.twitter.token, "TWITTER_BEARER_TOKEN");
        assert_eq!(provider.mastodon.api_base_url, "MASTODON_API_BASE_URL");
    }

    #[test]
    fn test_prefixed_variable_names() {
        let provider = EnvCredentialProvider::with_prefix("TBEAT_");

        assert_eq!(provider.twitter.api_base_url, "TBEAT_TWITTER_API_BASE_URL");
        assert_eq!(provider.mastodon.token, "TBEAT_MASTODON_ACCESS_TOKEN");
    }

    #[test]
    fn test_twitter_token_without_base_url() {
        let provider = EnvCredentialProvider::default();
        let cred = provider
            .credential_from(
                CredentialType::Twitter,
                vars(&[("TWITTER_BEARER_TOKEN", "AAAA")]),
            )
            .unwrap();

        assert_eq!(cred, Credential::twitter("AAAA"));
    }

    #[test]
    fn test_twitter_base_url_is_picked_up() {
        let provider = EnvCredentialProvider::default();
        let cred = provider
            .credential_from(
                CredentialType::Twitter,
                vars(&[
                    ("TWITTER_BEARER_TOKEN", "AAAA"),
                    ("TWITTER_API_BASE_URL", "http://localhost:8080/1.1"),
                ]),
            )
            .unwrap();

        assert_eq!(cred.api_base_url(), Some("http://localhost:8080/1.1"));
    }

    #[test]
    fn test_mastodon_needs_token_and_instance() {
        let provider = EnvCredentialProvider::default();

        let cred = provider
            .credential_from(
                CredentialType::Mastodon,
                vars(&[
                    ("MASTODON_ACCESS_TOKEN", "tok"),
                    ("MASTODON_API_BASE_URL", "https://example.social"),
                ]),
            )
            .unwrap();
        assert_eq!(cred, Credential::mastodon("https://example.social", "tok"));

        let err = provider
            .credential_from(
                CredentialType::Mastodon,
                vars(&[("MASTODON_ACCESS_TOKEN", "tok")]),
            )
            .unwrap_err();
        assert!(err.to_string().contains("MASTODON_API_BASE_URL"));
    }

    #[tokio::test]
    async fn test_unset_environment_is_credential_error() {
        let provider = EnvCredentialProvider::with_prefix("TBEAT_UNSET_12345_");

        let result = provider.get_credential(CredentialType::Twitter).await;
        assert!(matches!(result, Err(DomainError::Credential { .. })));
    }
}
