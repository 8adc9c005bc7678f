//! Credential provider implementations

mod cached_provider;
mod env_provider;
mod factory;
mod file_provider;

pub use cached_provider::CachedCredentialProvider;
pub use env_provider::{EnvCredentialProvider, TokenVars};
pub use factory::{CredentialProviderFactory, ProviderConfig};
pub use file_provider::{
    FileCredentialProvider, DEFAULT_MASTODON_TOKENS_FILE, DEFAULT_TWITTER_TOKENS_FILE,
};
