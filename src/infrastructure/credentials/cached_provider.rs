use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{Credential, CredentialProvider, CredentialType, DomainError};

/// Memoizes the tokens of another provider so a run reads each token file once
#[derive(Debug)]
pub struct CachedCredentialProvider {
    inner: Arc<dyn CredentialProvider>,
    cache: Cache<CredentialType, Credential>,
}

impl CachedCredentialProvider {
    pub fn new(inner: Arc<dyn CredentialProvider>, ttl: Duration) -> Self {
        // One entry per platform
        let cache = Cache::builder().time_to_live(ttl).max_capacity(2).build();

        Self { inner, cache }
    }
}

#[async_trait]
impl CredentialProvider for CachedCredentialProvider {
    async fn get_credential(
        &self,
        credential_type: CredentialType,
    ) -> Result<Credential, DomainError> {
        if let Some(credential) = self.cache.get(&credential_type).await {
            return Ok(credential);
        }

        tracing::debug!(
            provider = self.inner.provider_name(),
            credential_type = %credential_type,
            "Loading credential"
        );

        let credential = self.inner.get_credential(credential_type).await?;
        self.cache.insert(credential_type, credential.clone()).await;

        Ok(credential)
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}
