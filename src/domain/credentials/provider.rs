use async_trait::async_trait;
use std::fmt::Debug;

use super::{Credential, CredentialType};
use crate::domain::DomainError;

/// Source of the per-platform API tokens
#[async_trait]
pub trait CredentialProvider: Send + Sync + Debug {
    /// Load the token for `credential_type`; a missing one is a
    /// `DomainError::Credential`
    async fn get_credential(
        &self,
        credential_type: CredentialType,
    ) -> Result<Credential, DomainError>;

    /// Name for logs
    fn provider_name(&self) -> &'static str;
}
