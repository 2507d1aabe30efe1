// src/application/ports/credentials.rs
use crate::domain::syndication::PlatformCredentialSet;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential source unreadable: {0}")]
    Unreadable(String),
    #[error("credential source malformed: {0}")]
    Malformed(String),
}

/// Source of platform credentials. Loaded once per syndication run so
/// operators can rotate credentials without restarting the service; the
/// returned set is shared read-only with the fan-out tasks.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn load(&self) -> Result<PlatformCredentialSet, CredentialError>;
}
