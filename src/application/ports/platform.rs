// src/application/ports/platform.rs
use crate::domain::article::Article;
use crate::domain::syndication::report::{PlatformPostId, SyncFailureKind};
use crate::domain::syndication::CredentialBundle;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// Credentials rejected or missing; retrying with the same bundle is
    /// pointless.
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// Platform-side validation rejected the payload.
    #[error("content rejected: {0}")]
    ContentRejected(String),

    /// Retryable after backoff.
    #[error("rate limited")]
    RateLimited,

    /// Transport-level failure, retryable.
    #[error("network error: {0}")]
    TransientNetwork(String),
}

impl PlatformError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::TransientNetwork(_))
    }
}

impl From<&PlatformError> for SyncFailureKind {
    fn from(error: &PlatformError) -> Self {
        match error {
            PlatformError::AuthFailure(_) => Self::Auth,
            PlatformError::ContentRejected(_) => Self::ContentRejected,
            PlatformError::RateLimited => Self::RateLimited,
            PlatformError::TransientNetwork(_) => Self::Network,
        }
    }
}

/// One implementation per external platform. Each adapter owns the
/// translation from the generic [`Article`] shape to its platform's payload;
/// nothing platform-specific leaks into the dispatcher. Adapters hold no
/// shared mutable state and are safe to invoke concurrently.
#[async_trait]
pub trait PlatformPublisher: Send + Sync {
    /// Identifier the adapter registers under, e.g. `"wechat"`.
    fn id(&self) -> &str;

    async fn publish(
        &self,
        article: &Article,
        credentials: &CredentialBundle,
    ) -> Result<PlatformPostId, PlatformError>;
}
