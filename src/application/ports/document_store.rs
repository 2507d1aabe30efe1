// src/application/ports/document_store.rs
use crate::domain::article::ArticleSlug;
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

/// Access to the on-disk article document for a slug. The document at this
/// seam is the single source of truth for content and front matter.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// `NotFound` when the slug has no document.
    async fn load(&self, slug: &ArticleSlug) -> DomainResult<String>;

    /// Persist atomically: on failure the previously stored document must
    /// remain readable, never a torn write.
    async fn store(&self, slug: &ArticleSlug, contents: &str) -> DomainResult<()>;
}
