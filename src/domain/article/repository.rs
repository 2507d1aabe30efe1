use crate::domain::article::entity::ArticleMetadata;
use crate::domain::article::value_objects::ArticleSlug;
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

/// Relational mirror of article metadata. The core writes it after a
/// successful local publish to keep listings queryable; a failed upsert is
/// logged by the caller, never escalated.
#[async_trait]
pub trait ArticleMetadataRepository: Send + Sync {
    async fn get(&self, slug: &ArticleSlug) -> DomainResult<Option<ArticleMetadata>>;
    async fn upsert(&self, metadata: &ArticleMetadata) -> DomainResult<()>;
}
