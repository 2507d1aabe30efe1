// src/application/commands/articles/publish.rs
use super::ArticleCommandService;
use crate::{
    application::{
        dto::PublishReceipt, error::ApplicationResult, syndication::SyndicationJob,
    },
    domain::{
        article::{Article, ArticleMetadata, ArticleSlug},
        document::{Document, FieldValue},
    },
};

pub struct PublishArticleCommand {
    pub slug: String,
}

impl ArticleCommandService {
    /// Drive the draft→published transition for one slug, then hand the
    /// fan-out to the syndication queue and return without waiting for it.
    /// The transition is committed once the local document write succeeds;
    /// syndication outcomes never roll it back. Publishing an already
    /// published article rewrites the same fields and re-triggers fan-out.
    pub async fn publish_article(
        &self,
        command: PublishArticleCommand,
    ) -> ApplicationResult<PublishReceipt> {
        let slug = ArticleSlug::new(command.slug)?;
        let _guard = self.locks.acquire(&slug).await;

        let raw = self.documents.load(&slug).await?;
        let mut document = Document::parse(&raw)?;

        let now = self.clock.now();
        let today = now.date_naive();
        document
            .front_matter_mut()
            .set("draft", FieldValue::scalar("false"));
        document.front_matter_mut().set(
            "lastmod",
            FieldValue::scalar(today.format("%Y-%m-%d").to_string()),
        );

        // Validate the projection before touching the disk so a document
        // without a title fails the publish with local state unchanged.
        let article = Article::from_document(slug.clone(), &document)?;

        self.documents.store(&slug, &document.render()).await?;

        let metadata = ArticleMetadata::from_article(&article, now);
        if let Err(err) = self.metadata.upsert(&metadata).await {
            tracing::warn!(slug = %slug, error = %err, "metadata upsert failed after publish");
        }

        let platforms: Vec<String> = article
            .platforms
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();

        let syndication_queued = if article.platforms.is_empty() {
            tracing::debug!(slug = %slug, "no target platforms, skipping syndication");
            false
        } else {
            match self.queue.submit(SyndicationJob::new(article)) {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(slug = %slug, error = %err, "syndication not queued");
                    false
                }
            }
        };

        Ok(PublishReceipt {
            slug: slug.into(),
            lastmod: today,
            platforms,
            syndication_queued,
        })
    }
}
