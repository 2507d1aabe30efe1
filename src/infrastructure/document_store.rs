// src/infrastructure/document_store.rs
use crate::application::ports::document_store::DocumentStore;
use crate::domain::article::ArticleSlug;
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

fn map_io(err: std::io::Error) -> DomainError {
    DomainError::Persistence(err.to_string())
}

/// One markdown file per article at `<articles_dir>/<slug>.md`. Writes go
/// through a sibling temp file and a rename so a reader never observes a
/// torn document.
pub struct FsDocumentStore {
    articles_dir: PathBuf,
}

impl FsDocumentStore {
    pub fn new(articles_dir: impl Into<PathBuf>) -> Self {
        Self {
            articles_dir: articles_dir.into(),
        }
    }

    pub async fn ensure_dir(&self) -> DomainResult<()> {
        tokio::fs::create_dir_all(&self.articles_dir)
            .await
            .map_err(map_io)
    }

    pub fn articles_dir(&self) -> &Path {
        &self.articles_dir
    }

    fn document_path(&self, slug: &ArticleSlug) -> PathBuf {
        self.articles_dir.join(format!("{slug}.md"))
    }

    fn temp_path(&self, slug: &ArticleSlug) -> PathBuf {
        self.articles_dir.join(format!(".{slug}.md.tmp"))
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn load(&self, slug: &ArticleSlug) -> DomainResult<String> {
        match tokio::fs::read_to_string(self.document_path(slug)).await {
            Ok(contents) => Ok(contents),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(DomainError::NotFound(format!(
                "no document for slug '{slug}'"
            ))),
            Err(err) => Err(map_io(err)),
        }
    }

    async fn store(&self, slug: &ArticleSlug, contents: &str) -> DomainResult<()> {
        let temp = self.temp_path(slug);
        tokio::fs::write(&temp, contents).await.map_err(map_io)?;
        if let Err(err) = tokio::fs::rename(&temp, self.document_path(slug)).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(map_io(err));
        }
        Ok(())
    }
}
