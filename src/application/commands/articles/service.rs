// src/application/commands/articles/service.rs
use std::sync::Arc;

use crate::application::commands::articles::locks::SlugLocks;
use crate::application::ports::{ClockPort, DocumentStorePort};
use crate::application::syndication::SyndicationQueue;
use crate::domain::article::ArticleMetadataRepository;

pub struct ArticleCommandService {
    pub(super) documents: Arc<DocumentStorePort>,
    pub(super) metadata: Arc<dyn ArticleMetadataRepository>,
    pub(super) queue: Arc<SyndicationQueue>,
    pub(super) clock: Arc<ClockPort>,
    pub(super) locks: SlugLocks,
}

impl ArticleCommandService {
    pub fn new(
        documents: Arc<DocumentStorePort>,
        metadata: Arc<dyn ArticleMetadataRepository>,
        queue: Arc<SyndicationQueue>,
        clock: Arc<ClockPort>,
    ) -> Self {
        Self {
            documents,
            metadata,
            queue,
            clock,
            locks: SlugLocks::new(),
        }
    }
}
