// src/application/dto.rs
use chrono::NaiveDate;
use serde::Serialize;

/// Returned to the publish caller as soon as the local transition commits.
/// Syndication runs detached; its outcome reaches the report sink, not the
/// caller.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReceipt {
    pub slug: String,
    pub lastmod: NaiveDate,
    pub platforms: Vec<String>,
    pub syndication_queued: bool,
}
