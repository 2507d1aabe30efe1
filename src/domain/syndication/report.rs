// src/domain/syndication/report.rs
use crate::domain::article::{ArticleSlug, PlatformId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Identifier assigned by the remote platform to the published post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlatformPostId(String);

impl PlatformPostId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlatformPostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncFailureKind {
    UnknownPlatform,
    Auth,
    ContentRejected,
    RateLimited,
    Network,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    Published { post_id: PlatformPostId },
    Failed { kind: SyncFailureKind, detail: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    pub platform: PlatformId,
    pub outcome: SyncOutcome,
    /// Adapter invocations made for this platform; 0 when the platform was
    /// rejected before any adapter ran.
    pub attempts: u32,
    pub completed_at: DateTime<Utc>,
}

impl SyncResult {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, SyncOutcome::Published { .. })
    }

    pub fn failure_kind(&self) -> Option<SyncFailureKind> {
        match &self.outcome {
            SyncOutcome::Failed { kind, .. } => Some(*kind),
            SyncOutcome::Published { .. } => None,
        }
    }
}

/// One per publish run, owned by the dispatcher during fan-out and handed
/// to the observability sink afterwards. Entries are keyed by platform so
/// consumers can match results regardless of completion order.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    slug: ArticleSlug,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    results: BTreeMap<PlatformId, SyncResult>,
}

impl SyncReport {
    pub fn new(
        slug: ArticleSlug,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        results: Vec<SyncResult>,
    ) -> Self {
        let results = results
            .into_iter()
            .map(|result| (result.platform.clone(), result))
            .collect();
        Self {
            slug,
            started_at,
            finished_at,
            results,
        }
    }

    pub fn slug(&self) -> &ArticleSlug {
        &self.slug
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    pub fn result(&self, platform: &PlatformId) -> Option<&SyncResult> {
        self.results.get(platform)
    }

    pub fn results(&self) -> impl Iterator<Item = &SyncResult> {
        self.results.values()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.results.values().filter(|r| r.succeeded()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }
}
