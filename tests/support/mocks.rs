// tests/support/mocks.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use pressrelay::application::ports::credentials::{CredentialError, CredentialSource};
use pressrelay::application::ports::platform::{PlatformError, PlatformPublisher};
use pressrelay::application::ports::report_sink::SyncReportSink;
use pressrelay::application::ports::time::Clock;
use pressrelay::domain::article::{Article, ArticleMetadata, ArticleMetadataRepository, ArticleSlug};
use pressrelay::domain::errors::{DomainError, DomainResult};
use pressrelay::domain::syndication::{
    CredentialBundle, PlatformCredentialSet, PlatformPostId, SyncReport,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/* -------------------------------- Clock -------------------------------- */

static FIXED_NOW: Lazy<DateTime<Utc>> = Lazy::new(|| {
    DateTime::parse_from_rfc3339("2024-06-15T10:00:00Z")
        .expect("invalid RFC3339 in tests/support/mocks.rs")
        .with_timezone(&Utc)
});

pub fn fixed_now() -> DateTime<Utc> {
    *FIXED_NOW
}

pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        fixed_now()
    }
}

/* ---------------------------- Platform mocks ---------------------------- */

pub enum MockBehavior {
    Succeed,
    AuthFail,
    /// Transient failures until the given attempt number succeeds.
    SucceedOnAttempt(u32),
}

pub struct MockPublisher {
    id: &'static str,
    behavior: MockBehavior,
    calls: AtomicU32,
}

impl MockPublisher {
    pub fn new(id: &'static str, behavior: MockBehavior) -> Arc<Self> {
        Arc::new(Self {
            id,
            behavior,
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PlatformPublisher for MockPublisher {
    fn id(&self) -> &str {
        self.id
    }

    async fn publish(
        &self,
        _article: &Article,
        _credentials: &CredentialBundle,
    ) -> Result<PlatformPostId, PlatformError> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        match self.behavior {
            MockBehavior::Succeed => Ok(PlatformPostId::new(format!("{}-{call}", self.id))),
            MockBehavior::AuthFail => Err(PlatformError::AuthFailure("bad credentials".into())),
            MockBehavior::SucceedOnAttempt(n) if call >= n => {
                Ok(PlatformPostId::new(format!("{}-{call}", self.id)))
            }
            MockBehavior::SucceedOnAttempt(_) => {
                Err(PlatformError::TransientNetwork("connection reset".into()))
            }
        }
    }
}

/* --------------------------- Credential mocks --------------------------- */

pub struct StaticCredentialSource {
    set: PlatformCredentialSet,
}

impl StaticCredentialSource {
    /// Bundles with a single dummy `token` field for each listed platform.
    pub fn for_platforms(platforms: &[&str]) -> Arc<Self> {
        let mut set = PlatformCredentialSet::new();
        for platform in platforms {
            let mut bundle = CredentialBundle::new();
            bundle.insert("token", "secret");
            set.insert(
                pressrelay::domain::article::PlatformId::new(*platform).unwrap(),
                bundle,
            );
        }
        Arc::new(Self { set })
    }
}

#[async_trait]
impl CredentialSource for StaticCredentialSource {
    async fn load(&self) -> Result<PlatformCredentialSet, CredentialError> {
        Ok(self.set.clone())
    }
}

pub struct FailingCredentialSource;

#[async_trait]
impl CredentialSource for FailingCredentialSource {
    async fn load(&self) -> Result<PlatformCredentialSet, CredentialError> {
        Err(CredentialError::Unreadable("config.json gone".into()))
    }
}

/* ----------------------------- Report sink ------------------------------ */

#[derive(Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<SyncReport>>,
    notify: Notify,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reports(&self) -> Vec<SyncReport> {
        self.reports.lock().unwrap().clone()
    }

    /// Wait until at least `count` reports have been delivered.
    pub async fn wait_for(&self, count: usize) -> Vec<SyncReport> {
        tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                {
                    let reports = self.reports.lock().unwrap();
                    if reports.len() >= count {
                        return reports.clone();
                    }
                }
                self.notify.notified().await;
            }
        })
        .await
        .expect("timed out waiting for sync reports")
    }
}

#[async_trait]
impl SyncReportSink for RecordingSink {
    async fn deliver(&self, report: &SyncReport) {
        self.reports.lock().unwrap().push(report.clone());
        self.notify.notify_waiters();
    }
}

/* --------------------------- Metadata mocks ----------------------------- */

#[derive(Default)]
pub struct InMemoryMetadataRepository {
    rows: Mutex<HashMap<String, ArticleMetadata>>,
    fail: AtomicBool,
}

impl InMemoryMetadataRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let repo = Self::default();
        repo.fail.store(true, Ordering::Relaxed);
        Arc::new(repo)
    }

    pub fn row(&self, slug: &str) -> Option<ArticleMetadata> {
        self.rows.lock().unwrap().get(slug).cloned()
    }
}

#[async_trait]
impl ArticleMetadataRepository for InMemoryMetadataRepository {
    async fn get(&self, slug: &ArticleSlug) -> DomainResult<Option<ArticleMetadata>> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(DomainError::Persistence("metadata store down".into()));
        }
        Ok(self.rows.lock().unwrap().get(slug.as_str()).cloned())
    }

    async fn upsert(&self, metadata: &ArticleMetadata) -> DomainResult<()> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(DomainError::Persistence("metadata store down".into()));
        }
        self.rows
            .lock()
            .unwrap()
            .insert(metadata.slug.as_str().to_string(), metadata.clone());
        Ok(())
    }
}
