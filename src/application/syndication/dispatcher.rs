// src/application/syndication/dispatcher.rs
use crate::application::ports::platform::PlatformError;
use crate::application::ports::{ClockPort, PlatformPublisherPort};
use crate::application::syndication::registry::PlatformRegistry;
use crate::domain::article::{Article, PlatformId};
use crate::domain::syndication::report::{SyncFailureKind, SyncOutcome, SyncReport, SyncResult};
use crate::domain::syndication::{CredentialBundle, PlatformCredentialSet};
use backon::{ExponentialBuilder, Retryable};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

#[derive(Debug, Clone)]
pub struct SyndicationSettings {
    /// Bound on one platform's whole attempt chain, retries included.
    pub per_platform_timeout: Duration,
    /// Total attempts per platform for retryable errors.
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub backoff_cap: Duration,
}

impl Default for SyndicationSettings {
    fn default() -> Self {
        Self {
            per_platform_timeout: Duration::from_secs(30),
            max_attempts: 3,
            backoff_base: Duration::from_millis(500),
            backoff_cap: Duration::from_secs(10),
        }
    }
}

/// Fans a published article out to every platform it names, concurrently,
/// and assembles the per-platform outcomes into one [`SyncReport`]. Partial
/// failure is the normal case: dispatch itself never errors.
pub struct SyndicationDispatcher {
    registry: Arc<PlatformRegistry>,
    settings: SyndicationSettings,
    clock: Arc<ClockPort>,
}

impl SyndicationDispatcher {
    pub fn new(
        registry: Arc<PlatformRegistry>,
        settings: SyndicationSettings,
        clock: Arc<ClockPort>,
    ) -> Self {
        Self {
            registry,
            settings,
            clock,
        }
    }

    pub async fn dispatch(
        &self,
        article: Arc<Article>,
        credentials: Arc<PlatformCredentialSet>,
    ) -> SyncReport {
        let started_at = self.clock.now();
        let mut results = Vec::with_capacity(article.platforms.len());
        let mut tasks = JoinSet::new();

        for platform in &article.platforms {
            let Some(adapter) = self.registry.resolve(platform) else {
                results.push(self.rejected(
                    platform.clone(),
                    SyncFailureKind::UnknownPlatform,
                    "no adapter registered for this platform",
                ));
                continue;
            };
            let Some(bundle) = credentials.get(platform).cloned() else {
                results.push(self.rejected(
                    platform.clone(),
                    SyncFailureKind::Auth,
                    "no credentials configured for this platform",
                ));
                continue;
            };

            let platform = platform.clone();
            let article = Arc::clone(&article);
            let clock = Arc::clone(&self.clock);
            let settings = self.settings.clone();
            tasks.spawn(async move {
                publish_one(adapter, article, bundle, platform, settings, clock).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(err) => tracing::error!(error = %err, "syndication task aborted"),
            }
        }

        SyncReport::new(
            article.slug.clone(),
            started_at,
            self.clock.now(),
            results,
        )
    }

    /// Report for a run whose credential source could not be loaded at all:
    /// every requested platform fails as an auth problem, adapters uninvoked.
    pub fn report_credential_failure(&self, article: &Article, detail: &str) -> SyncReport {
        let started_at = self.clock.now();
        let results = article
            .platforms
            .iter()
            .map(|platform| self.rejected(platform.clone(), SyncFailureKind::Auth, detail))
            .collect();
        SyncReport::new(article.slug.clone(), started_at, self.clock.now(), results)
    }

    fn rejected(
        &self,
        platform: PlatformId,
        kind: SyncFailureKind,
        detail: &str,
    ) -> SyncResult {
        SyncResult {
            platform,
            outcome: SyncOutcome::Failed {
                kind,
                detail: detail.to_string(),
            },
            attempts: 0,
            completed_at: self.clock.now(),
        }
    }
}

async fn publish_one(
    adapter: Arc<PlatformPublisherPort>,
    article: Arc<Article>,
    bundle: CredentialBundle,
    platform: PlatformId,
    settings: SyndicationSettings,
    clock: Arc<ClockPort>,
) -> SyncResult {
    let attempts = Arc::new(AtomicU32::new(0));

    let call = {
        let adapter = Arc::clone(&adapter);
        let article = Arc::clone(&article);
        let attempts = Arc::clone(&attempts);
        move || {
            let adapter = Arc::clone(&adapter);
            let article = Arc::clone(&article);
            let bundle = bundle.clone();
            let attempts = Arc::clone(&attempts);
            async move {
                attempts.fetch_add(1, Ordering::Relaxed);
                adapter.publish(&article, &bundle).await
            }
        }
    };

    let backoff = ExponentialBuilder::default()
        .with_min_delay(settings.backoff_base)
        .with_max_delay(settings.backoff_cap)
        .with_max_times(settings.max_attempts.saturating_sub(1) as usize);

    let outcome = tokio::time::timeout(
        settings.per_platform_timeout,
        call.retry(backoff).when(PlatformError::is_retryable),
    )
    .await;

    let outcome = match outcome {
        Ok(Ok(post_id)) => {
            tracing::debug!(platform = %platform, post_id = %post_id, "platform publish ok");
            SyncOutcome::Published { post_id }
        }
        Ok(Err(error)) => SyncOutcome::Failed {
            kind: (&error).into(),
            detail: error.to_string(),
        },
        Err(_) => SyncOutcome::Failed {
            kind: SyncFailureKind::Timeout,
            detail: format!(
                "no terminal outcome within {:?}",
                settings.per_platform_timeout
            ),
        },
    };

    SyncResult {
        platform,
        outcome,
        attempts: attempts.load(Ordering::Relaxed),
        completed_at: clock.now(),
    }
}
