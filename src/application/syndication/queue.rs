// src/application/syndication/queue.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::ports::{CredentialSourcePort, SyncReportSinkPort};
use crate::application::syndication::dispatcher::SyndicationDispatcher;
use crate::domain::article::Article;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::{JoinHandle, JoinSet};

#[derive(Debug, Clone)]
pub struct QueueSettings {
    pub capacity: usize,
    pub max_concurrent: usize,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            capacity: 64,
            max_concurrent: 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyndicationJob {
    pub article: Arc<Article>,
}

impl SyndicationJob {
    pub fn new(article: Article) -> Self {
        Self {
            article: Arc::new(article),
        }
    }
}

/// Background home of syndication runs. Publishes hand their fan-out here
/// and return immediately; the runner loads credentials per job, dispatches,
/// and delivers each report to the sink. `shutdown` closes intake and drains
/// in-flight runs, so nothing is silently orphaned at process exit.
pub struct SyndicationQueue {
    tx: Mutex<Option<mpsc::Sender<SyndicationJob>>>,
    runner: Mutex<Option<JoinHandle<()>>>,
}

impl SyndicationQueue {
    pub fn start(
        dispatcher: Arc<SyndicationDispatcher>,
        credentials: Arc<CredentialSourcePort>,
        sink: Arc<SyncReportSinkPort>,
        settings: QueueSettings,
    ) -> Arc<Self> {
        let (tx, rx) = mpsc::channel(settings.capacity.max(1));
        let runner = tokio::spawn(run(
            rx,
            dispatcher,
            credentials,
            sink,
            settings.max_concurrent.max(1),
        ));
        Arc::new(Self {
            tx: Mutex::new(Some(tx)),
            runner: Mutex::new(Some(runner)),
        })
    }

    /// Non-blocking: the publish transition has already committed by the
    /// time this is called, so a full or stopped queue is surfaced to the
    /// caller as a receipt flag, never as a failed publish.
    pub fn submit(&self, job: SyndicationJob) -> ApplicationResult<()> {
        let guard = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(tx) = guard.as_ref() else {
            return Err(ApplicationError::queue_unavailable("queue is shut down"));
        };
        tx.try_send(job).map_err(|err| match err {
            TrySendError::Full(_) => ApplicationError::queue_unavailable("queue is full"),
            TrySendError::Closed(_) => {
                ApplicationError::queue_unavailable("queue runner stopped")
            }
        })
    }

    /// Close intake and wait until every in-flight syndication reaches a
    /// terminal outcome and its report is delivered.
    pub async fn shutdown(&self) {
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(tx);

        let runner = self
            .runner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(runner) = runner {
            if let Err(err) = runner.await {
                tracing::error!(error = %err, "syndication runner panicked");
            }
        }
    }
}

async fn run(
    mut rx: mpsc::Receiver<SyndicationJob>,
    dispatcher: Arc<SyndicationDispatcher>,
    credentials: Arc<CredentialSourcePort>,
    sink: Arc<SyncReportSinkPort>,
    max_concurrent: usize,
) {
    let mut in_flight: JoinSet<()> = JoinSet::new();

    while let Some(job) = rx.recv().await {
        while in_flight.len() >= max_concurrent {
            join_one(&mut in_flight).await;
        }
        let dispatcher = Arc::clone(&dispatcher);
        let credentials = Arc::clone(&credentials);
        let sink = Arc::clone(&sink);
        in_flight.spawn(run_job(job, dispatcher, credentials, sink));
    }

    while !in_flight.is_empty() {
        join_one(&mut in_flight).await;
    }
    tracing::debug!("syndication queue drained");
}

async fn join_one(in_flight: &mut JoinSet<()>) {
    if let Some(Err(err)) = in_flight.join_next().await {
        tracing::error!(error = %err, "syndication job panicked");
    }
}

async fn run_job(
    job: SyndicationJob,
    dispatcher: Arc<SyndicationDispatcher>,
    credentials: Arc<CredentialSourcePort>,
    sink: Arc<SyncReportSinkPort>,
) {
    let article = job.article;
    tracing::info!(
        slug = %article.slug,
        platforms = article.platforms.len(),
        "syndication started"
    );

    let report = match credentials.load().await {
        Ok(set) => {
            dispatcher
                .dispatch(Arc::clone(&article), Arc::new(set))
                .await
        }
        Err(err) => {
            tracing::warn!(slug = %article.slug, error = %err, "credential source unavailable");
            dispatcher.report_credential_failure(&article, &err.to_string())
        }
    };

    sink.deliver(&report).await;
}
