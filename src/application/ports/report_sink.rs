// src/application/ports/report_sink.rs
use crate::domain::syndication::SyncReport;
use async_trait::async_trait;

/// Observability collaborator that receives the report of a finished
/// syndication run. The publish caller has long since been answered, so
/// delivery is fire-and-forget and must not fail the run.
#[async_trait]
pub trait SyncReportSink: Send + Sync {
    async fn deliver(&self, report: &SyncReport);
}
