// src/infrastructure/observability.rs
use crate::application::ports::report_sink::SyncReportSink;
use crate::domain::syndication::{SyncOutcome, SyncReport};
use async_trait::async_trait;

/// Logs one structured line per platform outcome plus a JSON summary of the
/// whole run. Stands in for whatever collector operations points RUST_LOG at.
pub struct TracingReportSink;

#[async_trait]
impl SyncReportSink for TracingReportSink {
    async fn deliver(&self, report: &SyncReport) {
        for result in report.results() {
            match &result.outcome {
                SyncOutcome::Published { post_id } => tracing::info!(
                    slug = %report.slug(),
                    platform = %result.platform,
                    post_id = %post_id,
                    attempts = result.attempts,
                    "platform publish succeeded"
                ),
                SyncOutcome::Failed { kind, detail } => tracing::warn!(
                    slug = %report.slug(),
                    platform = %result.platform,
                    kind = ?kind,
                    detail = %detail,
                    attempts = result.attempts,
                    "platform publish failed"
                ),
            }
        }

        match serde_json::to_string(report) {
            Ok(json) => tracing::info!(
                slug = %report.slug(),
                succeeded = report.success_count(),
                failed = report.failure_count(),
                report = %json,
                "syndication finished"
            ),
            Err(err) => tracing::error!(error = %err, "failed to serialise sync report"),
        }
    }
}
