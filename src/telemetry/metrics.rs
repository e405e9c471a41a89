//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};

/// Counter metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMetric {
    /// Prices run through the deviation classifier
    SubmissionsClassified,
    /// Prices classified as suspicious
    SubmissionsFlagged,
    /// Annotation failures that fell back to the computed reason
    AnnotationFallbacks,
    /// Approve/reject decisions recorded
    ModerationDecisions,
    /// Report files written
    ReportsGenerated,
    /// Notifications broadcast
    NotificationsSent,
}

impl CounterMetric {
    pub fn name(self) -> &'static str {
        match self {
            CounterMetric::SubmissionsClassified => "gasprice_submissions_classified_total",
            CounterMetric::SubmissionsFlagged => "gasprice_submissions_flagged_total",
            CounterMetric::AnnotationFallbacks => "gasprice_annotation_fallbacks_total",
            CounterMetric::ModerationDecisions => "gasprice_moderation_decisions_total",
            CounterMetric::ReportsGenerated => "gasprice_reports_generated_total",
            CounterMetric::NotificationsSent => "gasprice_notifications_sent_total",
        }
    }
}

/// Increment a counter by one
///
/// A no-op until a recorder is installed.
pub fn increment_counter(metric: CounterMetric) {
    ::metrics::counter!(metric.name()).increment(1);
}

/// Serve metrics for scraping on the given port
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}
