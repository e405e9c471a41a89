//! Pricing report export
//!
//! Fetches price reports for a region and date range, flattens them into
//! rows and writes a CSV file.

mod criteria;
mod csv;

pub use criteria::{ExportFormat, ReportCriteria};
pub use csv::{render_csv, HEADERS};

use crate::audit::{AuditAction, AuditEntry, AuditLog};
use crate::backend::AdminStore;
use crate::error::ReportError;
use crate::telemetry::{increment_counter, CounterMetric};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Station fields embedded in a report record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StationRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Profile fields embedded in a report record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileRef {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A price report joined with its station and submitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub stations: Option<StationRef>,
    #[serde(default)]
    pub profiles: Option<ProfileRef>,
}

/// One flattened report line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub submitted_at: String,
    pub station_name: Option<String>,
    pub station_address: Option<String>,
    pub fuel_type: Option<String>,
    pub price: Option<Decimal>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

impl ReportRow {
    /// Cells in [`HEADERS`] order
    pub fn cells(&self) -> [Option<String>; 7] {
        [
            Some(self.submitted_at.clone()),
            self.station_name.clone(),
            self.station_address.clone(),
            self.fuel_type.clone(),
            self.price.map(|p| p.to_string()),
            self.user_name.clone(),
            self.user_email.clone(),
        ]
    }
}

impl From<ReportRecord> for ReportRow {
    fn from(record: ReportRecord) -> Self {
        let station = record.stations.unwrap_or_default();
        let profile = record.profiles.unwrap_or_default();
        Self {
            submitted_at: record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            station_name: station.name,
            station_address: station.address,
            fuel_type: record.fuel_type,
            price: record.price,
            user_name: profile.full_name,
            user_email: profile.email,
        }
    }
}

/// A report written to disk
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub path: PathBuf,
    pub rows: usize,
}

/// Builds and writes reports
pub struct ReportGenerator {
    store: Arc<dyn AdminStore>,
    audit: Arc<dyn AuditLog>,
    actor: String,
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(
        store: Arc<dyn AdminStore>,
        audit: Arc<dyn AuditLog>,
        actor: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            audit,
            actor: actor.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Fetch and flatten the rows for a report
    pub async fn rows(&self, criteria: &ReportCriteria) -> Result<Vec<ReportRow>, ReportError> {
        let records = self.store.report_rows(criteria).await?;
        Ok(records.into_iter().map(ReportRow::from).collect())
    }

    /// Generate the report file and return where it was written
    pub async fn generate(
        &self,
        criteria: &ReportCriteria,
    ) -> Result<GeneratedReport, ReportError> {
        if criteria.format != ExportFormat::Csv {
            return Err(ReportError::UnsupportedFormat(criteria.format.to_string()));
        }

        tracing::info!(
            region = %criteria.region,
            from = %criteria.from,
            to = %criteria.to,
            "Generating report"
        );

        let rows = self.rows(criteria).await?;
        let body = render_csv(&rows)?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(criteria.file_name());
        tokio::fs::write(&path, body).await?;

        increment_counter(CounterMetric::ReportsGenerated);
        self.audit.record(AuditEntry::new(
            &self.actor,
            AuditAction::GenerateReport,
            format!(
                "Generated pricing report for {} ({} to {}), {} rows",
                criteria.region,
                criteria.from,
                criteria.to,
                rows.len()
            ),
        ));
        tracing::info!(path = %path.display(), rows = rows.len(), "Report written");

        Ok(GeneratedReport {
            path,
            rows: rows.len(),
        })
    }
}
