//! Managed backend access
//!
//! All persistence goes through [`AdminStore`]. The PostgREST client talks to
//! the hosted database; the in-memory store backs tests and offline mode.

mod memory;
mod postgrest;

pub use memory::InMemoryStore;
pub use postgrest::{PostgrestClient, PostgrestConfig};

use crate::error::{BackendError, ValidationError};
use crate::report::{ReportCriteria, ReportRecord};
use crate::stations::{NewStation, Station, StationLocation};
use crate::users::{AccountStatus, UserPriceReport, UserProfile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Review state of a price submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
    Flagged,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::Approved => "Approved",
            SubmissionStatus::Rejected => "Rejected",
            SubmissionStatus::Flagged => "Flagged",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(SubmissionStatus::Pending),
            "approved" => Ok(SubmissionStatus::Approved),
            "rejected" => Ok(SubmissionStatus::Rejected),
            "flagged" => Ok(SubmissionStatus::Flagged),
            _ => Err(ValidationError::Unrecognized {
                field: "status",
                value: s.to_string(),
            }),
        }
    }
}

/// A price submission as returned by the moderation RPC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub station_name: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_avatar: Option<String>,
    pub fuel_type: String,
    pub submitted_price: Decimal,
    /// Average of approved prices for the same product, if any exist
    #[serde(default)]
    pub average_price: Option<Decimal>,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
    /// Total rows matching the status filter, repeated on every row
    #[serde(default)]
    pub total_count: u64,
}

/// Rows of one page plus the total available
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub rows: Vec<T>,
    pub total: u64,
}

/// Data access used by the admin services
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Submissions with the given status, newest first
    async fn moderation_queue(
        &self,
        status: SubmissionStatus,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Submission>, BackendError>;

    /// Move a pending submission to `status`
    ///
    /// Returns `false` when no pending submission has that id.
    async fn update_submission_status(
        &self,
        id: i64,
        status: SubmissionStatus,
    ) -> Result<bool, BackendError>;

    /// Report records in the criteria's range and region, newest first
    async fn report_rows(
        &self,
        criteria: &ReportCriteria,
    ) -> Result<Vec<ReportRecord>, BackendError>;

    /// Stations that have both coordinates
    async fn station_locations(&self) -> Result<Vec<StationLocation>, BackendError>;

    async fn list_stations(
        &self,
        limit: u32,
        offset: u64,
    ) -> Result<Listing<Station>, BackendError>;

    async fn insert_station(&self, station: &NewStation) -> Result<Station, BackendError>;

    async fn list_users(
        &self,
        limit: u32,
        offset: u64,
    ) -> Result<Listing<UserProfile>, BackendError>;

    async fn user_profile(&self, id: Uuid) -> Result<Option<UserProfile>, BackendError>;

    /// A user's most recent price reports
    async fn user_reports(
        &self,
        id: Uuid,
        limit: u32,
    ) -> Result<Vec<UserPriceReport>, BackendError>;

    /// Sign-in provider recorded by the auth service
    async fn auth_provider(&self, id: Uuid) -> Result<Option<String>, BackendError>;

    async fn set_account_status(&self, id: Uuid, status: AccountStatus) -> Result<(), BackendError>;
}
