//! PostgREST client for the hosted database
//!
//! Table reads and writes go through `/rest/v1`, the moderation queue through
//! an RPC, and sign-in providers through the auth admin API.

use super::{AdminStore, Listing, Submission, SubmissionStatus};
use crate::error::BackendError;
use crate::region::Region;
use crate::report::{ReportCriteria, ReportRecord};
use crate::stations::{NewStation, Station, StationLocation};
use crate::users::{AccountStatus, UserPriceReport, UserProfile};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::CONTENT_RANGE;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

/// RPC returning a page of submissions for one status
pub const MODERATION_RPC: &str = "get_price_submissions_for_moderation";

const REPORT_SELECT: &str =
    "created_at,price,fuel_type,stations(name,address,state),profiles(full_name,email)";
const REPORT_SELECT_BY_STATE: &str =
    "created_at,price,fuel_type,stations!inner(name,address,state),profiles(full_name,email)";

/// Connection settings
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// Service key sent as `apikey` and bearer token
    pub api_key: String,
    pub timeout: Duration,
}

/// Backend store over HTTP
pub struct PostgrestClient {
    config: PostgrestConfig,
    client: Client,
}

impl PostgrestClient {
    pub fn new(config: PostgrestConfig) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base(), path)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base(), path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn check(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, BackendError> {
        let response = Self::check(self.authed(builder).send().await?).await?;
        decode(&response.bytes().await?)
    }

    /// Fetch a page and read the total from `Content-Range`
    async fn fetch_listing<T: DeserializeOwned>(
        &self,
        table: &str,
        order: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Listing<T>, BackendError> {
        let builder = self
            .client
            .get(self.rest_url(table))
            .query(&[("select", "*"), ("order", order)])
            .query(&[
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ])
            .header("Prefer", "count=exact");

        let response = Self::check(self.authed(builder).send().await?).await?;
        let total = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total);
        let rows: Vec<T> = decode(&response.bytes().await?)?;

        let total = total.unwrap_or(offset + rows.len() as u64);
        Ok(Listing { rows, total })
    }

    async fn patch(
        &self,
        table: &str,
        id_filter: String,
        body: serde_json::Value,
    ) -> Result<(), BackendError> {
        let builder = self
            .client
            .patch(self.rest_url(table))
            .query(&[("id", id_filter)])
            .json(&body);
        Self::check(self.authed(builder).send().await?).await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, BackendError> {
    serde_json::from_slice(bytes).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Total from a header such as `0-9/45` or `*/0`
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Deserialize)]
struct StationName {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserReportRow {
    id: i64,
    created_at: DateTime<Utc>,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    stations: Option<StationName>,
}

impl From<UserReportRow> for UserPriceReport {
    fn from(row: UserReportRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            price: row.price,
            station_name: row
                .stations
                .and_then(|s| s.name)
                .unwrap_or_else(|| "Unknown Station".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    #[serde(default)]
    app_metadata: AppMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct AppMetadata {
    #[serde(default)]
    provider: Option<String>,
}

#[async_trait]
impl AdminStore for PostgrestClient {
    async fn moderation_queue(
        &self,
        status: SubmissionStatus,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Submission>, BackendError> {
        let url = self.rest_url(&format!("rpc/{}", MODERATION_RPC));
        tracing::debug!(%status, limit, offset, "Fetching moderation queue");

        let body = json!({
            "_status_filter": status.as_str(),
            "_limit": limit,
            "_offset": offset,
        });
        self.fetch(self.client.post(url).json(&body)).await
    }

    async fn update_submission_status(
        &self,
        id: i64,
        status: SubmissionStatus,
    ) -> Result<bool, BackendError> {
        let builder = self
            .client
            .patch(self.rest_url("price_reports"))
            .query(&[
                ("id", format!("eq.{}", id)),
                ("status", format!("eq.{}", SubmissionStatus::Pending.as_str())),
            ])
            .header("Prefer", "return=representation")
            .json(&json!({ "status": status.as_str() }));
        let updated: Vec<serde_json::Value> = self.fetch(builder).await?;
        Ok(!updated.is_empty())
    }

    async fn report_rows(
        &self,
        criteria: &ReportCriteria,
    ) -> Result<Vec<ReportRecord>, BackendError> {
        let mut query = vec![
            (
                "select",
                match criteria.region {
                    Region::All => REPORT_SELECT.to_string(),
                    Region::State(_) => REPORT_SELECT_BY_STATE.to_string(),
                },
            ),
            ("created_at", format!("gte.{}", timestamp(criteria.starts_at()))),
            ("created_at", format!("lt.{}", timestamp(criteria.ends_before()))),
            ("order", "created_at.desc".to_string()),
        ];
        if let Region::State(state) = criteria.region {
            query.push(("stations.state", format!("eq.{}", state)));
        }

        self.fetch(self.client.get(self.rest_url("price_reports")).query(&query))
            .await
    }

    async fn station_locations(&self) -> Result<Vec<StationLocation>, BackendError> {
        let builder = self.client.get(self.rest_url("stations")).query(&[
            ("select", "id,name,latitude,longitude"),
            ("latitude", "not.is.null"),
            ("longitude", "not.is.null"),
        ]);
        self.fetch(builder).await
    }

    async fn list_stations(
        &self,
        limit: u32,
        offset: u64,
    ) -> Result<Listing<Station>, BackendError> {
        self.fetch_listing("stations", "name.asc", limit, offset)
            .await
    }

    async fn insert_station(&self, station: &NewStation) -> Result<Station, BackendError> {
        let builder = self
            .client
            .post(self.rest_url("stations"))
            .header("Prefer", "return=representation")
            .json(station);
        let created: Vec<Station> = self.fetch(builder).await?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("insert returned no rows".to_string()))
    }

    async fn list_users(
        &self,
        limit: u32,
        offset: u64,
    ) -> Result<Listing<UserProfile>, BackendError> {
        self.fetch_listing("profiles", "created_at.desc", limit, offset)
            .await
    }

    async fn user_profile(&self, id: Uuid) -> Result<Option<UserProfile>, BackendError> {
        let builder = self
            .client
            .get(self.rest_url("profiles"))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))]);
        let rows: Vec<UserProfile> = self.fetch(builder).await?;
        Ok(rows.into_iter().next())
    }

    async fn user_reports(
        &self,
        id: Uuid,
        limit: u32,
    ) -> Result<Vec<UserPriceReport>, BackendError> {
        let builder = self.client.get(self.rest_url("price_reports")).query(&[
            ("select", "id,created_at,price,stations(name)".to_string()),
            ("user_id", format!("eq.{}", id)),
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ]);
        let rows: Vec<UserReportRow> = self.fetch(builder).await?;
        Ok(rows.into_iter().map(UserPriceReport::from).collect())
    }

    async fn auth_provider(&self, id: Uuid) -> Result<Option<String>, BackendError> {
        let builder = self.client.get(self.auth_url(&format!("admin/users/{}", id)));
        let response = self.authed(builder).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response).await?;
        let user: AuthUser = decode(&response.bytes().await?)?;
        Ok(user.app_metadata.provider)
    }

    async fn set_account_status(
        &self,
        id: Uuid,
        status: AccountStatus,
    ) -> Result<(), BackendError> {
        self.patch(
            "profiles",
            format!("eq.{}", id),
            json!({ "status": status }),
        )
        .await
    }
}
