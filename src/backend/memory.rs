//! In-memory store

use super::{AdminStore, Listing, Submission, SubmissionStatus};
use crate::error::BackendError;
use crate::region::Region;
use crate::report::{ProfileRef, ReportCriteria, ReportRecord, StationRef};
use crate::stations::{NewStation, Station, StationLocation, StationStatus};
use crate::users::{AccountStatus, UserPriceReport, UserProfile, UserRole};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct State {
    submissions: Vec<Submission>,
    stations: Vec<Station>,
    users: Vec<UserProfile>,
    reports: Vec<ReportRecord>,
    user_reports: HashMap<Uuid, Vec<UserPriceReport>>,
    providers: HashMap<Uuid, String>,
}

/// Store holding every table in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

fn page<T: Clone>(rows: &[T], limit: u32, offset: u64) -> Vec<T> {
    rows.iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_submissions(mut self, submissions: Vec<Submission>) -> Self {
        self.state.get_mut().submissions = submissions;
        self
    }

    pub fn with_stations(mut self, stations: Vec<Station>) -> Self {
        self.state.get_mut().stations = stations;
        self
    }

    pub fn with_users(mut self, users: Vec<UserProfile>) -> Self {
        self.state.get_mut().users = users;
        self
    }

    pub fn with_reports(mut self, reports: Vec<ReportRecord>) -> Self {
        self.state.get_mut().reports = reports;
        self
    }

    pub fn with_user_reports(mut self, id: Uuid, reports: Vec<UserPriceReport>) -> Self {
        self.state.get_mut().user_reports.insert(id, reports);
        self
    }

    pub fn with_provider(mut self, id: Uuid, provider: impl Into<String>) -> Self {
        self.state.get_mut().providers.insert(id, provider.into());
        self
    }

    /// Sample dataset for offline use
    pub fn demo() -> Self {
        use AccountStatus::{Active as Enabled, PendingApproval, Suspended};
        use StationStatus::{Active, Inactive};
        use SubmissionStatus::{Approved, Pending};

        let now = Utc::now();
        let stations = vec![
            station(
                1,
                "TotalEnergies, Ikeja",
                "Lagos",
                Active,
                1205,
                Some((6.6018, 3.3515)),
            ),
            station(
                2,
                "Mobil, Victoria Island",
                "Lagos",
                Active,
                980,
                Some((6.4281, 3.4219)),
            ),
            station(
                3,
                "NNPC, Maitama",
                "Abuja",
                Inactive,
                250,
                Some((9.0882, 7.4934)),
            ),
            station(
                4,
                "Oando, Lekki Phase 1",
                "Lagos",
                Active,
                1530,
                Some((6.4478, 3.4723)),
            ),
            station(5, "AP, Bodija", "Oyo", Active, 450, None),
            station(
                6,
                "Conoil, Wuse 2",
                "Abuja",
                Active,
                890,
                Some((9.0765, 7.4786)),
            ),
        ];

        let report = |id, station: &str, user: Option<&str>, price, status, minutes| Submission {
            id,
            station_name: station.to_string(),
            user_name: user.map(str::to_string),
            user_avatar: None,
            fuel_type: "PMS".to_string(),
            submitted_price: price,
            average_price: Some(dec!(720)),
            status,
            created_at: now - Duration::minutes(minutes),
            total_count: 0,
        };
        let submissions = vec![
            report(
                5820,
                "TotalEnergies, Ikeja",
                Some("Fatima Bello"),
                dec!(720.50),
                Approved,
                2,
            ),
            report(
                5821,
                "Mobil, Victoria Island",
                Some("Chidinma Okoro"),
                dec!(715),
                Approved,
                5,
            ),
            report(5822, "NNPC, Maitama", None, dec!(1090), Pending, 10),
            report(
                5823,
                "Oando, Lekki Phase 1",
                Some("John Doe"),
                dec!(725),
                Pending,
                12,
            ),
            report(
                5824,
                "AP, Bodija",
                Some("Segun Arinze"),
                dec!(310),
                Pending,
                15,
            ),
        ];

        let user = |id: u128, name: &str, email: &str, role, status, days: i64| UserProfile {
            id: Uuid::from_u128(id),
            full_name: Some(name.to_string()),
            email: Some(email.to_string()),
            avatar_url: None,
            phone: None,
            role,
            status,
            created_at: now - Duration::days(days),
            last_sign_in_at: None,
        };
        let users = vec![
            user(
                1,
                "Adewale Adeyemi",
                "wale@example.com",
                UserRole::Admin,
                Enabled,
                500,
            ),
            user(
                2,
                "Chidinma Okoro",
                "chidi@example.com",
                UserRole::Moderator,
                Enabled,
                460,
            ),
            user(
                3,
                "Musa Ibrahim",
                "musa@example.com",
                UserRole::DataAnalyst,
                Suspended,
                440,
            ),
            user(
                4,
                "Fatima Bello",
                "fatima@example.com",
                UserRole::Moderator,
                Enabled,
                410,
            ),
            user(
                5,
                "John Doe",
                "john.d@newuser.com",
                UserRole::User,
                PendingApproval,
                20,
            ),
        ];

        let reports = submissions
            .iter()
            .map(|s| {
                let station = stations.iter().find(|st| st.name == s.station_name);
                ReportRecord {
                    created_at: s.created_at,
                    price: Some(s.submitted_price),
                    fuel_type: Some(s.fuel_type.clone()),
                    stations: station.map(|st| StationRef {
                        name: Some(st.name.clone()),
                        address: st.address.clone(),
                        state: Some(st.state.clone()),
                    }),
                    profiles: s.user_name.as_ref().map(|name| ProfileRef {
                        full_name: Some(name.clone()),
                        email: None,
                    }),
                }
            })
            .collect();

        Self::new()
            .with_stations(stations)
            .with_submissions(submissions)
            .with_users(users)
            .with_reports(reports)
            .with_provider(Uuid::from_u128(1), "email")
            .with_provider(Uuid::from_u128(4), "google")
    }

    /// Current status of a submission
    pub async fn submission_status(&self, id: i64) -> Option<SubmissionStatus> {
        let state = self.state.read().await;
        state
            .submissions
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.status)
    }
}

fn station(
    id: i64,
    name: &str,
    state: &str,
    status: StationStatus,
    submissions: u64,
    coords: Option<(f64, f64)>,
) -> Station {
    Station {
        id,
        name: name.to_string(),
        address: None,
        state: state.to_string(),
        status,
        submissions,
        latitude: coords.map(|c| c.0),
        longitude: coords.map(|c| c.1),
        metadata: None,
    }
}

#[async_trait]
impl AdminStore for InMemoryStore {
    async fn moderation_queue(
        &self,
        status: SubmissionStatus,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Submission>, BackendError> {
        let state = self.state.read().await;
        let mut matching: Vec<Submission> = state
            .submissions
            .iter()
            .filter(|s| s.status == status)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let mut rows = page(&matching, limit, offset);
        for row in &mut rows {
            row.total_count = total;
        }
        Ok(rows)
    }

    async fn update_submission_status(
        &self,
        id: i64,
        status: SubmissionStatus,
    ) -> Result<bool, BackendError> {
        let mut state = self.state.write().await;
        let pending = state
            .submissions
            .iter_mut()
            .find(|s| s.id == id && s.status == SubmissionStatus::Pending);
        match pending {
            Some(submission) => {
                submission.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn report_rows(
        &self,
        criteria: &ReportCriteria,
    ) -> Result<Vec<ReportRecord>, BackendError> {
        let state = self.state.read().await;
        let mut rows: Vec<ReportRecord> = state
            .reports
            .iter()
            .filter(|r| criteria.contains(r.created_at))
            .filter(|r| match criteria.region {
                Region::All => true,
                Region::State(name) => r
                    .stations
                    .as_ref()
                    .and_then(|s| s.state.as_deref())
                    .is_some_and(|s| s == name),
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn station_locations(&self) -> Result<Vec<StationLocation>, BackendError> {
        let state = self.state.read().await;
        Ok(state
            .stations
            .iter()
            .filter(|s| s.latitude.is_some() && s.longitude.is_some())
            .map(|s| StationLocation {
                id: s.id,
                name: s.name.clone(),
                latitude: s.latitude,
                longitude: s.longitude,
            })
            .collect())
    }

    async fn list_stations(
        &self,
        limit: u32,
        offset: u64,
    ) -> Result<Listing<Station>, BackendError> {
        let state = self.state.read().await;
        let mut stations = state.stations.clone();
        stations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Listing {
            rows: page(&stations, limit, offset),
            total: stations.len() as u64,
        })
    }

    async fn insert_station(&self, station: &NewStation) -> Result<Station, BackendError> {
        let mut state = self.state.write().await;
        let id = state.stations.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let created = Station {
            id,
            name: station.name.clone(),
            address: station.address.clone(),
            state: station.state.clone(),
            status: StationStatus::Active,
            submissions: 0,
            latitude: None,
            longitude: None,
            metadata: station.metadata.clone(),
        };
        state.stations.push(created.clone());
        Ok(created)
    }

    async fn list_users(
        &self,
        limit: u32,
        offset: u64,
    ) -> Result<Listing<UserProfile>, BackendError> {
        let state = self.state.read().await;
        let mut users = state.users.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Listing {
            rows: page(&users, limit, offset),
            total: users.len() as u64,
        })
    }

    async fn user_profile(&self, id: Uuid) -> Result<Option<UserProfile>, BackendError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_reports(
        &self,
        id: Uuid,
        limit: u32,
    ) -> Result<Vec<UserPriceReport>, BackendError> {
        let state = self.state.read().await;
        let mut reports = state.user_reports.get(&id).cloned().unwrap_or_default();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reports.truncate(limit as usize);
        Ok(reports)
    }

    async fn auth_provider(&self, id: Uuid) -> Result<Option<String>, BackendError> {
        let state = self.state.read().await;
        Ok(state.providers.get(&id).cloned())
    }

    async fn set_account_status(
        &self,
        id: Uuid,
        status: AccountStatus,
    ) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        if let Some(user) = state.users.iter_mut().find(|u| u.id == id) {
            user.status = status;
        }
        Ok(())
    }
}
