//! Fuel station records and map data

use crate::audit::{AuditAction, AuditEntry, AuditLog};
use crate::backend::AdminStore;
use crate::error::{AdminError, ValidationError};
use crate::pagination::{Page, PageRequest};
use crate::region::canonical_state;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Geographic centre of Nigeria, the map's default view
pub const NIGERIA_CENTER: Coordinates = Coordinates {
    lat: 9.0820,
    lng: 8.6753,
};

/// Default map zoom level
pub const DEFAULT_ZOOM: u8 = 6;

/// Whether a station is currently listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StationStatus {
    #[default]
    Active,
    Inactive,
}

/// A fuel station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub state: String,
    #[serde(default)]
    pub status: StationStatus,
    /// Number of price submissions received
    #[serde(default)]
    pub submissions: u64,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Free-form notes, e.g. "24/7 service, ATM available"
    #[serde(default)]
    pub metadata: Option<String>,
}

/// Station fields accepted when registering a new station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStation {
    pub name: String,
    pub address: Option<String>,
    pub state: String,
    pub metadata: Option<String>,
}

impl NewStation {
    /// Trim fields, require name and state, and canonicalise the state
    pub fn validate(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::Blank("name"));
        }
        if self.state.trim().is_empty() {
            return Err(ValidationError::Blank("state"));
        }
        let state = canonical_state(&self.state)
            .ok_or_else(|| ValidationError::UnknownState(self.state.clone()))?;

        Ok(Self {
            name,
            address: non_blank(self.address),
            state: state.to_string(),
            metadata: non_blank(self.metadata),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Station row as returned by the coordinates query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationLocation {
    pub id: i64,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A pin on the station map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub id: i64,
    pub title: String,
    pub position: Coordinates,
}

/// Everything a map renderer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

/// Markers for stations with both coordinates; the rest are skipped
pub fn markers_from(locations: &[StationLocation]) -> Vec<MapMarker> {
    locations
        .iter()
        .filter_map(|s| match (s.latitude, s.longitude) {
            (Some(lat), Some(lng)) => Some(MapMarker {
                id: s.id,
                title: s.name.clone(),
                position: Coordinates { lat, lng },
            }),
            _ => None,
        })
        .collect()
}

/// Station management operations
pub struct StationService {
    store: Arc<dyn AdminStore>,
    audit: Arc<dyn AuditLog>,
    actor: String,
    page_size: u32,
}

impl StationService {
    pub fn new(
        store: Arc<dyn AdminStore>,
        audit: Arc<dyn AuditLog>,
        actor: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            store,
            audit,
            actor: actor.into(),
            page_size,
        }
    }

    /// List stations, one page at a time
    pub async fn list(&self, page: u32) -> Result<Page<Station>, AdminError> {
        let request = PageRequest::new(page, self.page_size)?;
        let listing = self
            .store
            .list_stations(request.limit(), request.offset())
            .await?;
        Ok(Page::new(listing.rows, listing.total, request))
    }

    /// Validate and register a new station
    pub async fn add(&self, station: NewStation) -> Result<Station, AdminError> {
        let station = station.validate()?;
        let created = self.store.insert_station(&station).await?;

        tracing::info!(station_id = created.id, name = %created.name, "Station created");
        self.audit.record(AuditEntry::new(
            &self.actor,
            AuditAction::CreateStation,
            format!("Created station #{} ({})", created.id, created.name),
        ));
        Ok(created)
    }

    /// Map data for all stations with known coordinates
    pub async fn map(&self) -> Result<MapView, AdminError> {
        let locations = self.store.station_locations().await?;
        let markers = markers_from(&locations);
        tracing::debug!(
            fetched = locations.len(),
            plotted = markers.len(),
            "Built station map"
        );
        Ok(MapView {
            center: NIGERIA_CENTER,
            zoom: DEFAULT_ZOOM,
            markers,
        })
    }
}
