//! Travel logs and the destinations pinned on them.

pub mod store;

use crate::error::{Result, WanderbotError};
use crate::store::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use store::TravelStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TravelLogId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DestinationId(pub Uuid);

/// A trip. At most one log per owner is active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelLog {
    pub id: TravelLogId,
    pub owner: UserId,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A geocoded place pinned on a travel log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: DestinationId,
    pub travel_log_id: TravelLogId,
    pub owner: UserId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub notes: Option<String>,
    pub visited_date: Option<DateTime<Utc>>,
    pub photos: Vec<String>,
    pub category: Option<String>,
}

/// A travel log together with its destinations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelLogDetails {
    #[serde(flatten)]
    pub log: TravelLog,
    pub destinations: Vec<Destination>,
}

#[derive(Debug, Clone, Default)]
pub struct NewTravelLog {
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TravelLogPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct NewDestination {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub notes: Option<String>,
    pub visited_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

/// Partial update; coordinates are fixed once a place is pinned.
#[derive(Debug, Clone, Default)]
pub struct DestinationPatch {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub visited_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WanderbotError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(WanderbotError::InvalidInput(format!(
            "latitude {} is outside [-90, 90]",
            latitude
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(WanderbotError::InvalidInput(format!(
            "longitude {} is outside [-180, 180]",
            longitude
        )));
    }
    Ok(())
}

pub(crate) fn validate_date_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<()> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(WanderbotError::InvalidInput(
            "end date is before start date".to_string(),
        )),
        _ => Ok(()),
    }
}
