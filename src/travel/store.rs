use super::{
    require_text, validate_coordinates, validate_date_range, Destination, DestinationId,
    DestinationPatch, NewDestination, NewTravelLog, TravelLog, TravelLogDetails, TravelLogId,
    TravelLogPatch,
};
use crate::error::{Result, WanderbotError};
use crate::store::{Identity, UserId};
use chrono::{Duration, Utc};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Default)]
struct TravelState {
    logs: Vec<TravelLog>,
    destinations: Vec<Destination>,
}

impl TravelState {
    fn owned_log(&self, owner: UserId, id: TravelLogId) -> Result<&TravelLog> {
        self.logs
            .iter()
            .find(|log| log.id == id && log.owner == owner)
            .ok_or_else(|| WanderbotError::NotFound("Travel log".to_string()))
    }

    fn owned_log_mut(&mut self, owner: UserId, id: TravelLogId) -> Result<&mut TravelLog> {
        self.logs
            .iter_mut()
            .find(|log| log.id == id && log.owner == owner)
            .ok_or_else(|| WanderbotError::NotFound("Travel log".to_string()))
    }

    fn owned_destination_mut(
        &mut self,
        owner: UserId,
        id: DestinationId,
    ) -> Result<&mut Destination> {
        self.destinations
            .iter_mut()
            .find(|d| d.id == id && d.owner == owner)
            .ok_or_else(|| WanderbotError::NotFound("Destination".to_string()))
    }

    fn destinations_of(&self, id: TravelLogId) -> Vec<Destination> {
        self.destinations.iter().filter(|d| d.travel_log_id == id).cloned().collect()
    }

    fn insert_log(&mut self, owner: UserId, new_log: NewTravelLog) -> Result<TravelLog> {
        let title = require_text("title", &new_log.title)?;
        validate_date_range(new_log.start_date, new_log.end_date)?;

        for log in self.logs.iter_mut().filter(|l| l.owner == owner && l.is_active) {
            log.is_active = false;
        }

        let log = TravelLog {
            id: TravelLogId(Uuid::new_v4()),
            owner,
            title,
            description: new_log.description,
            start_date: new_log.start_date,
            end_date: new_log.end_date,
            is_active: true,
            created_at: Utc::now(),
        };
        self.logs.push(log.clone());
        Ok(log)
    }

    fn insert_destination(
        &mut self,
        owner: UserId,
        travel_log_id: TravelLogId,
        new_destination: NewDestination,
    ) -> Result<Destination> {
        self.owned_log(owner, travel_log_id)?;
        let name = require_text("name", &new_destination.name)?;
        validate_coordinates(new_destination.latitude, new_destination.longitude)?;

        let destination = Destination {
            id: DestinationId(Uuid::new_v4()),
            travel_log_id,
            owner,
            name,
            latitude: new_destination.latitude,
            longitude: new_destination.longitude,
            notes: new_destination.notes,
            visited_date: new_destination.visited_date,
            photos: Vec::new(),
            category: new_destination.category,
        };
        self.destinations.push(destination.clone());
        Ok(destination)
    }
}

/// Thread-safe in-process store of travel logs and destinations.
///
/// Records belonging to someone else are reported exactly like missing ones.
#[derive(Default)]
pub struct TravelStore {
    state: Mutex<TravelState>,
}

impl TravelStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, TravelState>> {
        self.state
            .lock()
            .map_err(|_| WanderbotError::StoreUnavailable("travel store lock poisoned".to_string()))
    }

    /// The caller's logs, newest first.
    pub fn list_travel_logs(&self, identity: &Identity) -> Result<Vec<TravelLog>> {
        let owner = identity.owner()?;
        let state = self.lock()?;
        Ok(state.logs.iter().rev().filter(|log| log.owner == owner).cloned().collect())
    }

    pub fn get_travel_log(&self, identity: &Identity, id: TravelLogId) -> Result<TravelLogDetails> {
        let owner = identity.owner()?;
        let state = self.lock()?;
        let log = state.owned_log(owner, id)?.clone();
        let destinations = state.destinations_of(id);
        Ok(TravelLogDetails { log, destinations })
    }

    /// Create a log; it becomes the caller's only active log.
    pub fn create_travel_log(&self, identity: &Identity, new_log: NewTravelLog) -> Result<TravelLog> {
        let owner = identity.owner()?;
        let mut state = self.lock()?;
        let log = state.insert_log(owner, new_log)?;
        info!(owner = %owner, log_id = %log.id.0, "Created travel log");
        Ok(log)
    }

    pub fn update_travel_log(
        &self,
        identity: &Identity,
        id: TravelLogId,
        patch: TravelLogPatch,
    ) -> Result<TravelLog> {
        let owner = identity.owner()?;
        let mut state = self.lock()?;

        let title = patch.title.as_deref().map(|t| require_text("title", t)).transpose()?;
        let current = state.owned_log(owner, id)?;
        validate_date_range(
            patch.start_date.or(current.start_date),
            patch.end_date.or(current.end_date),
        )?;

        let log = state.owned_log_mut(owner, id)?;
        if let Some(title) = title {
            log.title = title;
        }
        if let Some(description) = patch.description {
            log.description = Some(description);
        }
        if let Some(start_date) = patch.start_date {
            log.start_date = Some(start_date);
        }
        if let Some(end_date) = patch.end_date {
            log.end_date = Some(end_date);
        }
        if let Some(is_active) = patch.is_active {
            log.is_active = is_active;
        }
        let updated = log.clone();

        debug!(log_id = %id.0, "Updated travel log");
        Ok(updated)
    }

    /// Delete a log and every destination pinned on it.
    pub fn delete_travel_log(&self, identity: &Identity, id: TravelLogId) -> Result<()> {
        let owner = identity.owner()?;
        let mut state = self.lock()?;
        state.owned_log(owner, id)?;

        let before = state.destinations.len();
        state.destinations.retain(|d| d.travel_log_id != id);
        let removed = before - state.destinations.len();
        state.logs.retain(|log| log.id != id);

        info!(log_id = %id.0, destinations_removed = removed, "Deleted travel log");
        Ok(())
    }

    pub fn add_destination(
        &self,
        identity: &Identity,
        travel_log_id: TravelLogId,
        new_destination: NewDestination,
    ) -> Result<Destination> {
        let owner = identity.owner()?;
        let mut state = self.lock()?;
        let destination = state.insert_destination(owner, travel_log_id, new_destination)?;
        debug!(log_id = %travel_log_id.0, name = %destination.name, "Pinned destination");
        Ok(destination)
    }

    pub fn update_destination(
        &self,
        identity: &Identity,
        id: DestinationId,
        patch: DestinationPatch,
    ) -> Result<Destination> {
        let owner = identity.owner()?;
        let name = patch.name.as_deref().map(|n| require_text("name", n)).transpose()?;
        let mut state = self.lock()?;

        let destination = state.owned_destination_mut(owner, id)?;
        if let Some(name) = name {
            destination.name = name;
        }
        if let Some(notes) = patch.notes {
            destination.notes = Some(notes);
        }
        if let Some(visited_date) = patch.visited_date {
            destination.visited_date = Some(visited_date);
        }
        if let Some(category) = patch.category {
            destination.category = Some(category);
        }
        Ok(destination.clone())
    }

    pub fn delete_destination(&self, identity: &Identity, id: DestinationId) -> Result<()> {
        let owner = identity.owner()?;
        let mut state = self.lock()?;
        state.owned_destination_mut(owner, id)?;
        state.destinations.retain(|d| d.id != id);
        Ok(())
    }

    pub fn list_destinations(
        &self,
        identity: &Identity,
        travel_log_id: TravelLogId,
    ) -> Result<Vec<Destination>> {
        let owner = identity.owner()?;
        let state = self.lock()?;
        state.owned_log(owner, travel_log_id)?;
        Ok(state.destinations_of(travel_log_id))
    }

    /// Seed a week-long Manali trip with three pinned places.
    pub fn create_sample_data(&self, identity: &Identity) -> Result<TravelLogId> {
        let owner = identity.owner()?;
        let now = Utc::now();
        let mut state = self.lock()?;

        let log = state.insert_log(
            owner,
            NewTravelLog {
                title: "Manali Adventure".to_string(),
                description: Some(
                    "A week exploring valleys, temples, and cafes in Manali.".to_string(),
                ),
                start_date: Some(now - Duration::days(7)),
                end_date: Some(now),
            },
        )?;

        let samples = [
            ("Hadimba Temple", 32.2435, 77.1887, "Temple", "Ancient cedar wood temple in the middle of the forest."),
            ("Solang Valley", 32.3164, 77.1556, "Adventure", "Paragliding and zorbing with amazing mountain views."),
            ("Old Manali", 32.257, 77.1893, "Neighborhood", "Chill cafes, live music, and relaxed vibe."),
        ];

        for (name, latitude, longitude, category, notes) in samples {
            state.insert_destination(
                owner,
                log.id,
                NewDestination {
                    name: name.to_string(),
                    latitude,
                    longitude,
                    notes: Some(notes.to_string()),
                    visited_date: Some(now),
                    category: Some(category.to_string()),
                },
            )?;
        }

        info!(owner = %owner, log_id = %log.id.0, "Created sample travel log");
        Ok(log.id)
    }
}
