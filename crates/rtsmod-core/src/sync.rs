//! Read-only city snapshots pushed to online players.
//!
//! The coordinator builds a [`CitySnapshot`] for every online player with a
//! city and hands it to a [`SyncSink`]. The sink is whatever network layer
//! the host provides; this crate never serializes for the wire itself.

use std::collections::BTreeMap;

use rtsmod_city::{Building, City, Unit};
use rtsmod_types::{
    BuildingType, PlayerId, Position, ResourceType, UnitId, UnitState, UnitType,
};
use serde::Serialize;

/// Point-in-time copy of one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitySnapshot {
    /// Owning player.
    pub owner: PlayerId,
    /// City name.
    pub name: String,
    /// Current level.
    pub level: u32,
    /// Units alive.
    pub population: u32,
    /// Unit cap at the current level.
    pub max_population: u32,
    /// Combined building and unit power.
    pub power: u32,
    /// Building slots still free.
    pub available_build_slots: u32,
    /// City origin.
    pub location: Position,
    /// Every resource amount.
    pub resources: BTreeMap<ResourceType, u32>,
    /// Buildings, in position order.
    pub buildings: Vec<BuildingSnapshot>,
    /// Units, in id order.
    pub units: Vec<UnitSnapshot>,
}

/// One building as seen by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildingSnapshot {
    /// Building kind.
    pub building_type: BuildingType,
    /// Where it stands.
    pub position: Position,
    /// Current health.
    pub health: u32,
    /// Health at full repair.
    pub max_health: u32,
    /// Whether construction is still in progress.
    pub under_construction: bool,
}

/// One unit as seen by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitSnapshot {
    /// Unit identity.
    pub id: UnitId,
    /// Unit kind.
    pub unit_type: UnitType,
    /// Current position.
    pub position: Position,
    /// Current health.
    pub health: u32,
    /// Current activity.
    pub state: UnitState,
}

impl From<&Building> for BuildingSnapshot {
    fn from(b: &Building) -> Self {
        Self {
            building_type: b.building_type(),
            position: b.position(),
            health: b.health(),
            max_health: b.max_health(),
            under_construction: b.is_under_construction(),
        }
    }
}

impl From<&Unit> for UnitSnapshot {
    fn from(u: &Unit) -> Self {
        Self {
            id: u.id(),
            unit_type: u.unit_type(),
            position: u.position(),
            health: u.health(),
            state: u.state(),
        }
    }
}

impl From<&City> for CitySnapshot {
    fn from(city: &City) -> Self {
        Self {
            owner: city.owner(),
            name: city.name().to_owned(),
            level: city.level(),
            population: city.population(),
            max_population: city.max_population(),
            power: city.power(),
            available_build_slots: city.available_build_slots(),
            location: city.location(),
            resources: city.resources().snapshot(),
            buildings: city.buildings().values().map(BuildingSnapshot::from).collect(),
            units: city.units().values().map(UnitSnapshot::from).collect(),
        }
    }
}

/// Receiver of periodic city snapshots.
pub trait SyncSink: Send + Sync {
    /// Deliver `snapshot` to its owner.
    fn push(&self, snapshot: &CitySnapshot);
}

/// A sink that keeps every snapshot it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    received: std::sync::Mutex<Vec<CitySnapshot>>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every snapshot received so far.
    pub fn take(&self) -> Vec<CitySnapshot> {
        core::mem::take(
            &mut *self
                .received
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        )
    }
}

impl SyncSink for RecordingSink {
    fn push(&self, snapshot: &CitySnapshot) {
        self.received
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(snapshot.clone());
    }
}
