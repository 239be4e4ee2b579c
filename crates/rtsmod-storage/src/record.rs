//! The serialized form of a city.
//!
//! A record holds the owner, the origin coordinate, one resource entry per
//! type (by canonical name), and optional `buildings` / `units` sections.
//! Decoding is forward compatible:
//!
//! - a missing `location`, or any missing `x`/`y`/`z`, reads as 0;
//! - a missing resource entry reads as 0, a negative one clamps to 0;
//! - resource, building, unit, state, and order names that do not parse are
//!   skipped rather than rejecting the record;
//! - missing `buildings` / `units` sections mean none;
//! - a missing `name` reads as the default city name, a missing `level` as 1;
//! - a unit recorded as dead with health left is restored idle.
//!
//! Only genuinely type-mismatched data (a string where an integer belongs,
//! an unparsable document) makes a record malformed.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rtsmod_city::{Building, City, Order, Unit, building_blueprint, unit_blueprint};
use rtsmod_types::{
    BuildingType, OrderType, PlayerId, Position, ResourceType, UnitId, UnitState, UnitType,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One city as written to storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    /// Owner UUID in canonical text form. The storage key is authoritative;
    /// this copy is informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Display name. Absent means the default name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// City level. Absent means level 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,

    /// Unit count when saved. The `units` section is authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u32>,

    /// Origin coordinate. Absent means the world origin.
    #[serde(default)]
    pub location: Option<LocationRecord>,

    /// Resource amounts keyed by canonical resource name.
    #[serde(default)]
    pub resources: Option<BTreeMap<String, i64>>,

    /// When the city was founded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded_at: Option<DateTime<Utc>>,

    /// Buildings, in position order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buildings: Vec<BuildingRecord>,

    /// Units, in id order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<UnitRecord>,
}

/// An `{x, y, z}` block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// East-west axis.
    #[serde(default)]
    pub x: i32,
    /// Vertical axis.
    #[serde(default)]
    pub y: i32,
    /// North-south axis.
    #[serde(default)]
    pub z: i32,
}

impl From<Position> for LocationRecord {
    fn from(p: Position) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<LocationRecord> for Position {
    fn from(r: LocationRecord) -> Self {
        Self::new(r.x, r.y, r.z)
    }
}

/// One building. Max health, build time, and cost come from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingRecord {
    /// Canonical building type name.
    #[serde(rename = "type")]
    pub building_type: String,
    /// Position within the world.
    #[serde(flatten)]
    pub position: LocationRecord,
    /// Current health. Absent means full health.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u32>,
    /// Whether construction is still in progress.
    #[serde(default)]
    pub under_construction: bool,
    /// Ticks of construction completed.
    #[serde(default)]
    pub construction_progress: u32,
}

/// One queued order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Canonical order type name.
    pub kind: String,
    /// Target position, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<LocationRecord>,
}

/// One unit. Max health comes from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Unit UUID in canonical text form.
    pub id: String,
    /// Canonical unit type name.
    #[serde(rename = "type")]
    pub unit_type: String,
    /// Current position.
    #[serde(flatten)]
    pub position: LocationRecord,
    /// Current health. Absent means full health.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u32>,
    /// Canonical state name. Absent means idle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Targeted unit UUID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Pending orders, front first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orders: Vec<OrderRecord>,
}

impl CityRecord {
    /// Capture the full state of `city`.
    pub fn from_city(city: &City) -> Self {
        let resources = city
            .resources()
            .iter()
            .map(|(resource, amount)| (resource.name().to_owned(), i64::from(amount)))
            .collect();

        Self {
            owner: Some(city.owner().to_string()),
            name: Some(city.name().to_owned()),
            level: Some(city.level()),
            population: Some(city.population()),
            location: Some(city.location().into()),
            resources: Some(resources),
            founded_at: Some(city.founded_at()),
            buildings: city.buildings().values().map(BuildingRecord::from).collect(),
            units: city.units().values().map(UnitRecord::from).collect(),
        }
    }

    /// Rebuild a city for `owner`, skipping entries that no longer parse.
    pub fn into_city(self, owner: PlayerId) -> City {
        if let Some(recorded) = self.owner.as_deref() {
            if recorded.parse::<PlayerId>().ok() != Some(owner) {
                warn!(%owner, recorded, "record owner field disagrees with its key; using key");
            }
        }

        let location = self.location.unwrap_or_default().into();
        let mut city = City::new(owner, location);
        if let Some(founded_at) = self.founded_at {
            city = city.with_founded_at(founded_at);
        }
        if let Some(name) = self.name.as_deref() {
            city = city.with_name(name);
        }
        if let Some(level) = self.level {
            city = city.with_level(level);
        }

        for (name, amount) in self.resources.unwrap_or_default() {
            match name.parse::<ResourceType>() {
                Ok(resource) => city.add_resource(resource, clamp_amount(amount)),
                Err(_) => tracing::debug!(%owner, %name, "ignoring unknown resource type"),
            }
        }

        for record in self.buildings {
            if let Some(building) = record.into_building(owner) {
                city.add_building(building);
            }
        }

        for record in self.units {
            if let Some(unit) = record.into_unit(owner) {
                if let Err(e) = city.add_unit(unit) {
                    warn!(%owner, error = %e, "skipping unit record");
                }
            }
        }

        if let Some(recorded) = self.population {
            if recorded != city.population() {
                tracing::debug!(
                    %owner,
                    recorded,
                    restored = city.population(),
                    "recorded population differs from restored units"
                );
            }
        }

        city
    }
}

impl From<&Building> for BuildingRecord {
    fn from(b: &Building) -> Self {
        Self {
            building_type: b.building_type().name().to_owned(),
            position: b.position().into(),
            health: Some(b.health()),
            under_construction: b.is_under_construction(),
            construction_progress: b.construction_progress(),
        }
    }
}

impl BuildingRecord {
    fn into_building(self, owner: PlayerId) -> Option<Building> {
        let Ok(building_type) = self.building_type.parse::<BuildingType>() else {
            warn!(%owner, building_type = %self.building_type, "ignoring unknown building type");
            return None;
        };
        let mut building =
            building_blueprint(building_type).instantiate(owner, self.position.into());
        if let Some(health) = self.health {
            building = building.with_health(health);
        }
        if self.under_construction {
            building = building.with_construction(self.construction_progress);
        }
        Some(building)
    }
}

impl From<&Unit> for UnitRecord {
    fn from(u: &Unit) -> Self {
        Self {
            id: u.id().to_string(),
            unit_type: u.unit_type().name().to_owned(),
            position: u.position().into(),
            health: Some(u.health()),
            state: Some(u.state().name().to_owned()),
            target: u.target().map(|t| t.to_string()),
            orders: u
                .orders()
                .iter()
                .map(|o| OrderRecord {
                    kind: o.kind.name().to_owned(),
                    target: o.target.map(LocationRecord::from),
                })
                .collect(),
        }
    }
}

impl UnitRecord {
    fn into_unit(self, owner: PlayerId) -> Option<Unit> {
        let Ok(id) = self.id.parse::<UnitId>() else {
            warn!(%owner, id = %self.id, "ignoring unit with invalid id");
            return None;
        };
        let Ok(unit_type) = self.unit_type.parse::<UnitType>() else {
            warn!(%owner, unit_type = %self.unit_type, "ignoring unknown unit type");
            return None;
        };

        let blueprint = unit_blueprint(unit_type);
        let mut unit = Unit::new(id, owner, unit_type, self.position.into(), blueprint.max_health);
        if let Some(state) = self.state.as_deref().and_then(|s| s.parse::<UnitState>().ok()) {
            unit = unit.with_state(state);
        }
        if let Some(health) = self.health {
            unit = unit.with_health(health);
        }
        if unit.state() == UnitState::Dead && unit.health() > 0 {
            unit = unit.with_state(UnitState::Idle);
        }
        unit.set_target(self.target.as_deref().and_then(|t| t.parse().ok()));
        for order in self.orders {
            if let Ok(kind) = order.kind.parse::<OrderType>() {
                unit.push_order(Order {
                    kind,
                    target: order.target.map(Position::from),
                });
            }
        }
        Some(unit)
    }
}

/// Clamp a stored amount into the ledger's range.
fn clamp_amount(amount: i64) -> u32 {
    u32::try_from(amount.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn decode(yaml: &str) -> CityRecord {
        serde_yml::from_str(yaml).unwrap()
    }

    #[test]
    fn missing_location_fields_default_to_zero() {
        let owner = PlayerId::new();
        let city = decode("location:\n  x: 12\nresources: {}\n").into_city(owner);
        assert_eq!(city.location(), Position::new(12, 0, 0));

        let city = decode("resources:\n  GOLD: 1\n").into_city(owner);
        assert_eq!(city.location(), Position::ORIGIN);
    }

    #[test]
    fn unknown_resources_ignored_and_negatives_clamped() {
        let city = decode("resources:\n  GOLD: 7\n  MANA: 99\n  FOOD: -4\n")
            .into_city(PlayerId::new());
        assert_eq!(city.get_resource(ResourceType::Gold), 7);
        assert_eq!(city.get_resource(ResourceType::Food), 0);
        assert_eq!(city.get_resource(ResourceType::Wood), 0);
    }

    #[test]
    fn string_amount_is_malformed() {
        let parsed = serde_yml::from_str::<CityRecord>("resources:\n  GOLD: lots\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn unknown_building_types_are_skipped() {
        let yaml = "buildings:\n  - type: CASTLE\n    x: 1\n  - type: TOWER\n    x: 2\n    health: 10\n";
        let city = decode(yaml).into_city(PlayerId::new());
        assert_eq!(city.buildings().len(), 1);
        let tower = city.building(Position::new(2, 0, 0)).unwrap();
        assert_eq!(tower.building_type(), BuildingType::Tower);
        assert_eq!(tower.health(), 10);
        assert_eq!(tower.max_health(), 400);
    }

    #[test]
    fn unit_sections_roundtrip_with_orders() {
        let owner = PlayerId::new();
        let mut city = City::new(owner, Position::new(-3, 70, 8));
        let id = city
            .spawn_unit(UnitType::Worker, Position::new(1, 1, 1))
            .unwrap();
        let unit = city.unit_mut(id).unwrap();
        unit.push_order(Order::at(OrderType::Gather, Position::new(9, 9, 9)));
        unit.damage(20);

        let restored = CityRecord::from_city(&city).into_city(owner);
        let unit = restored.unit(id).unwrap();
        assert_eq!(unit.health(), 30);
        assert_eq!(unit.orders().len(), 1);
        assert_eq!(unit.position(), Position::new(1, 1, 1));
    }

    #[test]
    fn record_lists_every_resource_by_name() {
        let record = CityRecord::from_city(&City::new(PlayerId::new(), Position::ORIGIN));
        let names: Vec<String> = record.resources.unwrap().into_keys().collect();
        assert_eq!(names, vec!["FOOD", "GOLD", "STONE", "WOOD"]);
    }

    #[test]
    fn dead_state_with_health_left_restores_idle() {
        let id = UnitId::new();
        let yaml = format!(
            "units:\n  - id: {id}\n    type: SOLDIER\n    health: 40\n    state: DEAD\n  \
             - id: {other}\n    type: SOLDIER\n    health: 0\n    state: ATTACKING\n",
            other = UnitId::new(),
        );
        let city = decode(&yaml).into_city(PlayerId::new());

        let survivor = city.unit(id).unwrap();
        assert_eq!(survivor.health(), 40);
        assert_eq!(survivor.state(), UnitState::Idle);

        let fallen: Vec<_> = city
            .units()
            .values()
            .filter(|u| u.id() != id)
            .collect();
        assert_eq!(fallen.len(), 1);
        assert_eq!(fallen.first().unwrap().state(), UnitState::Dead);
    }

    #[test]
    fn name_and_level_roundtrip_and_default_when_missing() {
        let owner = PlayerId::new();
        let city = City::new(owner, Position::ORIGIN)
            .with_name("Stonehaven")
            .with_level(3);
        let record = CityRecord::from_city(&city);
        assert_eq!(record.population, Some(0));

        let restored = record.into_city(owner);
        assert_eq!(restored.name(), "Stonehaven");
        assert_eq!(restored.level(), 3);
        assert_eq!(restored.max_population(), 140);

        let bare = decode("resources: {}\n").into_city(owner);
        assert_eq!(bare.name(), rtsmod_city::city::DEFAULT_CITY_NAME);
        assert_eq!(bare.level(), 1);
    }

    #[test]
    fn out_of_range_level_is_clamped() {
        let city = decode("level: 42\n").into_city(PlayerId::new());
        assert_eq!(city.level(), rtsmod_city::MAX_LEVEL);
        let city = decode("level: 0\n").into_city(PlayerId::new());
        assert_eq!(city.level(), 1);
    }
}
