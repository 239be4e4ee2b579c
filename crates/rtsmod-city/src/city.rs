//! The city aggregate: one player's base.
//!
//! A [`City`] owns a [`ResourceLedger`], a map of buildings keyed by
//! position, and a map of units keyed by id. The owner is fixed at
//! construction. Collaborators get read-only views of the maps; every
//! mutation goes through a method on the city.
//!
//! Two permissive behaviors are kept on purpose:
//! - [`City::add_building`] silently replaces whatever stood at the same
//!   position. [`City::construct`] is the checked alternative.
//! - [`City::subtract_resource`] clamps at zero. [`City::spend`] is the
//!   all-or-nothing alternative.
//!
//! # Progression
//!
//! Population is the number of units. The cap starts at
//! [`BASE_POPULATION`] and grows by [`POPULATION_PER_LEVEL`] with each level.
//! Upgrading from level `n` needs `n * 1000` power and `n * 3` buildings; the
//! top level is [`MAX_LEVEL`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rtsmod_types::{BuildingType, PlayerId, Position, ResourceType, UnitId, UnitType};
use serde::Serialize;
use tracing::debug;

use crate::building::Building;
use crate::catalog::{building_blueprint, unit_blueprint};
use crate::error::CityError;
use crate::ledger::ResourceLedger;
use crate::unit::Unit;

/// Name given to a city founded without one.
pub const DEFAULT_CITY_NAME: &str = "New City";

/// Highest city level.
pub const MAX_LEVEL: u32 = 5;

/// Population cap at level 1.
pub const BASE_POPULATION: u32 = 100;

/// Population cap gained per level above 1.
pub const POPULATION_PER_LEVEL: u32 = 20;

/// Power needed per current level to upgrade.
const POWER_PER_LEVEL: u32 = 1_000;

/// Buildings needed per current level to upgrade.
const BUILDINGS_PER_LEVEL: u32 = 3;

/// Entities removed by [`City::reap_destroyed`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaped {
    /// Buildings that had reached zero health.
    pub buildings: Vec<Building>,
    /// Units that had reached zero health.
    pub units: Vec<Unit>,
}

impl Reaped {
    /// Whether nothing was removed.
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty() && self.units.is_empty()
    }
}

/// Summary figures for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityStats {
    /// City name.
    pub name: String,
    /// Current level.
    pub level: u32,
    /// Current number of units.
    pub population: u32,
    /// Unit cap at the current level.
    pub max_population: u32,
    /// Number of buildings.
    pub buildings: u32,
    /// Number of units.
    pub units: u32,
    /// Number of workers.
    pub workers: u32,
    /// Number of soldiers and ranged units.
    pub military_units: u32,
    /// Combined power of buildings and units.
    pub power: u32,
    /// Every resource amount.
    pub resources: BTreeMap<ResourceType, u32>,
    /// Buildings that can still be placed at the current level.
    pub available_build_slots: u32,
}

/// A player's base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    owner: PlayerId,
    name: String,
    level: u32,
    location: Position,
    resources: ResourceLedger,
    buildings: BTreeMap<Position, Building>,
    units: BTreeMap<UnitId, Unit>,
    founded_at: DateTime<Utc>,
}

impl City {
    /// Create an empty city with a zeroed ledger, founded now.
    pub fn new(owner: PlayerId, location: Position) -> Self {
        Self {
            owner,
            name: DEFAULT_CITY_NAME.to_owned(),
            level: 1,
            location,
            resources: ResourceLedger::new(),
            buildings: BTreeMap::new(),
            units: BTreeMap::new(),
            founded_at: Utc::now(),
        }
    }

    /// Override the founding timestamp (used when restoring from storage).
    #[must_use]
    pub const fn with_founded_at(mut self, founded_at: DateTime<Utc>) -> Self {
        self.founded_at = founded_at;
        self
    }

    /// Set the name. Blank names keep the current one.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.rename(name);
        self
    }

    /// Set the level, clamped to `1..=MAX_LEVEL` (used when restoring from
    /// storage).
    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.clamp(1, MAX_LEVEL);
        self
    }

    /// The owning player. Immutable for the life of the city.
    pub const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// The city's origin coordinate.
    pub const fn location(&self) -> Position {
        self.location
    }

    /// The city's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the city. Surrounding whitespace is trimmed; a blank name is
    /// ignored.
    ///
    /// Returns whether the name changed.
    pub fn rename(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || name == self.name {
            return false;
        }
        name.clone_into(&mut self.name);
        true
    }

    /// Current level, in `1..=MAX_LEVEL`.
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// When the city was first created.
    pub const fn founded_at(&self) -> DateTime<Utc> {
        self.founded_at
    }

    /// Read-only view of the ledger.
    pub const fn resources(&self) -> &ResourceLedger {
        &self.resources
    }

    /// Read-only view of the buildings, keyed by position.
    pub const fn buildings(&self) -> &BTreeMap<Position, Building> {
        &self.buildings
    }

    /// Read-only view of the units, keyed by id.
    pub const fn units(&self) -> &BTreeMap<UnitId, Unit> {
        &self.units
    }

    // ---------------------------------------------------------------------
    // Resources
    // ---------------------------------------------------------------------

    /// Stored amount of `resource`.
    pub fn get_resource(&self, resource: ResourceType) -> u32 {
        self.resources.get(resource)
    }

    /// Add `amount` of `resource` to the ledger.
    pub fn add_resource(&mut self, resource: ResourceType, amount: u32) {
        self.resources.add(resource, amount);
    }

    /// Remove `amount` of `resource`, clamping at zero.
    pub fn subtract_resource(&mut self, resource: ResourceType, amount: u32) {
        self.resources.subtract(resource, amount);
    }

    /// Whether at least `amount` of `resource` is stored.
    pub fn has_enough(&self, resource: ResourceType, amount: u32) -> bool {
        self.resources.has_enough(resource, amount)
    }

    /// Whether the ledger covers every category of `cost`.
    pub fn can_afford(&self, cost: &ResourceLedger) -> bool {
        self.resources.can_afford(cost)
    }

    /// Deduct `cost` in full, or not at all.
    pub fn spend(&mut self, cost: &ResourceLedger) -> bool {
        self.resources.spend(cost)
    }

    // ---------------------------------------------------------------------
    // Buildings
    // ---------------------------------------------------------------------

    /// Insert a building at its position, replacing any building already
    /// there. Returns the replaced building.
    pub fn add_building(&mut self, building: Building) -> Option<Building> {
        self.buildings.insert(building.position(), building)
    }

    /// Remove the building at `position`. Absent positions are a no-op.
    pub fn remove_building(&mut self, position: Position) -> Option<Building> {
        self.buildings.remove(&position)
    }

    /// The building at `position`.
    pub fn building(&self, position: Position) -> Option<&Building> {
        self.buildings.get(&position)
    }

    /// Mutable access to the building at `position`.
    pub fn building_mut(&mut self, position: Position) -> Option<&mut Building> {
        self.buildings.get_mut(&position)
    }

    /// Place a new building of `building_type` at `position`, paying its
    /// blueprint cost.
    ///
    /// The building starts as a construction site unless its build time is
    /// zero. Nothing is deducted when an error is returned.
    pub fn construct(
        &mut self,
        building_type: BuildingType,
        position: Position,
    ) -> Result<&Building, CityError> {
        if let Some(existing) = self.buildings.get(&position) {
            return Err(CityError::PositionOccupied {
                position,
                existing: existing.building_type(),
            });
        }
        let blueprint = building_blueprint(building_type);
        if !self.resources.spend(&blueprint.cost) {
            return Err(CityError::CannotAffordBuilding(building_type));
        }
        let building = blueprint
            .instantiate(self.owner, position)
            .with_construction(0);
        debug!(owner = %self.owner, %building_type, %position, "construction started");
        Ok(self.buildings.entry(position).or_insert(building))
    }

    /// Advance every construction site by `delta` ticks.
    ///
    /// Returns the positions of buildings completed by this call.
    pub fn advance_construction(&mut self, delta: u32) -> Vec<Position> {
        self.buildings
            .values_mut()
            .filter_map(|b| b.advance_construction(delta).then(|| b.position()))
            .collect()
    }

    /// Number of complete, standing resource buildings.
    pub fn producing_buildings(&self) -> u32 {
        count(self.buildings.values().filter(|b| b.is_producing()).count())
    }

    // ---------------------------------------------------------------------
    // Units
    // ---------------------------------------------------------------------

    /// Add an existing unit to the city.
    ///
    /// Rejects units owned by another player and new units beyond the
    /// population cap. A unit with an id already present replaces the old
    /// entry.
    pub fn add_unit(&mut self, unit: Unit) -> Result<(), CityError> {
        if unit.owner() != self.owner {
            return Err(CityError::ForeignUnit {
                unit: unit.id(),
                owner: unit.owner(),
                city: self.owner,
            });
        }
        if !self.units.contains_key(&unit.id()) {
            self.ensure_room()?;
        }
        self.units.insert(unit.id(), unit);
        Ok(())
    }

    /// Create a unit of `unit_type` at `position` without paying for it.
    pub fn spawn_unit(
        &mut self,
        unit_type: UnitType,
        position: Position,
    ) -> Result<UnitId, CityError> {
        self.ensure_room()?;
        let unit = unit_blueprint(unit_type).instantiate(self.owner, position);
        let id = unit.id();
        self.units.insert(id, unit);
        Ok(id)
    }

    /// Create a unit of `unit_type` at `position`, paying its blueprint cost.
    pub fn train_unit(
        &mut self,
        unit_type: UnitType,
        position: Position,
    ) -> Result<UnitId, CityError> {
        self.ensure_room()?;
        let blueprint = unit_blueprint(unit_type);
        if !self.resources.spend(&blueprint.cost) {
            return Err(CityError::CannotAffordUnit(unit_type));
        }
        self.spawn_unit(unit_type, position)
    }

    /// Remove the unit with `id`. Absent ids are a no-op.
    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        self.units.remove(&id)
    }

    /// The unit with `id`.
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Mutable access to the unit with `id`.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// Units of `unit_type`, in id order.
    pub fn units_of_type(&self, unit_type: UnitType) -> impl Iterator<Item = &Unit> + '_ {
        self.units
            .values()
            .filter(move |u| u.unit_type() == unit_type)
    }

    /// Every worker.
    pub fn workers(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units_of_type(UnitType::Worker)
    }

    /// Every soldier and ranged unit.
    pub fn military_units(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units.values().filter(|u| u.can_attack())
    }

    /// Number of units.
    pub fn population(&self) -> u32 {
        count(self.units.len())
    }

    /// Unit cap at the current level.
    pub const fn max_population(&self) -> u32 {
        BASE_POPULATION.saturating_add(
            POPULATION_PER_LEVEL.saturating_mul(self.level.saturating_sub(1)),
        )
    }

    fn ensure_room(&self) -> Result<(), CityError> {
        if self.population() >= self.max_population() {
            return Err(CityError::PopulationCapReached {
                max: self.max_population(),
            });
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Progression
    // ---------------------------------------------------------------------

    /// Combined power of every building and unit.
    pub fn power(&self) -> u32 {
        let buildings = self
            .buildings
            .values()
            .map(|b| building_blueprint(b.building_type()).power);
        let units = self
            .units
            .values()
            .map(|u| unit_blueprint(u.unit_type()).power);
        buildings
            .chain(units)
            .fold(0_u32, |total, power| total.saturating_add(power))
    }

    /// Total building slots at the current level.
    pub const fn build_slots(&self) -> u32 {
        match self.level {
            0 | 1 => 10,
            2 => 15,
            3 => 25,
            above => 25_u32.saturating_add(5_u32.saturating_mul(above.saturating_sub(3))),
        }
    }

    /// Slots left for new buildings.
    pub fn available_build_slots(&self) -> u32 {
        self.build_slots()
            .saturating_sub(count(self.buildings.len()))
    }

    /// Whether another building fits.
    pub fn can_build_more(&self) -> bool {
        self.available_build_slots() > 0
    }

    /// Raise the level by one if the city is strong enough.
    ///
    /// Returns the new level.
    pub fn upgrade(&mut self) -> Result<u32, CityError> {
        if self.level >= MAX_LEVEL {
            return Err(CityError::MaxLevel(MAX_LEVEL));
        }
        let required_power = POWER_PER_LEVEL.saturating_mul(self.level);
        let required_buildings = BUILDINGS_PER_LEVEL.saturating_mul(self.level);
        let power = self.power();
        let buildings = count(self.buildings.len());
        if power < required_power || buildings < required_buildings {
            return Err(CityError::UpgradeNotReady {
                level: self.level,
                power,
                required_power,
                buildings,
                required_buildings,
            });
        }
        self.level = self.level.saturating_add(1);
        debug!(owner = %self.owner, level = self.level, "city upgraded");
        Ok(self.level)
    }

    /// Summary figures for status displays.
    pub fn stats(&self) -> CityStats {
        CityStats {
            name: self.name.clone(),
            level: self.level,
            population: self.population(),
            max_population: self.max_population(),
            buildings: count(self.buildings.len()),
            units: count(self.units.len()),
            workers: count(self.workers().count()),
            military_units: count(self.military_units().count()),
            power: self.power(),
            resources: self.resources.snapshot(),
            available_build_slots: self.available_build_slots(),
        }
    }

    /// Remove every destroyed building and dead unit.
    pub fn reap_destroyed(&mut self) -> Reaped {
        let (dead_buildings, standing): (BTreeMap<_, _>, BTreeMap<_, _>) =
            core::mem::take(&mut self.buildings)
                .into_iter()
                .partition(|(_, b)| b.is_destroyed());
        self.buildings = standing;

        let (dead_units, alive): (BTreeMap<_, _>, BTreeMap<_, _>) =
            core::mem::take(&mut self.units)
                .into_iter()
                .partition(|(_, u)| u.is_dead());
        self.units = alive;

        let reaped = Reaped {
            buildings: dead_buildings.into_values().collect(),
            units: dead_units.into_values().collect(),
        };
        if !reaped.is_empty() {
            debug!(
                owner = %self.owner,
                buildings = reaped.buildings.len(),
                units = reaped.units.len(),
                "reaped destroyed entities"
            );
        }
        reaped
    }
}

/// Saturating `usize` to `u32` conversion for entity counts.
fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn city() -> City {
        City::new(PlayerId::new(), Position::new(10, 64, -5))
    }

    #[test]
    fn new_city_is_empty() {
        let c = city();
        assert!(c.resources().is_empty());
        assert!(c.buildings().is_empty());
        assert!(c.units().is_empty());
        assert_eq!(c.location(), Position::new(10, 64, -5));
    }

    #[test]
    fn add_building_overwrites_same_position() {
        let mut c = city();
        let pos = Position::new(1, 0, 1);
        let tower = building_blueprint(BuildingType::Tower).instantiate(c.owner(), pos);
        let storage = building_blueprint(BuildingType::Storage).instantiate(c.owner(), pos);

        assert!(c.add_building(tower).is_none());
        let replaced = c.add_building(storage);
        assert_eq!(replaced.map(|b| b.building_type()), Some(BuildingType::Tower));
        assert_eq!(c.buildings().len(), 1);
        assert_eq!(
            c.building(pos).map(Building::building_type),
            Some(BuildingType::Storage)
        );
    }

    #[test]
    fn remove_building_on_empty_position_is_noop() {
        let mut c = city();
        assert!(c.remove_building(Position::new(7, 7, 7)).is_none());
        assert!(c.buildings().is_empty());
    }

    #[test]
    fn resources_delegate_to_ledger() {
        let mut c = city();
        c.add_resource(ResourceType::Gold, 50);
        c.subtract_resource(ResourceType::Gold, 80);
        assert_eq!(c.get_resource(ResourceType::Gold), 0);
    }

    #[test]
    fn construct_pays_and_places_site() {
        let mut c = city();
        c.add_resource(ResourceType::Wood, 120);
        c.add_resource(ResourceType::Stone, 50);
        let pos = Position::new(2, 64, 2);

        let site = c.construct(BuildingType::Barracks, pos).unwrap();
        assert!(site.is_under_construction());
        assert_eq!(c.get_resource(ResourceType::Wood), 20);
        assert_eq!(c.get_resource(ResourceType::Stone), 0);
    }

    #[test]
    fn construct_rejects_occupied_position_without_charging() {
        let mut c = city();
        c.add_resource(ResourceType::Wood, 500);
        let pos = Position::new(0, 0, 0);
        c.construct(BuildingType::Storage, pos).unwrap();

        let err = c.construct(BuildingType::Storage, pos).err();
        assert_eq!(
            err,
            Some(CityError::PositionOccupied {
                position: pos,
                existing: BuildingType::Storage,
            })
        );
        assert_eq!(c.get_resource(ResourceType::Wood), 420);
    }

    #[test]
    fn construct_rejects_unaffordable_without_charging() {
        let mut c = city();
        c.add_resource(ResourceType::Wood, 100);
        let err = c.construct(BuildingType::Tower, Position::ORIGIN).err();
        assert_eq!(err, Some(CityError::CannotAffordBuilding(BuildingType::Tower)));
        assert_eq!(c.get_resource(ResourceType::Wood), 100);
        assert!(c.buildings().is_empty());
    }

    #[test]
    fn advance_construction_reports_completions() {
        let mut c = city();
        c.add_resource(ResourceType::Wood, 200);
        let pos = Position::new(3, 0, 3);
        c.construct(BuildingType::ResourceBuilding, pos).unwrap();

        assert!(c.advance_construction(199).is_empty());
        assert_eq!(c.producing_buildings(), 0);
        assert_eq!(c.advance_construction(1), vec![pos]);
        assert_eq!(c.producing_buildings(), 1);
    }

    #[test]
    fn add_unit_rejects_foreign_owner() {
        let mut c = city();
        let stranger = unit_blueprint(UnitType::Worker).instantiate(PlayerId::new(), Position::ORIGIN);
        assert!(matches!(
            c.add_unit(stranger),
            Err(CityError::ForeignUnit { .. })
        ));
        assert!(c.units().is_empty());
    }

    #[test]
    fn train_unit_pays_cost() {
        let mut c = city();
        c.add_resource(ResourceType::Food, 60);
        let id = c.train_unit(UnitType::Worker, Position::ORIGIN).unwrap();
        assert_eq!(c.get_resource(ResourceType::Food), 10);
        assert_eq!(c.unit(id).map(Unit::unit_type), Some(UnitType::Worker));

        assert_eq!(
            c.train_unit(UnitType::Worker, Position::ORIGIN).err(),
            Some(CityError::CannotAffordUnit(UnitType::Worker))
        );
        assert_eq!(c.units().len(), 1);
    }

    #[test]
    fn reap_removes_only_destroyed_entities() {
        let mut c = city();
        let doomed = c.spawn_unit(UnitType::Soldier, Position::ORIGIN).unwrap();
        let survivor = c.spawn_unit(UnitType::Worker, Position::ORIGIN).unwrap();
        c.unit_mut(doomed).unwrap().damage(1_000);

        let wall = Position::new(5, 0, 5);
        c.add_building(building_blueprint(BuildingType::Tower).instantiate(c.owner(), wall));
        c.building_mut(wall).unwrap().damage(1_000);
        c.add_building(
            building_blueprint(BuildingType::Storage).instantiate(c.owner(), Position::ORIGIN),
        );

        let reaped = c.reap_destroyed();
        assert_eq!(reaped.units.len(), 1);
        assert_eq!(reaped.buildings.len(), 1);
        assert!(c.unit(doomed).is_none());
        assert!(c.unit(survivor).is_some());
        assert!(c.building(wall).is_none());
        assert_eq!(c.buildings().len(), 1);
    }

    #[test]
    fn new_city_starts_at_level_one_with_default_name() {
        let c = city();
        assert_eq!(c.name(), DEFAULT_CITY_NAME);
        assert_eq!(c.level(), 1);
        assert_eq!(c.population(), 0);
        assert_eq!(c.max_population(), 100);
        assert_eq!(c.build_slots(), 10);
    }

    #[test]
    fn rename_trims_and_ignores_blank() {
        let mut c = city();
        assert!(c.rename("  Riverside "));
        assert_eq!(c.name(), "Riverside");
        assert!(!c.rename("   "));
        assert!(!c.rename("Riverside"));
        assert_eq!(c.name(), "Riverside");
    }

    #[test]
    fn population_cap_blocks_spawn_and_train() {
        let mut c = city();
        for _ in 0..BASE_POPULATION {
            c.spawn_unit(UnitType::Worker, Position::ORIGIN).unwrap();
        }
        assert_eq!(c.population(), 100);
        assert_eq!(
            c.spawn_unit(UnitType::Worker, Position::ORIGIN),
            Err(CityError::PopulationCapReached { max: 100 })
        );

        c.add_resource(ResourceType::Food, 500);
        assert_eq!(
            c.train_unit(UnitType::Worker, Position::ORIGIN),
            Err(CityError::PopulationCapReached { max: 100 })
        );
        assert_eq!(c.get_resource(ResourceType::Food), 500);

        let extra = unit_blueprint(UnitType::Worker).instantiate(c.owner(), Position::ORIGIN);
        assert!(c.add_unit(extra).is_err());
    }

    #[test]
    fn removing_a_unit_frees_population() {
        let mut c = city();
        let id = c.spawn_unit(UnitType::Soldier, Position::ORIGIN).unwrap();
        assert_eq!(c.population(), 1);
        c.remove_unit(id);
        assert_eq!(c.population(), 0);
    }

    #[test]
    fn units_are_grouped_by_role() {
        let mut c = city();
        c.spawn_unit(UnitType::Worker, Position::ORIGIN).unwrap();
        c.spawn_unit(UnitType::Worker, Position::ORIGIN).unwrap();
        c.spawn_unit(UnitType::Soldier, Position::ORIGIN).unwrap();
        c.spawn_unit(UnitType::RangedUnit, Position::ORIGIN).unwrap();

        assert_eq!(c.workers().count(), 2);
        assert_eq!(c.military_units().count(), 2);
        assert_eq!(c.units_of_type(UnitType::RangedUnit).count(), 1);
    }

    #[test]
    fn power_sums_buildings_and_units() {
        let mut c = city();
        c.add_building(
            building_blueprint(BuildingType::TownCenter).instantiate(c.owner(), Position::ORIGIN),
        );
        c.add_building(
            building_blueprint(BuildingType::Tower).instantiate(c.owner(), Position::new(1, 0, 0)),
        );
        c.spawn_unit(UnitType::Soldier, Position::ORIGIN).unwrap();
        assert_eq!(c.power(), 100 + 75 + 20);
    }

    #[test]
    fn build_slots_shrink_as_buildings_are_added() {
        let mut c = city();
        for x in 0..10 {
            c.add_building(
                building_blueprint(BuildingType::Storage).instantiate(c.owner(), Position::new(x, 0, 0)),
            );
        }
        assert_eq!(c.available_build_slots(), 0);
        assert!(!c.can_build_more());
        assert_eq!(c.clone().with_level(3).available_build_slots(), 15);
        assert_eq!(c.clone().with_level(5).build_slots(), 35);
    }

    #[test]
    fn upgrade_needs_power_and_buildings() {
        let mut c = city();
        c.add_building(
            building_blueprint(BuildingType::TownCenter).instantiate(c.owner(), Position::ORIGIN),
        );
        assert_eq!(
            c.upgrade(),
            Err(CityError::UpgradeNotReady {
                level: 1,
                power: 100,
                required_power: 1_000,
                buildings: 1,
                required_buildings: 3,
            })
        );

        // 1 town center + 9 towers = 775 power, 10 buildings.
        for x in 1..10 {
            c.add_building(
                building_blueprint(BuildingType::Tower).instantiate(c.owner(), Position::new(x, 0, 0)),
            );
        }
        for _ in 0..8 {
            c.spawn_unit(UnitType::RangedUnit, Position::ORIGIN).unwrap();
        }
        assert_eq!(c.power(), 1_015);
        assert_eq!(c.upgrade(), Ok(2));
        assert_eq!(c.level(), 2);
        assert_eq!(c.max_population(), 120);
    }

    #[test]
    fn upgrade_stops_at_max_level() {
        let mut c = city().with_level(9);
        assert_eq!(c.level(), MAX_LEVEL);
        assert_eq!(c.upgrade(), Err(CityError::MaxLevel(MAX_LEVEL)));
    }

    #[test]
    fn stats_summarise_the_city() {
        let mut c = city().with_name("Hearth");
        c.add_resource(ResourceType::Gold, 12);
        c.spawn_unit(UnitType::Worker, Position::ORIGIN).unwrap();
        c.spawn_unit(UnitType::Soldier, Position::ORIGIN).unwrap();

        let stats = c.stats();
        assert_eq!(stats.name, "Hearth");
        assert_eq!(stats.population, 2);
        assert_eq!(stats.workers, 1);
        assert_eq!(stats.military_units, 1);
        assert_eq!(stats.power, 25);
        assert_eq!(stats.available_build_slots, 10);
        assert_eq!(stats.resources.get(&ResourceType::Gold), Some(&12));
    }
}
