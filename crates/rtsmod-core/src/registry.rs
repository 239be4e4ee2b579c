//! The authoritative in-memory game state.
//!
//! [`GameRegistry`] maps each player to their [`City`] and keeps a unit index
//! (unit id → owner) so units can be resolved without knowing their owner.
//! Every other subsystem goes through the registry; nothing else holds city
//! state.
//!
//! # Locking
//!
//! The top-level maps sit behind [`RwLock`]s and tolerate concurrent readers
//! and writers. Each city is shared as a [`CityHandle`] with its own lock, so
//! one player's commands never block another's. Lock order is always
//! `cities` → `units` → a single city; no operation holds two city locks at
//! once. Poisoned locks are recovered rather than propagated.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rtsmod_city::{Building, City, CityError, CityStats, Reaped, Unit};
use rtsmod_storage::CityRepository;
use rtsmod_types::{BuildingType, PlayerId, Position, ResourceType, UnitId, UnitType};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::sync::CitySnapshot;

/// Shared handle to one city.
pub type CityHandle = Arc<RwLock<City>>;

/// Lock a city for reading, recovering from poisoning.
pub fn read_city(handle: &CityHandle) -> RwLockReadGuard<'_, City> {
    handle.read().unwrap_or_else(PoisonError::into_inner)
}

/// Lock a city for writing, recovering from poisoning.
pub fn write_city(handle: &CityHandle) -> RwLockWriteGuard<'_, City> {
    handle.write().unwrap_or_else(PoisonError::into_inner)
}

/// Errors from registry operations that target a specific city or unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The player has no city.
    #[error("no city for player {0}")]
    CityNotFound(PlayerId),

    /// No city holds the unit.
    #[error("unit not found: {0}")]
    UnitNotFound(UnitId),

    /// The city rejected the operation.
    #[error(transparent)]
    City(#[from] CityError),
}

/// Aggregate counts across every city.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GameStats {
    /// Number of cities.
    pub cities: usize,
    /// Buildings across all cities.
    pub buildings: usize,
    /// Units across all cities.
    pub units: usize,
}

/// Outcome of [`GameRegistry::flush_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Cities written successfully.
    pub saved: usize,
    /// Cities whose write failed.
    pub failed: usize,
}

/// Process-wide map of player → city.
pub struct GameRegistry {
    store: Arc<dyn CityRepository>,
    cities: RwLock<BTreeMap<PlayerId, CityHandle>>,
    units: RwLock<BTreeMap<UnitId, PlayerId>>,
}

impl core::fmt::Debug for GameRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameRegistry")
            .field("cities", &self.city_count())
            .field("units", &self.unit_count())
            .finish_non_exhaustive()
    }
}

impl GameRegistry {
    /// Create an empty registry persisting through `store`.
    pub fn new(store: Arc<dyn CityRepository>) -> Self {
        Self {
            store,
            cities: RwLock::new(BTreeMap::new()),
            units: RwLock::new(BTreeMap::new()),
        }
    }

    fn cities_read(&self) -> RwLockReadGuard<'_, BTreeMap<PlayerId, CityHandle>> {
        self.cities.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn cities_write(&self) -> RwLockWriteGuard<'_, BTreeMap<PlayerId, CityHandle>> {
        self.cities.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn units_read(&self) -> RwLockReadGuard<'_, BTreeMap<UnitId, PlayerId>> {
        self.units.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn units_write(&self) -> RwLockWriteGuard<'_, BTreeMap<UnitId, PlayerId>> {
        self.units.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every city handle, cloned out so no map lock is held while cities are
    /// visited.
    fn handles(&self) -> Vec<CityHandle> {
        self.cities_read().values().cloned().collect()
    }

    fn require_city(&self, owner: PlayerId) -> Result<CityHandle, RegistryError> {
        self.get_city(owner)
            .ok_or(RegistryError::CityNotFound(owner))
    }

    // -----------------------------------------------------------------------
    // Cities
    // -----------------------------------------------------------------------

    /// Return the city of `owner`, founding it at `location` if none exists.
    ///
    /// An existing city is returned unchanged (same handle, same location).
    /// A new city starts with an empty ledger and is persisted immediately;
    /// a failed write is logged and the city stays registered.
    pub fn create_city(&self, owner: PlayerId, location: Position) -> CityHandle {
        let handle = {
            let mut cities = self.cities_write();
            if let Some(existing) = cities.get(&owner) {
                debug!(%owner, "city already exists");
                return Arc::clone(existing);
            }
            let handle = Arc::new(RwLock::new(City::new(owner, location)));
            cities.insert(owner, Arc::clone(&handle));
            handle
        };

        info!(%owner, %location, "city founded");
        self.store.save(&read_city(&handle));
        handle
    }

    /// The city of `owner`, if any. Never creates one.
    pub fn get_city(&self, owner: PlayerId) -> Option<CityHandle> {
        self.cities_read().get(&owner).cloned()
    }

    /// The first city, in owner order, whose name matches `name` ignoring
    /// case.
    pub fn find_city_by_name(&self, name: &str) -> Option<CityHandle> {
        let wanted = name.trim().to_lowercase();
        self.handles()
            .into_iter()
            .find(|handle| read_city(handle).name().to_lowercase() == wanted)
    }

    /// Every player that owns a city, in id order.
    pub fn players(&self) -> Vec<PlayerId> {
        self.cities_read().keys().copied().collect()
    }

    /// Number of cities.
    pub fn city_count(&self) -> usize {
        self.cities_read().len()
    }

    /// Number of indexed units.
    pub fn unit_count(&self) -> usize {
        self.units_read().len()
    }

    /// Counts across every city.
    pub fn stats(&self) -> GameStats {
        let handles = self.handles();
        let mut stats = GameStats {
            cities: handles.len(),
            ..GameStats::default()
        };
        for handle in &handles {
            let city = read_city(handle);
            stats.buildings = stats.buildings.saturating_add(city.buildings().len());
            stats.units = stats.units.saturating_add(city.units().len());
        }
        stats
    }

    /// Replace the in-memory state with everything the store holds.
    ///
    /// Returns the number of cities loaded. Skipped records are already
    /// logged by the store.
    pub fn load_all(&self) -> usize {
        let loaded = self.store.load_all();
        let mut cities = BTreeMap::new();
        let mut units = BTreeMap::new();
        for (owner, city) in loaded.cities {
            for id in city.units().keys() {
                units.insert(*id, owner);
            }
            cities.insert(owner, Arc::new(RwLock::new(city)));
        }
        let count = cities.len();

        let mut city_map = self.cities_write();
        let mut unit_map = self.units_write();
        *city_map = cities;
        *unit_map = units;

        info!(
            cities = count,
            units = unit_map.len(),
            skipped = loaded.skipped.len(),
            "game state loaded"
        );
        count
    }

    /// Persist every city unconditionally.
    pub fn flush_all(&self) -> FlushReport {
        let mut report = FlushReport::default();
        for handle in self.handles() {
            if self.store.save(&read_city(&handle)) {
                report.saved = report.saved.saturating_add(1);
            } else {
                report.failed = report.failed.saturating_add(1);
            }
        }
        if report.failed > 0 {
            warn!(saved = report.saved, failed = report.failed, "flush incomplete");
        } else {
            info!(saved = report.saved, "all cities flushed");
        }
        report
    }

    /// Persist one city.
    ///
    /// Returns whether the write succeeded.
    pub fn save_city(&self, owner: PlayerId) -> Result<bool, RegistryError> {
        let handle = self.require_city(owner)?;
        let saved = self.store.save(&read_city(&handle));
        Ok(saved)
    }

    /// Summary figures for `owner`'s city.
    pub fn city_stats(&self, owner: PlayerId) -> Option<CityStats> {
        self.get_city(owner).map(|handle| read_city(&handle).stats())
    }

    /// A read-only copy of `owner`'s city.
    pub fn snapshot(&self, owner: PlayerId) -> Option<CitySnapshot> {
        self.get_city(owner)
            .map(|handle| CitySnapshot::from(&*read_city(&handle)))
    }

    // -----------------------------------------------------------------------
    // Resources and buildings
    // -----------------------------------------------------------------------

    /// Add `amount` of `resource` to `owner`'s ledger.
    ///
    /// Returns the new amount.
    pub fn add_resource(
        &self,
        owner: PlayerId,
        resource: ResourceType,
        amount: u32,
    ) -> Result<u32, RegistryError> {
        let handle = self.require_city(owner)?;
        let mut city = write_city(&handle);
        city.add_resource(resource, amount);
        Ok(city.get_resource(resource))
    }

    /// Start a paid construction in `owner`'s city.
    pub fn construct(
        &self,
        owner: PlayerId,
        building_type: BuildingType,
        position: Position,
    ) -> Result<Building, RegistryError> {
        let handle = self.require_city(owner)?;
        let mut city = write_city(&handle);
        let building = city.construct(building_type, position)?;
        Ok(building.clone())
    }

    /// Advance every construction site in every city by `delta` ticks.
    ///
    /// Returns the number of buildings completed.
    pub fn advance_construction(&self, delta: u32) -> usize {
        let mut completed: usize = 0;
        for handle in self.handles() {
            let mut city = write_city(&handle);
            let done = city.advance_construction(delta);
            for position in &done {
                debug!(owner = %city.owner(), %position, "construction complete");
            }
            completed = completed.saturating_add(done.len());
        }
        completed
    }

    /// Credit each producing resource building with `per_building` WOOD and
    /// STONE.
    ///
    /// Returns the number of buildings that produced.
    pub fn produce_resources(&self, per_building: u32) -> u32 {
        let mut producing: u32 = 0;
        for handle in self.handles() {
            let mut city = write_city(&handle);
            let count = city.producing_buildings();
            if count == 0 {
                continue;
            }
            let yield_amount = per_building.saturating_mul(count);
            city.add_resource(ResourceType::Wood, yield_amount);
            city.add_resource(ResourceType::Stone, yield_amount);
            producing = producing.saturating_add(count);
        }
        producing
    }

    // -----------------------------------------------------------------------
    // Progression
    // -----------------------------------------------------------------------

    /// Rename `owner`'s city.
    ///
    /// Returns whether the name changed.
    pub fn rename_city(&self, owner: PlayerId, name: &str) -> Result<bool, RegistryError> {
        let handle = self.require_city(owner)?;
        let mut city = write_city(&handle);
        let renamed = city.rename(name);
        if renamed {
            info!(%owner, name = city.name(), "city renamed");
        }
        Ok(renamed)
    }

    /// Raise `owner`'s city one level.
    ///
    /// Returns the new level.
    pub fn upgrade_city(&self, owner: PlayerId) -> Result<u32, RegistryError> {
        let handle = self.require_city(owner)?;
        let level = write_city(&handle).upgrade()?;
        info!(%owner, level, "city upgraded");
        Ok(level)
    }

    /// Upgrade every city that meets its next level's requirements.
    ///
    /// Returns the number of cities upgraded.
    pub fn upgrade_ready_cities(&self) -> usize {
        let mut upgraded: usize = 0;
        for handle in self.handles() {
            let mut city = write_city(&handle);
            if let Ok(level) = city.upgrade() {
                info!(owner = %city.owner(), level, "city upgraded");
                upgraded = upgraded.saturating_add(1);
            }
        }
        upgraded
    }

    // -----------------------------------------------------------------------
    // Units
    // -----------------------------------------------------------------------

    /// Create a free unit in `owner`'s city and index it.
    pub fn spawn_unit(
        &self,
        owner: PlayerId,
        unit_type: UnitType,
        position: Position,
    ) -> Result<UnitId, RegistryError> {
        let handle = self.require_city(owner)?;
        let id = write_city(&handle).spawn_unit(unit_type, position)?;
        self.units_write().insert(id, owner);
        debug!(%owner, unit = %id, %unit_type, "unit spawned");
        Ok(id)
    }

    /// Train a paid unit in `owner`'s city and index it.
    pub fn train_unit(
        &self,
        owner: PlayerId,
        unit_type: UnitType,
        position: Position,
    ) -> Result<UnitId, RegistryError> {
        let handle = self.require_city(owner)?;
        let id = write_city(&handle).train_unit(unit_type, position)?;
        self.units_write().insert(id, owner);
        debug!(%owner, unit = %id, %unit_type, "unit trained");
        Ok(id)
    }

    /// Owner of the unit with `id`.
    pub fn unit_owner(&self, id: UnitId) -> Option<PlayerId> {
        self.units_read().get(&id).copied()
    }

    /// A copy of the unit with `id`.
    pub fn get_unit(&self, id: UnitId) -> Option<Unit> {
        let owner = self.unit_owner(id)?;
        let handle = self.get_city(owner)?;
        let city = read_city(&handle);
        city.unit(id).cloned()
    }

    /// Apply `f` to the unit with `id`.
    pub fn with_unit_mut<R>(
        &self,
        id: UnitId,
        f: impl FnOnce(&mut Unit) -> R,
    ) -> Result<R, RegistryError> {
        let owner = self.unit_owner(id).ok_or(RegistryError::UnitNotFound(id))?;
        let handle = self.require_city(owner)?;
        let mut city = write_city(&handle);
        let unit = city.unit_mut(id).ok_or(RegistryError::UnitNotFound(id))?;
        Ok(f(unit))
    }

    /// Remove the unit with `id` from its city and the index.
    pub fn remove_unit(&self, id: UnitId) -> Option<Unit> {
        let owner = self.units_write().remove(&id)?;
        let handle = self.get_city(owner)?;
        write_city(&handle).remove_unit(id)
    }

    /// Remove destroyed buildings and dead units from every city.
    pub fn reap_destroyed(&self) -> Reaped {
        let mut total = Reaped::default();
        for handle in self.handles() {
            let reaped = write_city(&handle).reap_destroyed();
            if !reaped.units.is_empty() {
                let mut index = self.units_write();
                for unit in &reaped.units {
                    index.remove(&unit.id());
                }
            }
            total.buildings.extend(reaped.buildings);
            total.units.extend(reaped.units);
        }
        total
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rtsmod_storage::MemoryCityStore;

    use super::*;

    fn registry() -> (Arc<MemoryCityStore>, GameRegistry) {
        let store = Arc::new(MemoryCityStore::new());
        let registry = GameRegistry::new(Arc::clone(&store) as Arc<dyn CityRepository>);
        (store, registry)
    }

    #[test]
    fn create_city_is_idempotent() {
        let (store, registry) = registry();
        let owner = PlayerId::new();
        let first = registry.create_city(owner, Position::new(1, 2, 3));
        let second = registry.create_city(owner, Position::new(9, 9, 9));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(read_city(&second).location(), Position::new(1, 2, 3));
        assert_eq!(registry.city_count(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn create_city_persists_immediately() {
        let (store, registry) = registry();
        let owner = PlayerId::new();
        registry.create_city(owner, Position::new(10, 64, -5));
        let stored = store.load(owner).unwrap();
        assert_eq!(stored.location(), Position::new(10, 64, -5));
        assert!(stored.resources().is_empty());
    }

    #[test]
    fn create_city_survives_storage_failure() {
        let (store, registry) = registry();
        store.set_unavailable(true);
        let owner = PlayerId::new();
        registry.create_city(owner, Position::ORIGIN);
        assert!(registry.get_city(owner).is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn get_city_never_creates() {
        let (_, registry) = registry();
        assert!(registry.get_city(PlayerId::new()).is_none());
        assert_eq!(registry.city_count(), 0);
    }

    #[test]
    fn add_resource_requires_a_city() {
        let (_, registry) = registry();
        let owner = PlayerId::new();
        assert_eq!(
            registry.add_resource(owner, ResourceType::Gold, 5),
            Err(RegistryError::CityNotFound(owner))
        );

        registry.create_city(owner, Position::ORIGIN);
        assert_eq!(registry.add_resource(owner, ResourceType::Gold, 5), Ok(5));
        assert_eq!(registry.add_resource(owner, ResourceType::Gold, 7), Ok(12));
    }

    #[test]
    fn load_all_replaces_state() {
        let (store, registry) = registry();
        let kept = PlayerId::new();
        let mut city = City::new(kept, Position::new(4, 5, 6));
        let unit = city.spawn_unit(UnitType::Worker, Position::ORIGIN).unwrap();
        store.save(&city);

        let dropped = PlayerId::new();
        store.set_unavailable(true);
        registry.create_city(dropped, Position::ORIGIN);
        store.set_unavailable(false);

        assert_eq!(registry.load_all(), 1);
        assert!(registry.get_city(dropped).is_none());
        assert!(registry.get_city(kept).is_some());
        assert_eq!(registry.unit_owner(unit), Some(kept));
    }

    #[test]
    fn flush_all_reports_failures() {
        let (store, registry) = registry();
        registry.create_city(PlayerId::new(), Position::ORIGIN);
        registry.create_city(PlayerId::new(), Position::ORIGIN);

        assert_eq!(
            registry.flush_all(),
            FlushReport {
                saved: 2,
                failed: 0
            }
        );
        store.set_unavailable(true);
        assert_eq!(
            registry.flush_all(),
            FlushReport {
                saved: 0,
                failed: 2
            }
        );
    }

    #[test]
    fn unit_index_follows_spawn_and_remove() {
        let (_, registry) = registry();
        let owner = PlayerId::new();
        registry.create_city(owner, Position::ORIGIN);

        let id = registry
            .spawn_unit(owner, UnitType::Soldier, Position::new(1, 0, 1))
            .unwrap();
        assert_eq!(registry.unit_count(), 1);
        assert_eq!(registry.get_unit(id).unwrap().unit_type(), UnitType::Soldier);

        let removed = registry.remove_unit(id).unwrap();
        assert_eq!(removed.id(), id);
        assert!(registry.get_unit(id).is_none());
        assert_eq!(registry.unit_count(), 0);
        assert!(registry.remove_unit(id).is_none());
    }

    #[test]
    fn train_unit_spends_resources() {
        let (_, registry) = registry();
        let owner = PlayerId::new();
        registry.create_city(owner, Position::ORIGIN);

        let result = registry.train_unit(owner, UnitType::Worker, Position::ORIGIN);
        assert_eq!(
            result,
            Err(RegistryError::City(CityError::CannotAffordUnit(
                UnitType::Worker
            )))
        );
        assert_eq!(registry.unit_count(), 0);

        registry.add_resource(owner, ResourceType::Food, 60).unwrap();
        registry
            .train_unit(owner, UnitType::Worker, Position::ORIGIN)
            .unwrap();
        let city = registry.get_city(owner).unwrap();
        assert_eq!(read_city(&city).get_resource(ResourceType::Food), 10);
    }

    #[test]
    fn reap_destroyed_clears_unit_index() {
        let (_, registry) = registry();
        let owner = PlayerId::new();
        registry.create_city(owner, Position::ORIGIN);
        let doomed = registry
            .spawn_unit(owner, UnitType::Worker, Position::ORIGIN)
            .unwrap();
        let survivor = registry
            .spawn_unit(owner, UnitType::Worker, Position::ORIGIN)
            .unwrap();

        registry.with_unit_mut(doomed, |u| u.damage(1_000)).unwrap();
        let reaped = registry.reap_destroyed();

        assert_eq!(reaped.units.len(), 1);
        assert!(registry.get_unit(doomed).is_none());
        assert!(registry.get_unit(survivor).is_some());
        assert_eq!(registry.unit_count(), 1);
    }

    #[test]
    fn production_credits_completed_resource_buildings() {
        let (_, registry) = registry();
        let owner = PlayerId::new();
        let handle = registry.create_city(owner, Position::ORIGIN);
        {
            let mut city = write_city(&handle);
            let blueprint = rtsmod_city::building_blueprint(BuildingType::ResourceBuilding);
            city.add_building(blueprint.instantiate(owner, Position::new(1, 0, 0)));
            city.add_building(blueprint.instantiate(owner, Position::new(2, 0, 0)));
            city.add_building(
                blueprint
                    .instantiate(owner, Position::new(3, 0, 0))
                    .with_construction(0),
            );
        }

        assert_eq!(registry.produce_resources(2), 2);
        let city = read_city(&handle);
        assert_eq!(city.get_resource(ResourceType::Wood), 4);
        assert_eq!(city.get_resource(ResourceType::Stone), 4);
        assert_eq!(city.get_resource(ResourceType::Gold), 0);
    }

    #[test]
    fn construction_advances_to_completion() {
        let (_, registry) = registry();
        let owner = PlayerId::new();
        registry.create_city(owner, Position::ORIGIN);
        registry.add_resource(owner, ResourceType::Wood, 80).unwrap();
        registry
            .construct(owner, BuildingType::Storage, Position::new(5, 0, 5))
            .unwrap();

        assert_eq!(registry.advance_construction(100), 0);
        assert_eq!(registry.advance_construction(50), 1);
        assert_eq!(registry.stats().buildings, 1);
    }

    #[test]
    fn stats_count_everything() {
        let (_, registry) = registry();
        let a = PlayerId::new();
        let b = PlayerId::new();
        registry.create_city(a, Position::ORIGIN);
        registry.create_city(b, Position::ORIGIN);
        registry.spawn_unit(a, UnitType::Worker, Position::ORIGIN).unwrap();
        registry.spawn_unit(b, UnitType::Worker, Position::ORIGIN).unwrap();
        registry.spawn_unit(b, UnitType::RangedUnit, Position::ORIGIN).unwrap();

        assert_eq!(
            registry.stats(),
            GameStats {
                cities: 2,
                buildings: 0,
                units: 3
            }
        );
    }

    #[test]
    fn concurrent_create_city_yields_one_handle() {
        let (store, registry) = registry();
        let owner = PlayerId::new();
        let others: Vec<PlayerId> = (0..4).map(|_| PlayerId::new()).collect();

        let handles: Vec<CityHandle> = std::thread::scope(|scope| {
            let founders: Vec<_> = (0..8)
                .map(|i| {
                    let registry = &registry;
                    scope.spawn(move || registry.create_city(owner, Position::new(i, 0, 0)))
                })
                .collect();
            for other in &others {
                let registry = &registry;
                scope.spawn(move || {
                    registry.create_city(*other, Position::ORIGIN);
                });
            }
            let observer = {
                let registry = &registry;
                scope.spawn(move || {
                    for _ in 0..100 {
                        let stats = registry.stats();
                        assert!(stats.cities <= 5);
                        for player in registry.players() {
                            assert!(registry.get_city(player).is_some());
                        }
                    }
                })
            };
            observer.join().unwrap();
            founders.into_iter().map(|f| f.join().unwrap()).collect()
        });

        let first = handles.first().unwrap();
        assert!(handles.iter().all(|h| Arc::ptr_eq(first, h)));
        assert_eq!(registry.city_count(), 5);
        assert_eq!(registry.players().len(), 5);
        assert!(store.load(owner).is_some());
    }

    #[test]
    fn find_city_by_name_ignores_case() {
        let (_, registry) = registry();
        let owner = PlayerId::new();
        registry.create_city(owner, Position::ORIGIN);
        registry.create_city(PlayerId::new(), Position::ORIGIN);

        assert!(registry.rename_city(owner, "Ironforge").unwrap());
        let found = registry.find_city_by_name("IRONFORGE").unwrap();
        assert_eq!(read_city(&found).owner(), owner);
        assert!(registry.find_city_by_name("Atlantis").is_none());
        assert!(matches!(
            registry.rename_city(PlayerId::new(), "Nowhere"),
            Err(RegistryError::CityNotFound(_))
        ));
    }

    #[test]
    fn upgrade_city_reports_missing_requirements() {
        let (_, registry) = registry();
        let owner = PlayerId::new();
        registry.create_city(owner, Position::ORIGIN);

        assert!(matches!(
            registry.upgrade_city(owner),
            Err(RegistryError::City(CityError::UpgradeNotReady { level: 1, .. }))
        ));
        assert_eq!(registry.upgrade_ready_cities(), 0);
        assert_eq!(registry.city_stats(owner).unwrap().level, 1);
    }

    #[test]
    fn ready_cities_upgrade_once_per_pass() {
        let (_, registry) = registry();
        let owner = PlayerId::new();
        let handle = registry.create_city(owner, Position::ORIGIN);
        {
            let mut city = write_city(&handle);
            let tower = rtsmod_city::building_blueprint(BuildingType::Tower);
            for x in 0..10 {
                city.add_building(tower.instantiate(owner, Position::new(x, 0, 0)));
            }
        }
        for _ in 0..9 {
            registry
                .spawn_unit(owner, UnitType::RangedUnit, Position::ORIGIN)
                .unwrap();
        }

        // 10 towers (750) + 9 ranged (270): enough for level 2, not level 3.
        assert_eq!(registry.upgrade_ready_cities(), 1);
        assert_eq!(registry.upgrade_ready_cities(), 0);
        let stats = registry.city_stats(owner).unwrap();
        assert_eq!(stats.level, 2);
        assert_eq!(stats.max_population, 120);
        assert_eq!(stats.power, 1_020);
    }
}
