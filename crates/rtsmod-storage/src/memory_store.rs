//! A RAM-backed [`CityRepository`].
//!
//! Records are kept as encoded YAML text, so a save/load cycle exercises the
//! same encoding and decoding policy as [`YamlCityStore`](crate::YamlCityStore).

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use rtsmod_city::City;
use rtsmod_types::PlayerId;
use tracing::{error, warn};

use crate::record::CityRecord;
use crate::repository::{CityRepository, LoadedCities};

/// In-memory store of encoded city records.
#[derive(Debug, Default)]
pub struct MemoryCityStore {
    records: RwLock<BTreeMap<PlayerId, String>>,
    unavailable: AtomicBool,
}

impl MemoryCityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate storage going away (or coming back). While unavailable,
    /// saves fail and loads find nothing.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Store raw record text for `owner`, bypassing encoding.
    pub fn insert_raw(&self, owner: PlayerId, yaml: impl Into<String>) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(owner, yaml.into());
    }

    /// The raw record text stored for `owner`.
    pub fn raw(&self, owner: PlayerId) -> Option<String> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&owner)
            .cloned()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no record is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_unavailable(&self) -> bool {
        self.unavailable.load(Ordering::SeqCst)
    }

    fn decode(owner: PlayerId, yaml: &str) -> Result<Option<City>, serde_yml::Error> {
        if yaml.trim().is_empty() {
            return Ok(None);
        }
        let record = serde_yml::from_str::<Option<CityRecord>>(yaml)?;
        Ok(record.map(|r| r.into_city(owner)))
    }
}

impl CityRepository for MemoryCityStore {
    fn save(&self, city: &City) -> bool {
        if self.is_unavailable() {
            error!(owner = %city.owner(), "failed to save city: storage unavailable");
            return false;
        }
        match serde_yml::to_string(&CityRecord::from_city(city)) {
            Ok(yaml) => {
                self.insert_raw(city.owner(), yaml);
                true
            }
            Err(e) => {
                error!(owner = %city.owner(), error = %e, "failed to encode city");
                false
            }
        }
    }

    fn load(&self, owner: PlayerId) -> Option<City> {
        if self.is_unavailable() {
            warn!(%owner, "storage unavailable; treating city as absent");
            return None;
        }
        let yaml = self.raw(owner)?;
        match Self::decode(owner, &yaml) {
            Ok(city) => city,
            Err(e) => {
                warn!(%owner, error = %e, "failed to load city; treating as absent");
                None
            }
        }
    }

    fn load_all(&self) -> LoadedCities {
        let mut loaded = LoadedCities::default();
        if self.is_unavailable() {
            error!("storage unavailable; no cities loaded");
            return loaded;
        }
        let records = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for (owner, yaml) in records {
            match Self::decode(owner, &yaml) {
                Ok(Some(city)) => {
                    loaded.cities.insert(owner, city);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(%owner, error = %e, "skipping malformed city record");
                    loaded.skipped.push(PathBuf::from(owner.to_string()));
                }
            }
        }
        loaded
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rtsmod_types::{Position, ResourceType};

    use super::*;

    #[test]
    fn save_then_load_restores_city() {
        let store = MemoryCityStore::new();
        let owner = PlayerId::new();
        let mut city = City::new(owner, Position::new(4, 5, 6));
        city.add_resource(ResourceType::Stone, 12);

        assert!(store.save(&city));
        let loaded = store.load(owner).unwrap();
        assert_eq!(loaded.location(), Position::new(4, 5, 6));
        assert_eq!(loaded.get_resource(ResourceType::Stone), 12);
    }

    #[test]
    fn unavailable_store_fails_quietly() {
        let store = MemoryCityStore::new();
        let city = City::new(PlayerId::new(), Position::ORIGIN);
        store.set_unavailable(true);
        assert!(!store.save(&city));
        assert!(store.load(city.owner()).is_none());
        assert!(store.is_empty());

        store.set_unavailable(false);
        assert!(store.save(&city));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn malformed_record_is_skipped_by_load_all() {
        let store = MemoryCityStore::new();
        let good = City::new(PlayerId::new(), Position::ORIGIN);
        store.save(&good);
        store.insert_raw(PlayerId::new(), "resources: [oops");

        let loaded = store.load_all();
        assert_eq!(loaded.cities.len(), 1);
        assert!(loaded.cities.contains_key(&good.owner()));
        assert_eq!(loaded.skipped.len(), 1);
    }
}
