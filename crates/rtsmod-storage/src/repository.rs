//! The storage seam the registry depends on.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rtsmod_city::City;
use rtsmod_types::PlayerId;

/// Result of enumerating every stored city.
#[derive(Debug, Default)]
pub struct LoadedCities {
    /// Cities that decoded successfully, keyed by owner.
    pub cities: BTreeMap<PlayerId, City>,
    /// Record entries that were present but skipped (bad name or malformed).
    pub skipped: Vec<PathBuf>,
}

/// Durable storage for city records.
///
/// Implementations never propagate failures: they log them and return the
/// failure signal of the method (`false` or `None`). Re-saving a city
/// overwrites its record in place.
pub trait CityRepository: Send + Sync {
    /// Write the full record for `city`, replacing any previous record.
    ///
    /// Returns `false` if the write failed.
    fn save(&self, city: &City) -> bool;

    /// Read the record for `owner`.
    ///
    /// Returns `None` if no record exists or the record is malformed.
    fn load(&self, owner: PlayerId) -> Option<City>;

    /// Read every record whose key is a valid player identity.
    fn load_all(&self) -> LoadedCities;
}
