//! Persistence gateway for city state.
//!
//! Each city is stored as one YAML record keyed by its owner's UUID. The
//! gateway never lets a storage failure escape: write errors are logged and
//! reported as `false`, unreadable records are logged and treated as absent.
//! The in-memory registry stays the source of truth either way.
//!
//! # Modules
//!
//! - [`record`] -- [`CityRecord`], the serialized form of a city, and its
//!   forward-compatible conversion back into a [`City`].
//! - [`repository`] -- The [`CityRepository`] trait the registry depends on.
//! - [`yaml_store`] -- [`YamlCityStore`], one file per player on disk.
//! - [`memory_store`] -- [`MemoryCityStore`], a RAM-backed store for tests and
//!   non-persistent runs.
//! - [`error`] -- [`StorageError`].
//!
//! [`City`]: rtsmod_city::City

pub mod error;
pub mod memory_store;
pub mod record;
pub mod repository;
pub mod yaml_store;

pub use error::StorageError;
pub use memory_store::MemoryCityStore;
pub use record::{BuildingRecord, CityRecord, LocationRecord, OrderRecord, UnitRecord};
pub use repository::{CityRepository, LoadedCities};
pub use yaml_store::{RECORD_EXTENSION, YamlCityStore};
