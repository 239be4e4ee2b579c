//! One YAML file per player under `<world_root>/rtsmod/cities/`.
//!
//! Record files are named `<uuid>.yml`. Writes go to a sibling `.tmp` file
//! that is then renamed over the record, so a crash mid-write leaves the
//! previous record intact. The `.tmp` suffix keeps half-written files out of
//! [`YamlCityStore::load_all`].

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rtsmod_city::City;
use rtsmod_types::PlayerId;
use tracing::{debug, error, info, warn};

use crate::error::StorageError;
use crate::record::CityRecord;
use crate::repository::{CityRepository, LoadedCities};

/// File extension of city records.
pub const RECORD_EXTENSION: &str = "yml";

/// Directory under the world root that holds this layer's data.
const DATA_DIR: &str = "rtsmod";

/// Directory under [`DATA_DIR`] that holds city records.
const CITIES_DIR: &str = "cities";

/// File-backed [`CityRepository`].
#[derive(Debug, Clone)]
pub struct YamlCityStore {
    root: PathBuf,
}

impl YamlCityStore {
    /// Open the store rooted at `<world_root>/rtsmod/cities`, creating the
    /// directories if needed.
    ///
    /// Failure to create them is logged, not fatal: later saves and loads
    /// will fail individually.
    pub fn open(world_root: &Path) -> Self {
        let root = world_root.join(DATA_DIR).join(CITIES_DIR);
        match fs::create_dir_all(&root) {
            Ok(()) => debug!(root = %root.display(), "city storage ready"),
            Err(e) => error!(
                root = %root.display(),
                error = %e,
                "could not create city storage directory"
            ),
        }
        Self { root }
    }

    /// Directory holding the record files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record for `owner`.
    pub fn record_path(&self, owner: PlayerId) -> PathBuf {
        self.root.join(format!("{owner}.{RECORD_EXTENSION}"))
    }

    /// Encode and write the record for `city`, replacing the previous one.
    pub fn write_record(&self, city: &City) -> Result<(), StorageError> {
        let path = self.record_path(city.owner());
        let yaml = serde_yml::to_string(&CityRecord::from_city(city))
            .map_err(|e| StorageError::yaml(&path, e))?;

        let tmp = path.with_extension(format!("{RECORD_EXTENSION}.tmp"));
        if let Err(e) = fs::write(&tmp, yaml) {
            return Err(StorageError::io(tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            fs::remove_file(&tmp).ok();
            return Err(StorageError::io(path, e));
        }
        Ok(())
    }

    /// Read and decode the record for `owner`.
    ///
    /// Returns `Ok(None)` if the file does not exist or holds an empty
    /// document.
    pub fn read_record(&self, owner: PlayerId) -> Result<Option<CityRecord>, StorageError> {
        read_record_at(&self.record_path(owner))
    }

    /// Copy every record into a fresh `backup_<timestamp>` directory next to
    /// the cities directory.
    ///
    /// Returns the backup directory and the number of records copied.
    pub fn backup(&self) -> Result<(PathBuf, usize), StorageError> {
        let parent = self.root.parent().unwrap_or(&self.root);
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%3f");
        let dest = parent.join(format!("backup_{stamp}"));
        fs::create_dir_all(&dest).map_err(|e| StorageError::io(&dest, e))?;

        let mut copied: usize = 0;
        for path in self.record_files()? {
            let Some(name) = path.file_name() else {
                continue;
            };
            fs::copy(&path, dest.join(name)).map_err(|e| StorageError::io(&path, e))?;
            copied = copied.saturating_add(1);
        }
        info!(dest = %dest.display(), copied, "city records backed up");
        Ok((dest, copied))
    }

    /// Every `*.yml` entry in the storage directory.
    fn record_files(&self) -> Result<Vec<PathBuf>, StorageError> {
        let entries = fs::read_dir(&self.root).map_err(|e| StorageError::io(&self.root, e))?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == RECORD_EXTENSION))
            .collect();
        files.sort();
        Ok(files)
    }
}

fn read_record_at(path: &Path) -> Result<Option<CityRecord>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    if contents.trim().is_empty() {
        return Ok(None);
    }
    serde_yml::from_str::<Option<CityRecord>>(&contents).map_err(|e| StorageError::yaml(path, e))
}

/// Extract the owner identity from a record file name.
///
/// Only the canonical lowercase hyphenated form is accepted, so each owner
/// maps to exactly one file.
fn owner_from_path(path: &Path) -> Result<PlayerId, StorageError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| {
            stem.parse::<PlayerId>()
                .ok()
                .filter(|owner| owner.to_string() == stem)
        })
        .ok_or_else(|| StorageError::InvalidFileName(path.to_path_buf()))
}

impl CityRepository for YamlCityStore {
    fn save(&self, city: &City) -> bool {
        match self.write_record(city) {
            Ok(()) => {
                debug!(owner = %city.owner(), "city saved");
                true
            }
            Err(e) => {
                error!(owner = %city.owner(), error = %e, "failed to save city");
                false
            }
        }
    }

    fn load(&self, owner: PlayerId) -> Option<City> {
        match self.read_record(owner) {
            Ok(record) => record.map(|r| r.into_city(owner)),
            Err(e) => {
                warn!(%owner, error = %e, "failed to load city; treating as absent");
                None
            }
        }
    }

    fn load_all(&self) -> LoadedCities {
        let mut loaded = LoadedCities::default();
        let files = match self.record_files() {
            Ok(files) => files,
            Err(e) => {
                error!(error = %e, "could not enumerate city records");
                return loaded;
            }
        };

        for path in files {
            let owner = match owner_from_path(&path) {
                Ok(owner) => owner,
                Err(e) => {
                    warn!(error = %e, "skipping city record");
                    loaded.skipped.push(path);
                    continue;
                }
            };
            match read_record_at(&path) {
                Ok(Some(record)) => {
                    loaded.cities.insert(owner, record.into_city(owner));
                }
                Ok(None) => debug!(%owner, "empty city record"),
                Err(e) => {
                    warn!(%owner, error = %e, "skipping malformed city record");
                    loaded.skipped.push(path);
                }
            }
        }

        info!(
            loaded = loaded.cities.len(),
            skipped = loaded.skipped.len(),
            "city records loaded"
        );
        loaded
    }
}
