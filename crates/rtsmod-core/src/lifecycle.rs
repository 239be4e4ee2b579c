//! Wiring between the host's lifecycle events and the registry.
//!
//! The [`Coordinator`] owns the registry for the lifetime of a session:
//! [`Coordinator::on_start`] builds the store and registry and loads every
//! city, [`Coordinator::on_tick`] runs the periodic jobs, and
//! [`Coordinator::on_stop`] flushes everything and tears the registry down.
//!
//! # Periodic jobs
//!
//! Ticks are numbered from 1. Each tick advances construction by one, reaps
//! destroyed entities, and upgrades cities that qualify for their next level. Production, autosave, and sync run on ticks that
//! are a multiple of their configured interval; an interval of 0 disables
//! the job.

use std::path::Path;
use std::sync::Arc;

use rtsmod_storage::{CityRepository, YamlCityStore};
use rtsmod_types::PlayerId;
use tracing::{debug, info, warn};

use crate::config::TickConfig;
use crate::registry::{FlushReport, GameRegistry};
use crate::sync::SyncSink;

/// What one call to [`Coordinator::on_tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The tick number just run (0 if the coordinator is not started).
    pub tick: u64,
    /// Buildings whose construction finished this tick.
    pub completed_buildings: usize,
    /// Resource buildings that produced this tick.
    pub producing_buildings: u32,
    /// Buildings and units removed this tick.
    pub reaped: usize,
    /// Cities that gained a level this tick.
    pub upgraded: usize,
    /// Snapshots pushed to the sink this tick.
    pub synced: usize,
    /// Autosave outcome, if one ran.
    pub autosave: Option<FlushReport>,
}

/// Owns the registry between host start and stop.
#[derive(Debug)]
pub struct Coordinator {
    config: TickConfig,
    registry: Option<Arc<GameRegistry>>,
    tick: u64,
}

/// Whether a job with `interval` is due on `tick`.
fn is_due(tick: u64, interval: u64) -> bool {
    tick.checked_rem(interval) == Some(0)
}

impl Coordinator {
    /// Create a stopped coordinator.
    pub const fn new(config: TickConfig) -> Self {
        Self {
            config,
            registry: None,
            tick: 0,
        }
    }

    /// Open the YAML store under `world_root`, build the registry, and load
    /// every stored city.
    pub fn on_start(&mut self, world_root: &Path) -> Arc<GameRegistry> {
        let store = YamlCityStore::open(world_root);
        info!(root = %store.root().display(), "city storage opened");
        self.on_start_with(Arc::new(store))
    }

    /// Start with an explicit store.
    ///
    /// A coordinator that is already running is flushed and stopped first.
    pub fn on_start_with(&mut self, store: Arc<dyn CityRepository>) -> Arc<GameRegistry> {
        if self.registry.is_some() {
            warn!("coordinator started twice; restarting");
            self.on_stop();
        }
        let registry = Arc::new(GameRegistry::new(store));
        let loaded = registry.load_all();
        info!(cities = loaded, "registry started");
        self.registry = Some(Arc::clone(&registry));
        self.tick = 0;
        registry
    }

    /// Flush every city and drop the registry.
    ///
    /// Returns `None` if the coordinator was not running.
    pub fn on_stop(&mut self) -> Option<FlushReport> {
        let registry = self.registry.take()?;
        let report = registry.flush_all();
        info!(
            saved = report.saved,
            failed = report.failed,
            ticks = self.tick,
            "registry stopped"
        );
        Some(report)
    }

    /// The running registry.
    pub const fn registry(&self) -> Option<&Arc<GameRegistry>> {
        self.registry.as_ref()
    }

    /// Number of ticks run since start.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Whether the coordinator is between start and stop.
    pub const fn is_running(&self) -> bool {
        self.registry.is_some()
    }

    /// Run one tick of periodic jobs.
    ///
    /// `online` lists the players currently connected; only those with a
    /// city receive a snapshot.
    pub fn on_tick(&mut self, online: &[PlayerId], sink: &dyn SyncSink) -> TickReport {
        let Some(registry) = self.registry.as_ref().map(Arc::clone) else {
            return TickReport::default();
        };
        self.tick = self.tick.saturating_add(1);
        let tick = self.tick;

        let mut report = TickReport {
            tick,
            completed_buildings: registry.advance_construction(1),
            ..TickReport::default()
        };

        let reaped = registry.reap_destroyed();
        report.reaped = reaped.buildings.len().saturating_add(reaped.units.len());
        report.upgraded = registry.upgrade_ready_cities();

        if is_due(tick, self.config.production_interval_ticks) {
            report.producing_buildings =
                registry.produce_resources(self.config.production_per_building);
        }

        if is_due(tick, self.config.sync_interval_ticks) {
            for owner in online {
                if let Some(snapshot) = registry.snapshot(*owner) {
                    sink.push(&snapshot);
                    report.synced = report.synced.saturating_add(1);
                }
            }
            debug!(tick, synced = report.synced, "sync pushed");
        }

        if is_due(tick, self.config.autosave_interval_ticks) {
            let flush = registry.flush_all();
            debug!(tick, saved = flush.saved, failed = flush.failed, "autosave");
            report.autosave = Some(flush);
        }

        report
    }
}
