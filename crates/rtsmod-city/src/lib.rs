//! Resource ledger, entity catalog, and the city aggregate.
//!
//! This crate models one player's base: what it owns, what it has stockpiled,
//! and the rules for mutating both. It does no I/O.
//!
//! # Modules
//!
//! - [`ledger`] -- [`ResourceLedger`], the fixed per-type counter set with
//!   clamp-on-underflow subtraction.
//! - [`catalog`] -- Static blueprints for every building and unit kind.
//! - [`building`] -- Constructed buildings: health, construction progress.
//! - [`unit`] -- Mobile units: health, state, and the order queue.
//! - [`city`] -- [`City`], the aggregate enforcing intra-city invariants.
//! - [`error`] -- Error types for city operations.

pub mod building;
pub mod catalog;
pub mod city;
pub mod error;
pub mod ledger;
pub mod unit;

// Re-export primary types at crate root.
pub use building::Building;
pub use catalog::{BuildingBlueprint, UnitBlueprint, building_blueprint, unit_blueprint};
pub use city::{City, CityStats, MAX_LEVEL, Reaped};
pub use error::CityError;
pub use ledger::ResourceLedger;
pub use unit::{Order, Unit};
