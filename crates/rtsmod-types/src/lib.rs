//! Shared type definitions for the `RtsMod` city layer.
//!
//! This crate is the single source of truth for the identifiers, coordinates,
//! and closed enumerations used across the workspace.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for players and units
//! - [`enums`] -- Closed tag sets (resources, buildings, units, orders)
//! - [`position`] -- Integer block coordinates in the host world

pub mod enums;
pub mod ids;
pub mod position;

// Re-export all public types at crate root for convenience.
pub use enums::{BuildingType, OrderType, ParseTagError, ResourceType, UnitState, UnitType};
pub use ids::{ParseIdError, PlayerId, UnitId};
pub use position::Position;
