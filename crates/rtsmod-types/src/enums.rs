//! Closed enumerations shared across the workspace.
//!
//! Every tag set here is fixed at compile time. Each type has a canonical
//! upper-case name (used in YAML records and console commands) and a
//! human-readable display name. Parsing is case-insensitive.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string names no variant of a tag set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {input}")]
pub struct ParseTagError {
    /// Which tag set was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub input: String,
}

/// Implements `ALL`, `name`, `display_name`, `Display` and `FromStr` for a
/// fieldless enum from a `(Variant, "NAME", "Display")` table.
macro_rules! tag_set {
    ($ty:ident, $kind:literal, [$(($variant:ident, $name:literal, $display:literal)),+ $(,)?]) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical upper-case name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }

            /// Human-readable name.
            pub const fn display_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $display),+
                }
            }
        }

        impl core::fmt::Display for $ty {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = ParseTagError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ParseTagError {
                        kind: $kind,
                        input: s.to_owned(),
                    })
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A resource category held in a city's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    /// Currency.
    Gold,
    /// Lumber.
    Wood,
    /// Quarried stone.
    Stone,
    /// Food for training units.
    Food,
}

tag_set!(ResourceType, "resource type", [
    (Gold, "GOLD", "Gold"),
    (Wood, "WOOD", "Wood"),
    (Stone, "STONE", "Stone"),
    (Food, "FOOD", "Food"),
]);

impl ResourceType {
    /// Number of resource categories.
    pub const COUNT: usize = 4;

    /// Dense index of this category, in `0..COUNT`.
    pub const fn index(self) -> usize {
        match self {
            Self::Gold => 0,
            Self::Wood => 1,
            Self::Stone => 2,
            Self::Food => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

/// A kind of building a city can construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingType {
    /// The city's main building; trains workers.
    TownCenter,
    /// Trains military units.
    Barracks,
    /// Produces wood and stone over time.
    ResourceBuilding,
    /// Defensive structure.
    Tower,
    /// Extra resource storage.
    Storage,
}

tag_set!(BuildingType, "building type", [
    (TownCenter, "TOWN_CENTER", "Town Center"),
    (Barracks, "BARRACKS", "Barracks"),
    (ResourceBuilding, "RESOURCE_BUILDING", "Resource Building"),
    (Tower, "TOWER", "Tower"),
    (Storage, "STORAGE", "Storage"),
]);

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// A kind of mobile unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    /// Gathers resources and constructs buildings.
    Worker,
    /// Melee combat unit.
    Soldier,
    /// Long-range combat unit.
    RangedUnit,
}

tag_set!(UnitType, "unit type", [
    (Worker, "WORKER", "Worker"),
    (Soldier, "SOLDIER", "Soldier"),
    (RangedUnit, "RANGED_UNIT", "Ranged Unit"),
]);

/// What a unit is currently doing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitState {
    /// Waiting for orders.
    #[default]
    Idle,
    /// Walking toward a target.
    Moving,
    /// Engaging a target.
    Attacking,
    /// Collecting resources.
    Gathering,
    /// Working on a construction site.
    Building,
    /// Health reached zero.
    Dead,
}

tag_set!(UnitState, "unit state", [
    (Idle, "IDLE", "Idle"),
    (Moving, "MOVING", "Moving"),
    (Attacking, "ATTACKING", "Attacking"),
    (Gathering, "GATHERING", "Gathering"),
    (Building, "BUILDING", "Building"),
    (Dead, "DEAD", "Dead"),
]);

/// The kind of an order queued on a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Move to a position.
    Move,
    /// Attack whatever is at a position.
    Attack,
    /// Gather resources at a position.
    Gather,
    /// Build at a position.
    Build,
    /// Drop all orders and go idle.
    Stop,
}

tag_set!(OrderType, "order type", [
    (Move, "MOVE", "Move"),
    (Attack, "ATTACK", "Attack"),
    (Gather, "GATHER", "Gather"),
    (Build, "BUILD", "Build"),
    (Stop, "STOP", "Stop"),
]);
