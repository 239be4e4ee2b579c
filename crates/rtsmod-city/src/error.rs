//! Error types for the `rtsmod-city` crate.
//!
//! Only the strict operations ([`City::construct`], [`City::train_unit`],
//! [`City::add_unit`], [`City::upgrade`]) can fail. The permissive ones (`add_building`,
//! `remove_building`, ledger subtraction) never return errors.
//!
//! [`City::construct`]: crate::City::construct
//! [`City::train_unit`]: crate::City::train_unit
//! [`City::add_unit`]: crate::City::add_unit
//! [`City::upgrade`]: crate::City::upgrade

use rtsmod_types::{BuildingType, PlayerId, Position, UnitId, UnitType};

/// Errors that can occur during city operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CityError {
    /// A building already stands at the requested position.
    #[error("position {position} is already occupied by a {existing}")]
    PositionOccupied {
        /// The contested position.
        position: Position,
        /// The building already there.
        existing: BuildingType,
    },

    /// The city cannot afford a building's cost.
    #[error("insufficient resources to construct a {0}")]
    CannotAffordBuilding(BuildingType),

    /// The city cannot afford a unit's cost.
    #[error("insufficient resources to train a {0}")]
    CannotAffordUnit(UnitType),

    /// A unit owned by another player was offered to this city.
    #[error("unit {unit} belongs to {owner}, not to {city}")]
    ForeignUnit {
        /// The offered unit.
        unit: UnitId,
        /// The unit's actual owner.
        owner: PlayerId,
        /// The city that rejected it.
        city: PlayerId,
    },

    /// The city has as many units as its level allows.
    #[error("population cap of {max} reached")]
    PopulationCapReached {
        /// Cap at the city's current level.
        max: u32,
    },

    /// The city is already at the top level.
    #[error("city is already at the maximum level {0}")]
    MaxLevel(u32),

    /// The city lacks the power or buildings for its next level.
    #[error(
        "level {level} needs {required_power} power and {required_buildings} buildings \
         to upgrade (have {power} and {buildings})"
    )]
    UpgradeNotReady {
        /// Current level.
        level: u32,
        /// Current power.
        power: u32,
        /// Power needed.
        required_power: u32,
        /// Current building count.
        buildings: u32,
        /// Buildings needed.
        required_buildings: u32,
    },
}
