//! Static blueprints for every building and unit kind.
//!
//! Blueprints are configuration, not runtime state: the same table is
//! returned on every call. [`BuildingBlueprint::instantiate`] and
//! [`UnitBlueprint::instantiate`] produce fresh entities at full health.

use rtsmod_types::{BuildingType, PlayerId, Position, ResourceType, UnitId, UnitType};

use crate::building::Building;
use crate::ledger::ResourceLedger;
use crate::unit::Unit;

/// Static definition of a building kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildingBlueprint {
    /// The kind this blueprint describes.
    pub building_type: BuildingType,
    /// Health of a freshly built instance.
    pub max_health: u32,
    /// Construction effort in ticks.
    pub build_time: u32,
    /// Resources deducted when construction starts.
    pub cost: ResourceLedger,
    /// Contribution to city power.
    pub power: u32,
    /// One-line description for `rts info`.
    pub description: &'static str,
}

impl BuildingBlueprint {
    /// Create a completed building of this kind at full health.
    pub fn instantiate(&self, owner: PlayerId, position: Position) -> Building {
        Building::new(
            self.building_type,
            owner,
            position,
            self.max_health,
            self.build_time,
            self.cost,
        )
    }
}

/// Static definition of a unit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitBlueprint {
    /// The kind this blueprint describes.
    pub unit_type: UnitType,
    /// Health of a freshly trained instance.
    pub max_health: u32,
    /// Training effort in ticks.
    pub build_time: u32,
    /// Resources deducted when training.
    pub cost: ResourceLedger,
    /// Contribution to city power.
    pub power: u32,
    /// One-line description for `rts info`.
    pub description: &'static str,
}

impl UnitBlueprint {
    /// Create a new unit of this kind at full health with a fresh id.
    pub fn instantiate(&self, owner: PlayerId, position: Position) -> Unit {
        Unit::new(UnitId::new(), owner, self.unit_type, position, self.max_health)
    }
}

/// Return the canonical blueprint for a [`BuildingType`].
pub fn building_blueprint(building_type: BuildingType) -> BuildingBlueprint {
    match building_type {
        BuildingType::TownCenter => BuildingBlueprint {
            building_type,
            max_health: 1000,
            build_time: 0,
            cost: ResourceLedger::new(),
            power: 100,
            description: "Main building that serves as the city center and can train workers",
        },
        BuildingType::Barracks => BuildingBlueprint {
            building_type,
            max_health: 500,
            build_time: 300,
            cost: ResourceLedger::of(&[(ResourceType::Wood, 100), (ResourceType::Stone, 50)]),
            power: 50,
            description: "Building for training military units",
        },
        BuildingType::ResourceBuilding => BuildingBlueprint {
            building_type,
            max_health: 300,
            build_time: 200,
            cost: ResourceLedger::of(&[(ResourceType::Wood, 75)]),
            power: 25,
            description: "Building for resource gathering operations",
        },
        BuildingType::Tower => BuildingBlueprint {
            building_type,
            max_health: 400,
            build_time: 250,
            cost: ResourceLedger::of(&[(ResourceType::Stone, 100), (ResourceType::Wood, 50)]),
            power: 75,
            description: "Defensive structure for city protection",
        },
        BuildingType::Storage => BuildingBlueprint {
            building_type,
            max_health: 200,
            build_time: 150,
            cost: ResourceLedger::of(&[(ResourceType::Wood, 80)]),
            power: 10,
            description: "Increases resource storage capacity",
        },
    }
}

/// Return the canonical blueprint for a [`UnitType`].
pub fn unit_blueprint(unit_type: UnitType) -> UnitBlueprint {
    match unit_type {
        UnitType::Worker => UnitBlueprint {
            unit_type,
            max_health: 50,
            build_time: 50,
            cost: ResourceLedger::of(&[(ResourceType::Food, 50)]),
            power: 5,
            description: "Can gather resources and construct buildings",
        },
        UnitType::Soldier => UnitBlueprint {
            unit_type,
            max_health: 100,
            build_time: 100,
            cost: ResourceLedger::of(&[(ResourceType::Food, 75), (ResourceType::Stone, 25)]),
            power: 20,
            description: "Basic combat unit for ground warfare",
        },
        UnitType::RangedUnit => UnitBlueprint {
            unit_type,
            max_health: 80,
            build_time: 120,
            cost: ResourceLedger::of(&[(ResourceType::Food, 100), (ResourceType::Stone, 50)]),
            power: 30,
            description: "Long-range combat unit",
        },
    }
}
