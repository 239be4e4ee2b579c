//! Constructed buildings.
//!
//! A [`Building`] is addressed by its position within the owning city. Health
//! is kept in `0..=max_health`; a building at zero health is destroyed and is
//! removed by the next [`City::reap_destroyed`](crate::City::reap_destroyed).

use rtsmod_types::{BuildingType, PlayerId, Position};

use crate::ledger::ResourceLedger;

/// A building owned by a city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Building {
    building_type: BuildingType,
    owner: PlayerId,
    position: Position,
    health: u32,
    max_health: u32,
    build_time: u32,
    cost: ResourceLedger,
    under_construction: bool,
    construction_progress: u32,
}

impl Building {
    /// Create a completed building at full health.
    ///
    /// `cost` records what was paid for it; nothing is deducted here.
    pub const fn new(
        building_type: BuildingType,
        owner: PlayerId,
        position: Position,
        max_health: u32,
        build_time: u32,
        cost: ResourceLedger,
    ) -> Self {
        Self {
            building_type,
            owner,
            position,
            health: max_health,
            max_health,
            build_time,
            cost,
            under_construction: false,
            construction_progress: 0,
        }
    }

    /// Set the current health, clamped to `max_health`.
    #[must_use]
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health.min(self.max_health);
        self
    }

    /// Mark the building as a construction site with the given progress.
    ///
    /// Progress at or beyond `build_time` leaves the building complete.
    #[must_use]
    pub fn with_construction(mut self, progress: u32) -> Self {
        if progress >= self.build_time {
            self.under_construction = false;
            self.construction_progress = self.build_time;
        } else {
            self.under_construction = true;
            self.construction_progress = progress;
        }
        self
    }

    /// The building kind.
    pub const fn building_type(&self) -> BuildingType {
        self.building_type
    }

    /// The owning player.
    pub const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// Where the building stands; its key within the city.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current health.
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Maximum health.
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Construction effort in ticks.
    pub const fn build_time(&self) -> u32 {
        self.build_time
    }

    /// Resources paid for this building.
    pub const fn cost(&self) -> &ResourceLedger {
        &self.cost
    }

    /// Whether construction is still in progress.
    pub const fn is_under_construction(&self) -> bool {
        self.under_construction
    }

    /// Ticks of construction completed so far.
    pub const fn construction_progress(&self) -> u32 {
        self.construction_progress
    }

    /// Whether health has reached zero.
    pub const fn is_destroyed(&self) -> bool {
        self.health == 0
    }

    /// Reduce health by `amount`, flooring at zero.
    pub const fn damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Restore health by `amount`, capped at `max_health`.
    pub fn repair(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    /// Advance construction by `delta` ticks.
    ///
    /// Returns `true` only on the call that completes construction.
    pub fn advance_construction(&mut self, delta: u32) -> bool {
        if !self.under_construction {
            return false;
        }
        self.construction_progress = self
            .construction_progress
            .saturating_add(delta)
            .min(self.build_time);
        if self.construction_progress >= self.build_time {
            self.under_construction = false;
            return true;
        }
        false
    }

    /// Whether this building can train units.
    pub const fn can_produce_units(&self) -> bool {
        matches!(
            self.building_type,
            BuildingType::TownCenter | BuildingType::Barracks
        )
    }

    /// Whether this building produces resources each production cycle.
    pub const fn generates_resources(&self) -> bool {
        matches!(self.building_type, BuildingType::ResourceBuilding)
    }

    /// Whether this building contributes to defense.
    pub const fn can_defend(&self) -> bool {
        matches!(self.building_type, BuildingType::Tower | BuildingType::Barracks)
    }

    /// Whether this building is complete, standing, and producing.
    pub const fn is_producing(&self) -> bool {
        self.generates_resources() && !self.under_construction && !self.is_destroyed()
    }
}
