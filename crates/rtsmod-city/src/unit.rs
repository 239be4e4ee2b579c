//! Mobile units and their order queues.
//!
//! Units keep a FIFO of [`Order`]s. The city layer only stores and edits the
//! queue; executing orders (movement, combat) belongs to the host.

use std::collections::VecDeque;

use rtsmod_types::{OrderType, PlayerId, Position, UnitId, UnitState, UnitType};
use serde::{Deserialize, Serialize};

/// A pending instruction for a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// What to do.
    pub kind: OrderType,
    /// Where to do it, if the order has a location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Position>,
}

impl Order {
    /// Create an order with a target position.
    pub const fn at(kind: OrderType, target: Position) -> Self {
        Self {
            kind,
            target: Some(target),
        }
    }

    /// Create an order with no target.
    pub const fn bare(kind: OrderType) -> Self {
        Self { kind, target: None }
    }
}

/// A unit owned by a city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    id: UnitId,
    owner: PlayerId,
    unit_type: UnitType,
    position: Position,
    health: u32,
    max_health: u32,
    target: Option<UnitId>,
    orders: VecDeque<Order>,
    state: UnitState,
}

impl Unit {
    /// Create an idle unit at full health.
    pub const fn new(
        id: UnitId,
        owner: PlayerId,
        unit_type: UnitType,
        position: Position,
        max_health: u32,
    ) -> Self {
        Self {
            id,
            owner,
            unit_type,
            position,
            health: max_health,
            max_health,
            target: None,
            orders: VecDeque::new(),
            state: UnitState::Idle,
        }
    }

    /// Set the current health, clamped to `max_health`. Zero marks the unit dead.
    #[must_use]
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health.min(self.max_health);
        if self.health == 0 {
            self.state = UnitState::Dead;
        }
        self
    }

    /// Set the current state.
    #[must_use]
    pub const fn with_state(mut self, state: UnitState) -> Self {
        self.state = state;
        self
    }

    /// The unit's identity.
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// The owning player.
    pub const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// The unit kind.
    pub const fn unit_type(&self) -> UnitType {
        self.unit_type
    }

    /// Current position.
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

    /// Current state.
    pub const fn state(&self) -> UnitState {
        self.state
    }

    /// The unit this one is targeting, if any.
    pub const fn target(&self) -> Option<UnitId> {
        self.target
    }

    /// Pending orders, front first.
    pub const fn orders(&self) -> &VecDeque<Order> {
        &self.orders
    }

    /// Whether health has reached zero.
    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Move the unit and mark it as moving.
    pub const fn move_to(&mut self, position: Position) {
        self.position = position;
        self.state = UnitState::Moving;
    }

    /// Set or clear the targeted unit.
    pub const fn set_target(&mut self, target: Option<UnitId>) {
        self.target = target;
    }

    /// Set the current state directly.
    pub const fn set_state(&mut self, state: UnitState) {
        self.state = state;
    }

    /// Reduce health by `amount`, flooring at zero. Zero marks the unit dead.
    pub const fn damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.state = UnitState::Dead;
        }
    }

    /// Restore health by `amount`, capped at `max_health`.
    ///
    /// A dead unit healed above zero comes back idle.
    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
        if self.health > 0 && self.state == UnitState::Dead {
            self.state = UnitState::Idle;
        }
    }

    /// Append an order to the back of the queue.
    pub fn push_order(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    /// The order at the front of the queue.
    pub fn current_order(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Drop the front order, returning it.
    pub fn complete_current_order(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Drop every pending order and go idle.
    pub fn clear_orders(&mut self) {
        self.orders.clear();
        if self.state != UnitState::Dead {
            self.state = UnitState::Idle;
        }
    }

    /// Whether this unit can gather resources.
    pub const fn can_gather(&self) -> bool {
        matches!(self.unit_type, UnitType::Worker)
    }

    /// Whether this unit can construct buildings.
    pub const fn can_build(&self) -> bool {
        matches!(self.unit_type, UnitType::Worker)
    }

    /// Whether this unit can attack.
    pub const fn can_attack(&self) -> bool {
        matches!(self.unit_type, UnitType::Soldier | UnitType::RangedUnit)
    }
}
