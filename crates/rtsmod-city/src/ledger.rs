//! The per-city resource ledger.
//!
//! A [`ResourceLedger`] holds one non-negative counter per [`ResourceType`].
//! Storage is a fixed array indexed by [`ResourceType::index`], so every
//! category is always present and reads of an untouched category yield 0.
//!
//! Arithmetic policy:
//! - `add` saturates at `u32::MAX`.
//! - `subtract` clamps at 0 and never reports a shortfall. Callers that need a
//!   transactional spend check [`ResourceLedger::has_enough`] first, or use
//!   [`ResourceLedger::checked_subtract`] / [`ResourceLedger::spend`].

use std::collections::BTreeMap;

use rtsmod_types::ResourceType;

/// Fixed set of resource counters, one per [`ResourceType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ResourceLedger {
    amounts: [u32; ResourceType::COUNT],
}

impl ResourceLedger {
    /// Create a ledger with every counter at zero.
    pub const fn new() -> Self {
        Self {
            amounts: [0; ResourceType::COUNT],
        }
    }

    /// Build a ledger from `(type, amount)` pairs. Later pairs for the same
    /// type add to earlier ones.
    pub fn of(pairs: &[(ResourceType, u32)]) -> Self {
        let mut ledger = Self::new();
        for &(resource, amount) in pairs {
            ledger.add(resource, amount);
        }
        ledger
    }

    /// Return the stored amount of `resource`.
    pub fn get(&self, resource: ResourceType) -> u32 {
        self.amounts.get(resource.index()).copied().unwrap_or(0)
    }

    /// Overwrite the stored amount of `resource`.
    pub fn set(&mut self, resource: ResourceType, amount: u32) {
        if let Some(slot) = self.amounts.get_mut(resource.index()) {
            *slot = amount;
        }
    }

    /// Increase `resource` by `amount`, saturating at `u32::MAX`.
    pub fn add(&mut self, resource: ResourceType, amount: u32) {
        if let Some(slot) = self.amounts.get_mut(resource.index()) {
            *slot = slot.saturating_add(amount);
        }
    }

    /// Decrease `resource` by `amount`, clamping at zero.
    pub fn subtract(&mut self, resource: ResourceType, amount: u32) {
        if let Some(slot) = self.amounts.get_mut(resource.index()) {
            *slot = slot.saturating_sub(amount);
        }
    }

    /// Decrease `resource` by `amount` only if the full amount is available.
    ///
    /// Returns `false` and leaves the ledger untouched on a shortfall.
    pub fn checked_subtract(&mut self, resource: ResourceType, amount: u32) -> bool {
        let Some(slot) = self.amounts.get_mut(resource.index()) else {
            return false;
        };
        match slot.checked_sub(amount) {
            Some(remaining) => {
                *slot = remaining;
                true
            }
            None => false,
        }
    }

    /// Whether at least `amount` of `resource` is stored.
    pub fn has_enough(&self, resource: ResourceType, amount: u32) -> bool {
        self.get(resource) >= amount
    }

    /// Whether every category of `cost` is covered by this ledger.
    pub fn can_afford(&self, cost: &Self) -> bool {
        ResourceType::ALL
            .iter()
            .all(|&resource| self.has_enough(resource, cost.get(resource)))
    }

    /// Deduct `cost` in full, or not at all.
    ///
    /// Returns `true` if the ledger could afford the cost and it was deducted.
    pub fn spend(&mut self, cost: &Self) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        for &resource in ResourceType::ALL {
            self.subtract(resource, cost.get(resource));
        }
        true
    }

    /// Sum of every counter, saturating.
    pub fn total(&self) -> u32 {
        self.amounts
            .iter()
            .fold(0_u32, |total, amount| total.saturating_add(*amount))
    }

    /// Whether every counter is zero.
    pub fn is_empty(&self) -> bool {
        self.amounts.iter().all(|amount| *amount == 0)
    }

    /// Iterate `(type, amount)` pairs in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, u32)> + '_ {
        ResourceType::ALL
            .iter()
            .map(|&resource| (resource, self.get(resource)))
    }

    /// Export an independent copy of every counter.
    ///
    /// Mutating the returned map never affects the ledger.
    pub fn snapshot(&self) -> BTreeMap<ResourceType, u32> {
        self.iter().collect()
    }
}

impl core::fmt::Display for ResourceLedger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (resource, amount) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}: {amount}", resource.display_name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn fresh_ledger_is_fully_populated_with_zero() {
        let ledger = ResourceLedger::new();
        for &resource in ResourceType::ALL {
            assert_eq!(ledger.get(resource), 0);
        }
        assert!(ledger.is_empty());
        assert_eq!(ledger.snapshot().len(), ResourceType::COUNT);
    }

    #[test]
    fn subtract_clamps_at_zero() {
        let mut ledger = ResourceLedger::new();
        ledger.add(ResourceType::Gold, 50);
        ledger.subtract(ResourceType::Gold, 80);
        assert_eq!(ledger.get(ResourceType::Gold), 0);
    }

    #[test]
    fn add_saturates() {
        let mut ledger = ResourceLedger::new();
        ledger.set(ResourceType::Wood, u32::MAX - 1);
        ledger.add(ResourceType::Wood, 10);
        assert_eq!(ledger.get(ResourceType::Wood), u32::MAX);
    }

    #[test]
    fn has_enough_is_inclusive() {
        let ledger = ResourceLedger::of(&[(ResourceType::Stone, 25)]);
        assert!(ledger.has_enough(ResourceType::Stone, 25));
        assert!(!ledger.has_enough(ResourceType::Stone, 26));
        assert!(ledger.has_enough(ResourceType::Food, 0));
    }

    #[test]
    fn checked_subtract_refuses_overdraw() {
        let mut ledger = ResourceLedger::of(&[(ResourceType::Food, 10)]);
        assert!(!ledger.checked_subtract(ResourceType::Food, 11));
        assert_eq!(ledger.get(ResourceType::Food), 10);
        assert!(ledger.checked_subtract(ResourceType::Food, 10));
        assert_eq!(ledger.get(ResourceType::Food), 0);
    }

    #[test]
    fn spend_is_all_or_nothing() {
        let mut ledger =
            ResourceLedger::of(&[(ResourceType::Wood, 100), (ResourceType::Stone, 10)]);
        let cost = ResourceLedger::of(&[(ResourceType::Wood, 100), (ResourceType::Stone, 50)]);

        assert!(!ledger.spend(&cost));
        assert_eq!(ledger.get(ResourceType::Wood), 100);
        assert_eq!(ledger.get(ResourceType::Stone), 10);

        ledger.add(ResourceType::Stone, 40);
        assert!(ledger.spend(&cost));
        assert!(ledger.is_empty());
    }

    #[test]
    fn snapshot_is_independent() {
        let mut ledger = ResourceLedger::of(&[(ResourceType::Gold, 5)]);
        let mut snap = ledger.snapshot();
        snap.insert(ResourceType::Gold, 999);
        assert_eq!(ledger.get(ResourceType::Gold), 5);

        ledger.add(ResourceType::Gold, 1);
        assert_eq!(snap.get(&ResourceType::Gold), Some(&999));
    }

    #[test]
    fn display_lists_every_type() {
        let ledger = ResourceLedger::of(&[(ResourceType::Gold, 3)]);
        assert_eq!(ledger.to_string(), "Gold: 3, Wood: 0, Stone: 0, Food: 0");
    }

    fn resource() -> impl Strategy<Value = ResourceType> {
        prop::sample::select(ResourceType::ALL.to_vec())
    }

    proptest! {
        /// The ledger tracks a saturating model exactly, so no counter can
        /// ever drop below zero or diverge from the expected value.
        #[test]
        fn ledger_matches_saturating_model(
            ops in prop::collection::vec((resource(), any::<bool>(), any::<u32>()), 0..64)
        ) {
            let mut ledger = ResourceLedger::new();
            let mut model = [0_u64; ResourceType::COUNT];

            for (resource, is_add, amount) in ops {
                let slot = model.get_mut(resource.index()).ok_or_else(|| {
                    TestCaseError::fail("resource index out of range")
                })?;
                if is_add {
                    ledger.add(resource, amount);
                    *slot = (*slot + u64::from(amount)).min(u64::from(u32::MAX));
                } else {
                    ledger.subtract(resource, amount);
                    *slot = slot.saturating_sub(u64::from(amount));
                }
                prop_assert_eq!(u64::from(ledger.get(resource)), *slot);
            }
        }
    }
}
