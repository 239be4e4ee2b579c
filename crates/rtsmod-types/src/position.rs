//! Integer block coordinates in the host world.

use serde::{Deserialize, Serialize};

/// A 3D integer coordinate.
///
/// Used both as a city's origin and as the key of a building within a city.
/// Ordering is lexicographic on `(x, y, z)` so positions can key a `BTreeMap`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    /// East-west axis.
    pub x: i32,
    /// Vertical axis.
    pub y: i32,
    /// North-south axis.
    pub z: i32,
}

impl Position {
    /// The world origin `(0, 0, 0)`.
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    /// Create a position from its three components.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_origin() {
        assert_eq!(Position::default(), Position::ORIGIN);
    }

    #[test]
    fn display_is_short_form() {
        assert_eq!(Position::new(10, 64, -5).to_string(), "10, 64, -5");
    }
}
