//! Size bounds passed down during measurement.

use crate::geometry::Size;
use serde::{Deserialize, Serialize};

/// Range of sizes a parent will accept from a child.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Narrowest allowed
    pub min_width: f32,
    /// Widest allowed
    pub max_width: f32,
    /// Shortest allowed
    pub min_height: f32,
    /// Tallest allowed
    pub max_height: f32,
}

impl Constraints {
    #[must_use]
    pub const fn new(min_width: f32, max_width: f32, min_height: f32, max_height: f32) -> Self {
        Self {
            min_width,
            max_width,
            min_height,
            max_height,
        }
    }

    /// Anything from zero up to `size`.
    #[must_use]
    pub const fn loose(size: Size) -> Self {
        Self::new(0.0, size.width, 0.0, size.height)
    }

    /// Clamp `size` into range.
    #[must_use]
    pub fn constrain(&self, size: Size) -> Size {
        Size::new(
            size.width.clamp(self.min_width, self.max_width),
            size.height.clamp(self.min_height, self.max_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constrain_loose() {
        let c = Constraints::loose(Size::new(100.0, 50.0));
        assert_eq!(c.constrain(Size::new(200.0, 10.0)), Size::new(100.0, 10.0));
    }

    #[test]
    fn test_constrain_raises_to_minimum() {
        let c = Constraints::new(36.0, 192.0, 36.0, 400.0);
        assert_eq!(c.constrain(Size::ZERO), Size::new(36.0, 36.0));
        assert_eq!(c.constrain(Size::new(100.0, 500.0)), Size::new(100.0, 400.0));
    }
}
