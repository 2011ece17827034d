//! Generation parameters. Every field has a default so partial TOML files load.

use serde::{Deserialize, Serialize};

use crate::error::MapgenError;
use crate::types::Size;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorridorStrategy {
    /// Sibling regions joined at the points closest to their shared split line.
    #[default]
    NearestSibling,
    /// Every leaf joined to a random other leaf, then sibling gaps repaired.
    Chaotic,
    /// Sibling regions joined at random points.
    GenericSibling,
}

impl CorridorStrategy {
    pub const ALL: [CorridorStrategy; 3] =
        [CorridorStrategy::NearestSibling, CorridorStrategy::Chaotic, CorridorStrategy::GenericSibling];
}

/// Inclusive room size limits, walls included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomBounds {
    pub min: Size,
    pub max: Size,
}

impl Default for RoomBounds {
    fn default() -> Self {
        Self { min: Size::new(4, 4), max: Size::new(14, 10) }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub width: i32,
    pub height: i32,
    /// Smallest region a split may produce.
    pub min_region: Size,
    /// Regions fitting inside this size on both axes are not split further.
    pub max_region: Size,
    pub room_bounds: RoomBounds,
    /// Rock kept between a room and the edge of its region, on every side.
    pub padding: i32,
    /// Fraction of the half-extent a split may stray from the center, in `[0, 1]`.
    pub deviation: f64,
    pub max_depth: u32,
    pub strategy: CorridorStrategy,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 40,
            min_region: Size::new(10, 8),
            max_region: Size::new(20, 16),
            room_bounds: RoomBounds::default(),
            padding: 1,
            deviation: 0.35,
            max_depth: 8,
            strategy: CorridorStrategy::NearestSibling,
        }
    }
}

impl DungeonConfig {
    /// Map of `width` by `height` with every other parameter at its default.
    pub fn with_size(width: i32, height: i32) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), MapgenError> {
        let invalid = |message: String| Err(MapgenError::InvalidConfig(message));

        if self.width < 3 || self.height < 3 {
            return Err(MapgenError::InvalidDimensions { width: self.width, height: self.height });
        }
        if self.padding < 1 {
            return invalid(format!("padding must be at least 1, got {}", self.padding));
        }
        let rooms = self.room_bounds;
        if rooms.min.width < 3 || rooms.min.height < 3 {
            return invalid(format!("rooms must be at least 3x3, got {:?}", rooms.min));
        }
        if rooms.max.width < rooms.min.width || rooms.max.height < rooms.min.height {
            return invalid(format!("room max {:?} is below room min {:?}", rooms.max, rooms.min));
        }
        let needed = Size::new(
            rooms.min.width + 2 * self.padding,
            rooms.min.height + 2 * self.padding,
        );
        if self.min_region.width < needed.width || self.min_region.height < needed.height {
            return invalid(format!(
                "min region {:?} cannot hold a {:?} room with padding {}",
                self.min_region, rooms.min, self.padding
            ));
        }
        if self.max_region.width < self.min_region.width
            || self.max_region.height < self.min_region.height
        {
            return invalid(format!(
                "max region {:?} is below min region {:?}",
                self.max_region, self.min_region
            ));
        }
        if self.width - 2 < self.min_region.width || self.height - 2 < self.min_region.height {
            return invalid(format!(
                "a {}x{} map has no room for a {:?} region inside its border",
                self.width, self.height, self.min_region
            ));
        }
        if !(0.0..=1.0).contains(&self.deviation) {
            return invalid(format!("deviation must lie in [0, 1], got {}", self.deviation));
        }
        let interior = (rooms.min.width - 2) * (rooms.min.height - 2);
        if self.is_single_region() && interior < 2 {
            return invalid(format!(
                "a single {:?} room has {interior} floor cell, both stairs need two",
                rooms.min
            ));
        }
        Ok(())
    }

    /// Whether the area inside the border can never be split, leaving one room.
    fn is_single_region(&self) -> bool {
        let (width, height) = (self.width - 2, self.height - 2);
        self.max_depth == 0
            || (width <= self.max_region.width && height <= self.max_region.height)
            || (width < 2 * self.min_region.width && height < 2 * self.min_region.height)
    }
}
