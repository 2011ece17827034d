//! Error type shared by map construction and dungeon generation.

use crate::types::{Pos, Rect};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapgenError {
    #[error("map dimensions {width}x{height} must both be positive")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("invalid dungeon config: {0}")]
    InvalidConfig(String),

    /// A leaf region cannot hold the minimum room plus padding.
    #[error("region {region:?} cannot hold a {min_width}x{min_height} room with padding {padding}")]
    RoomDoesNotFit { region: Rect, min_width: i32, min_height: i32, padding: i32 },

    /// No corridor could be dug between two regions that must be joined.
    #[error("no corridor route between {from:?} and {to:?}")]
    NoCorridorRoute { from: Pos, to: Pos },

    #[error("no location for {what} after {attempts} attempts")]
    PlacementExhausted { what: &'static str, attempts: u32 },
}
