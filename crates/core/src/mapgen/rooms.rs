//! One walled room per BSP leaf.

use crate::config::RoomBounds;
use crate::error::MapgenError;
use crate::map::Map;
use crate::rng::Generator;
use crate::types::{Rect, TileKind};

use super::bsp::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    pub leaf: NodeId,
    /// Outer rectangle, walls included.
    pub rect: Rect,
}

impl Room {
    /// Floor cells inside the walls.
    pub fn interior(&self) -> Option<Rect> {
        self.rect.shrunk(1)
    }
}

/// Draws a room inside `region`, keeping `padding` rock cells on every side.
/// Walls go on the perimeter, floor inside, and the four corners are flagged so no
/// corridor breaches them.
pub(super) fn carve_room<G>(
    map: &mut Map,
    region: Rect,
    bounds: RoomBounds,
    padding: i32,
    generator: &mut G,
) -> Result<Rect, MapgenError>
where
    G: Generator + ?Sized,
{
    let available_width = region.width - 2 * padding;
    let available_height = region.height - 2 * padding;
    if available_width < bounds.min.width || available_height < bounds.min.height {
        return Err(MapgenError::RoomDoesNotFit {
            region,
            min_width: bounds.min.width,
            min_height: bounds.min.height,
            padding,
        });
    }

    let width = generator.generate(bounds.min.width, bounds.max.width.min(available_width));
    let height = generator.generate(bounds.min.height, bounds.max.height.min(available_height));
    let x = region.x + padding + generator.generate(0, available_width - width);
    let y = region.y + padding + generator.generate(0, available_height - height);
    let room = Rect::new(x, y, width, height);

    for pos in room.positions() {
        let kind = if room.is_perimeter(pos) { TileKind::Wall } else { TileKind::Floor };
        map.set_tile(pos, kind);
    }
    for corner in room.corners() {
        map.mark_corner(corner);
    }
    Ok(room)
}
