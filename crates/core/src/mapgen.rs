//! Procedural dungeon generation split into coherent submodules: partitioning, room
//! carving, and corridor digging, composed by [`generate_dungeon`].

pub mod bsp;
pub mod corridors;
pub mod rooms;

use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::config::DungeonConfig;
use crate::error::MapgenError;
use crate::map::Map;
use crate::placement::{MAX_PLACEMENT_ATTEMPTS, random_location_in};
use crate::rng::{Generator, SeededGenerator};
use crate::types::{Pos, Rect, TileKind};

pub use bsp::{Axis, BspTree, NodeId, SplitRules};
pub use corridors::{DigPassability, Link};
pub use rooms::Room;

#[derive(Clone, Debug, PartialEq)]
pub struct Dungeon {
    /// Seed given to [`generate_dungeon`]; zero for injected streams.
    pub seed: u64,
    pub map: Map,
    pub rooms: Vec<Room>,
    pub links: Vec<Link>,
    upstair: Pos,
    downstair: Pos,
}

impl Dungeon {
    pub fn upstair(&self) -> Pos {
        self.upstair
    }

    pub fn downstair(&self) -> Pos {
        self.downstair
    }

    /// Map digest combined with the stair positions.
    pub fn fingerprint(&self) -> u64 {
        let stairs = [self.upstair.x, self.upstair.y, self.downstair.x, self.downstair.y];
        let mut bytes = self.map.canonical_bytes();
        for value in stairs {
            bytes.extend(value.to_le_bytes());
        }
        xxh3_64(&bytes)
    }
}

pub fn generate_dungeon(seed: u64, config: &DungeonConfig) -> Result<Dungeon, MapgenError> {
    let mut generator = SeededGenerator::new(seed);
    let mut dungeon = generate_with(&mut generator, config)?;
    dungeon.seed = seed;
    Ok(dungeon)
}

/// Runs the whole pipeline drawing from an injected generator.
pub fn generate_with<G>(generator: &mut G, config: &DungeonConfig) -> Result<Dungeon, MapgenError>
where
    G: Generator + ?Sized,
{
    config.validate()?;
    let mut map = Map::new(config.width, config.height)?;

    let mut tree = BspTree::new(Rect::new(1, 1, config.width - 2, config.height - 2));
    let rules = SplitRules {
        min_region: config.min_region,
        max_region: config.max_region,
        deviation: config.deviation,
        max_depth: config.max_depth,
    };
    let root = tree.root();
    tree.recursively_split(root, generator, &rules);

    let mut rooms = Vec::new();
    for leaf in tree.leaves(root) {
        let Some(region) = tree.region(leaf) else {
            continue;
        };
        let rect = rooms::carve_room(&mut map, region, config.room_bounds, config.padding, generator)?;
        rooms.push(Room { leaf, rect });
    }
    debug!(nodes = tree.len(), rooms = rooms.len(), "rooms carved");

    let links = corridors::connect_regions(&mut map, &tree, config.strategy, generator)?;
    map.clear_corner_marks();

    let (upstair, downstair) = place_stairs(&mut map, &rooms, generator)?;
    debug!(?upstair, ?downstair, "stairs placed");

    Ok(Dungeon { seed: 0, map, rooms, links, upstair, downstair })
}

/// Up and down stairs on floor cells of two different rooms, or two different cells of
/// the only room.
fn place_stairs<G>(map: &mut Map, rooms: &[Room], generator: &mut G) -> Result<(Pos, Pos), MapgenError>
where
    G: Generator + ?Sized,
{
    let exhausted = |what| MapgenError::PlacementExhausted { what, attempts: MAX_PLACEMENT_ATTEMPTS };
    if rooms.is_empty() {
        return Err(exhausted("stair room"));
    }

    let up_room = generator.index(rooms.len());
    let down_room = if rooms.len() > 1 {
        let mut other = generator.index(rooms.len() - 1);
        if other >= up_room {
            other += 1;
        }
        other
    } else {
        up_room
    };

    let up_area = rooms[up_room].interior().ok_or_else(|| exhausted("upstair"))?;
    let upstair = random_location_in(up_area, generator, |pos| {
        map.tile_kind(pos) == Some(TileKind::Floor)
    })
    .ok_or_else(|| exhausted("upstair"))?;
    map.set_tile(upstair, TileKind::StairUp);

    let down_area = rooms[down_room].interior().ok_or_else(|| exhausted("downstair"))?;
    let downstair = random_location_in(down_area, generator, |pos| {
        map.tile_kind(pos) == Some(TileKind::Floor)
    })
    .ok_or_else(|| exhausted("downstair"))?;
    map.set_tile(downstair, TileKind::StairDown);

    Ok((upstair, downstair))
}
