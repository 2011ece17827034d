pub mod audit;
pub mod config;
pub mod error;
pub mod map;
pub mod mapgen;
pub mod navigation;
pub mod path;
pub mod pathfinding;
pub mod placement;
pub mod queue;
pub mod rng;
pub mod types;

#[cfg(test)]
mod test_support;

pub use audit::{AuditFinding, audit};
pub use config::{CorridorStrategy, DungeonConfig, RoomBounds};
pub use error::MapgenError;
pub use map::{Map, Tile, TileFlags};
pub use mapgen::{Dungeon, Link, Room, generate_dungeon, generate_with};
pub use navigation::{NavStep, Navigator};
pub use path::Path;
pub use pathfinding::{
    AlwaysPassable, DistanceField, MapPassability, Passability, SearchScratch, UNREACHABLE,
    build_distance_field, find_path, line_of_sight, straight_line,
};
pub use placement::{random_location, random_location_in};
pub use queue::PriorityQueue;
pub use rng::{Generator, SeededGenerator};
pub use types::*;
