//! Structural checks over generated dungeons, shared by the fuzz tool and the
//! integration tests.

use std::collections::BTreeSet;
use std::fmt;

use crate::map::Map;
use crate::mapgen::Dungeon;
use crate::pathfinding::{MapPassability, Passability};
use crate::types::{Pos, TileKind, chebyshev, diagonal_neighbors, neighbors};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuditFinding {
    /// Walkable cells not reachable from the upstair.
    Disconnected { unreachable: usize, example: Pos },
    /// A corridor or doorway flanked by wall-like tiles on two perpendicular sides.
    DoubleBreach(Pos),
    /// Two doorways touching each other.
    AdjacentDoorways(Pos, Pos),
    StairMissing(TileKind),
    /// Walkable tile on the outer edge of the map.
    OpenBorder(Pos),
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditFinding::Disconnected { unreachable, example } => {
                write!(f, "{unreachable} walkable cells unreachable, e.g. {example:?}")
            }
            AuditFinding::DoubleBreach(pos) => write!(f, "double breach at {pos:?}"),
            AuditFinding::AdjacentDoorways(a, b) => write!(f, "doorways {a:?} and {b:?} touch"),
            AuditFinding::StairMissing(kind) => write!(f, "no {kind:?} where the dungeon says"),
            AuditFinding::OpenBorder(pos) => write!(f, "walkable border cell at {pos:?}"),
        }
    }
}

/// Walkable cells reachable from `start` under the map-aware predicate.
pub fn connected_floor(map: &Map, start: Pos) -> BTreeSet<Pos> {
    let passable = MapPassability::new(map);
    let mut seen = BTreeSet::new();
    if !map.is_passable(start) {
        return seen;
    }
    let mut pending = vec![start];
    seen.insert(start);
    while let Some(pos) = pending.pop() {
        for next in neighbors(pos).into_iter().chain(diagonal_neighbors(pos)) {
            if passable.can_step(pos, next) && seen.insert(next) {
                pending.push(next);
            }
        }
    }
    seen
}

/// Corridor and doorway cells with wall-like neighbors on two perpendicular sides.
pub fn double_breaches(map: &Map) -> Vec<Pos> {
    let wall_like = |pos| map.tile_kind(pos).is_some_and(TileKind::is_wall_like);
    map.positions()
        .filter(|&pos| {
            matches!(
                map.tile_kind(pos),
                Some(TileKind::Corridor | TileKind::Doorway | TileKind::DoorwayOpen)
            )
        })
        .filter(|&pos| {
            let [north, east, south, west] = neighbors(pos).map(wall_like);
            (north || south) && (east || west)
        })
        .collect()
}

fn adjacent_doorways(map: &Map) -> Vec<(Pos, Pos)> {
    let doorways: Vec<Pos> = map
        .positions()
        .filter(|&pos| matches!(map.tile_kind(pos), Some(TileKind::Doorway | TileKind::DoorwayOpen)))
        .collect();
    let mut pairs = Vec::new();
    for (i, &a) in doorways.iter().enumerate() {
        for &b in &doorways[i + 1..] {
            if chebyshev(a, b) <= 1 {
                pairs.push((a, b));
            }
        }
    }
    pairs
}

pub fn audit(dungeon: &Dungeon) -> Vec<AuditFinding> {
    let map = &dungeon.map;
    let mut findings = Vec::new();

    if map.tile_kind(dungeon.upstair()) != Some(TileKind::StairUp) {
        findings.push(AuditFinding::StairMissing(TileKind::StairUp));
    }
    if map.tile_kind(dungeon.downstair()) != Some(TileKind::StairDown) {
        findings.push(AuditFinding::StairMissing(TileKind::StairDown));
    }

    let reached = connected_floor(map, dungeon.upstair());
    let stranded: Vec<Pos> =
        map.positions().filter(|&pos| map.is_passable(pos) && !reached.contains(&pos)).collect();
    if let Some(&example) = stranded.first() {
        findings.push(AuditFinding::Disconnected { unreachable: stranded.len(), example });
    }

    findings.extend(double_breaches(map).into_iter().map(AuditFinding::DoubleBreach));
    findings.extend(
        adjacent_doorways(map).into_iter().map(|(a, b)| AuditFinding::AdjacentDoorways(a, b)),
    );

    let bounds = map.bounds();
    findings.extend(
        map.positions()
            .filter(|&pos| bounds.is_perimeter(pos) && map.is_passable(pos))
            .map(AuditFinding::OpenBorder),
    );
    findings
}
