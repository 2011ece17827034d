//! Corridor digging between BSP regions.
//!
//! Routes are found with the shared A* under [`DigPassability`] and carved afterwards:
//! rock becomes corridor, pierced walls become doorways, and the walls around every new
//! doorway are flagged as corners so no later route opens a second breach beside it.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::config::CorridorStrategy;
use crate::error::MapgenError;
use crate::map::Map;
use crate::path::Path;
use crate::pathfinding::{Passability, SearchScratch};
use crate::rng::Generator;
use crate::types::{Pos, Rect, TileKind, chebyshev, diagonal_neighbors, manhattan, neighbors};

use super::bsp::{BspTree, NodeId};

pub const MAX_ROUTE_ATTEMPTS: u32 = 8;

/// A carved connection between two regions of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub left: NodeId,
    pub right: NodeId,
    pub path: Path,
}

/// Where a corridor may be dug: anywhere inside the map border except flagged corners
/// and cells vetoed by an earlier attempt. Steps between two wall cells are refused.
#[derive(Clone, Debug)]
pub struct DigPassability<'a> {
    map: &'a Map,
    vetoed: BTreeSet<Pos>,
}

impl<'a> DigPassability<'a> {
    pub fn new(map: &'a Map) -> Self {
        Self { map, vetoed: BTreeSet::new() }
    }

    fn veto(&mut self, pos: Pos) {
        self.vetoed.insert(pos);
    }
}

impl Passability for DigPassability<'_> {
    fn is_passable(&self, pos: Pos) -> bool {
        let interior = pos.x > 0
            && pos.y > 0
            && pos.x < self.map.width() - 1
            && pos.y < self.map.height() - 1;
        interior && !self.map.is_corner(pos) && !self.vetoed.contains(&pos)
    }

    fn can_step(&self, from: Pos, to: Pos) -> bool {
        self.is_passable(to) && !(is_wall(self.map, from) && is_wall(self.map, to))
    }
}

fn is_wall(map: &Map, pos: Pos) -> bool {
    matches!(map.tile_kind(pos), Some(TileKind::Wall | TileKind::Doorway))
}

/// Joins every region of `tree` with corridors using `strategy`.
pub(super) fn connect_regions<G>(
    map: &mut Map,
    tree: &BspTree,
    strategy: CorridorStrategy,
    generator: &mut G,
) -> Result<Vec<Link>, MapgenError>
where
    G: Generator + ?Sized,
{
    let mut digger = Digger { scratch: SearchScratch::new(), links: Vec::new() };
    match strategy {
        CorridorStrategy::NearestSibling | CorridorStrategy::GenericSibling => {
            for node in internal_nodes_bottom_up(tree) {
                digger.join_children(map, tree, node, strategy, generator)?;
            }
        }
        CorridorStrategy::Chaotic => connect_chaotic(map, tree, &mut digger, generator)?,
    }
    debug!(?strategy, links = digger.links.len(), "corridors carved");
    Ok(digger.links)
}

fn internal_nodes_bottom_up(tree: &BspTree) -> Vec<NodeId> {
    let mut nodes: Vec<NodeId> =
        tree.all_nodes(tree.root()).into_iter().filter(|&node| !tree.is_leaf(node)).collect();
    nodes.reverse();
    nodes
}

fn connect_chaotic<G>(
    map: &mut Map,
    tree: &BspTree,
    digger: &mut Digger,
    generator: &mut G,
) -> Result<(), MapgenError>
where
    G: Generator + ?Sized,
{
    let leaves: Vec<NodeId> = tree.leaves(tree.root()).into_iter().collect();
    let index: BTreeMap<NodeId, usize> =
        leaves.iter().enumerate().map(|(i, &leaf)| (leaf, i)).collect();
    let mut joined = DisjointSet::new(leaves.len());

    if leaves.len() > 1 {
        let last = i32::try_from(leaves.len() - 2).unwrap_or(i32::MAX);
        for (i, &leaf) in leaves.iter().enumerate() {
            let mut j = generator.generate(0, last) as usize;
            if j >= i {
                j += 1;
            }
            digger.join_random(map, tree, leaf, leaves[j], generator)?;
            joined.union(i, j);
        }
    }

    for node in internal_nodes_bottom_up(tree) {
        let Some((first, second)) = tree.children(node) else {
            continue;
        };
        let (Some(a), Some(b)) = (first_leaf(tree, first, &index), first_leaf(tree, second, &index))
        else {
            continue;
        };
        if joined.find(a) == joined.find(b) {
            continue;
        }
        trace!(?first, ?second, "repairing disconnected siblings");
        digger.join_random(map, tree, first, second, generator)?;
        joined.union(a, b);
    }
    Ok(())
}

fn first_leaf(tree: &BspTree, node: NodeId, index: &BTreeMap<NodeId, usize>) -> Option<usize> {
    let leaf = tree.leaves(node).pop()?;
    index.get(&leaf).copied()
}

struct Digger {
    scratch: SearchScratch,
    links: Vec<Link>,
}

impl Digger {
    fn join_children<G>(
        &mut self,
        map: &mut Map,
        tree: &BspTree,
        node: NodeId,
        strategy: CorridorStrategy,
        generator: &mut G,
    ) -> Result<(), MapgenError>
    where
        G: Generator + ?Sized,
    {
        let Some((first, second)) = tree.children(node) else {
            return Ok(());
        };
        if strategy == CorridorStrategy::GenericSibling {
            return self.join_random(map, tree, first, second, generator);
        }

        let meeting = tree.split_midpoint(node).unwrap_or_else(|| tree_center(tree, node));
        let from_cells = floor_cells(map, tree, first);
        let to_cells = floor_cells(map, tree, second);
        let (Some(&from), Some(&to)) = (nearest(&from_cells, meeting), nearest(&to_cells, meeting))
        else {
            return Err(no_route(tree, first, second));
        };
        if self.dig(map, first, second, from, to) {
            return Ok(());
        }
        for _ in 1..MAX_ROUTE_ATTEMPTS {
            let from = from_cells[generator.index(from_cells.len())];
            let to = to_cells[generator.index(to_cells.len())];
            if self.dig(map, first, second, from, to) {
                return Ok(());
            }
        }
        Err(MapgenError::NoCorridorRoute { from, to })
    }

    fn join_random<G>(
        &mut self,
        map: &mut Map,
        tree: &BspTree,
        left: NodeId,
        right: NodeId,
        generator: &mut G,
    ) -> Result<(), MapgenError>
    where
        G: Generator + ?Sized,
    {
        let from_cells = floor_cells(map, tree, left);
        let to_cells = floor_cells(map, tree, right);
        if from_cells.is_empty() || to_cells.is_empty() {
            return Err(no_route(tree, left, right));
        }
        let (mut from, mut to) = (from_cells[0], to_cells[0]);
        for _ in 0..MAX_ROUTE_ATTEMPTS {
            from = from_cells[generator.index(from_cells.len())];
            to = to_cells[generator.index(to_cells.len())];
            if self.dig(map, left, right, from, to) {
                return Ok(());
            }
        }
        Err(MapgenError::NoCorridorRoute { from, to })
    }

    /// Finds and carves one route. A route that would pierce two walls touching each
    /// other is rejected and searched again with the later wall vetoed.
    fn dig(&mut self, map: &mut Map, left: NodeId, right: NodeId, from: Pos, to: Pos) -> bool {
        let mut passable = DigPassability::new(map);
        let mut route = None;
        for _ in 0..MAX_ROUTE_ATTEMPTS {
            let Some(path) = self.scratch.find_path(from, to, 0, manhattan, &passable) else {
                break;
            };
            match crowded_breach(map, &path) {
                Some(pos) => passable.veto(pos),
                None => {
                    route = Some(path);
                    break;
                }
            }
        }
        let Some(path) = route else {
            trace!(?from, ?to, "no diggable route");
            return false;
        };

        carve(map, &path);
        self.links.push(Link { left, right, path });
        true
    }
}

/// First wall on `path` that sits next to a wall pierced earlier on the same path.
fn crowded_breach(map: &Map, path: &Path) -> Option<Pos> {
    let mut pierced: Vec<Pos> = Vec::new();
    for &pos in path.steps() {
        if map.tile_kind(pos) != Some(TileKind::Wall) {
            continue;
        }
        if pierced.iter().any(|&earlier| chebyshev(earlier, pos) <= 1) {
            return Some(pos);
        }
        pierced.push(pos);
    }
    None
}

/// Rock on the route becomes corridor and pierced walls become doorways. Only walls
/// around a new doorway are flagged as corners: walls beside plain corridor stay
/// pierceable so later routes can still enter a room a corridor runs along, and
/// `crowded_breach` keeps a single route from opening two touching doorways.
fn carve(map: &mut Map, path: &Path) {
    for &pos in path.steps() {
        match map.tile_kind(pos) {
            Some(TileKind::Rock) => {
                map.set_tile(pos, TileKind::Corridor);
            }
            Some(TileKind::Wall) => {
                map.set_tile(pos, TileKind::Doorway);
                for next in neighbors(pos).into_iter().chain(diagonal_neighbors(pos)) {
                    if map.tile_kind(next) == Some(TileKind::Wall) {
                        map.mark_corner(next);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Room floor inside the region of `node`, row-major.
fn floor_cells(map: &Map, tree: &BspTree, node: NodeId) -> Vec<Pos> {
    tree.region(node)
        .map(|region| {
            region
                .positions()
                .filter(|&pos| map.tile_kind(pos) == Some(TileKind::Floor) && !map.is_corner(pos))
                .collect()
        })
        .unwrap_or_default()
}

fn nearest(cells: &[Pos], target: Pos) -> Option<&Pos> {
    cells.iter().min_by_key(|&&pos| manhattan(pos, target))
}

fn tree_center(tree: &BspTree, node: NodeId) -> Pos {
    tree.region(node).map_or(Pos::new(0, 0), Rect::center)
}

fn no_route(tree: &BspTree, left: NodeId, right: NodeId) -> MapgenError {
    MapgenError::NoCorridorRoute { from: tree_center(tree, left), to: tree_center(tree, right) }
}

/// Union-find over leaf indices.
#[derive(Clone, Debug)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self { parent: (0..len).collect(), rank: vec![0; len] }
    }

    fn find(&mut self, mut item: usize) -> usize {
        while self.parent[item] != item {
            self.parent[item] = self.parent[self.parent[item]];
            item = self.parent[item];
        }
        item
    }

    fn union(&mut self, a: usize, b: usize) {
        let (a, b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        match self.rank[a].cmp(&self.rank[b]) {
            Ordering::Less => self.parent[a] = b,
            Ordering::Greater => self.parent[b] = a,
            Ordering::Equal => {
                self.parent[b] = a;
                self.rank[a] = self.rank[a].saturating_add(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomBounds;
    use crate::mapgen::bsp::Axis;
    use crate::mapgen::rooms::carve_room;
    use crate::pathfinding::{MapPassability, find_path};
    use crate::rng::SeededGenerator;
    use crate::test_support::ScriptedGenerator;
    use crate::types::Size;

    fn two_room_fixture(seed: u64) -> (Map, BspTree, SeededGenerator) {
        let mut map = Map::new(42, 14).expect("map");
        let mut tree = BspTree::new(Rect::new(1, 1, 40, 12));
        let root = tree.root();
        let (left, right) = tree.split(root, 20, Axis::X).expect("split");
        let mut generator = SeededGenerator::new(seed);
        let bounds = RoomBounds { min: Size::new(4, 4), max: Size::new(10, 8) };
        for leaf in [left, right] {
            let region = tree.region(leaf).expect("region");
            carve_room(&mut map, region, bounds, 1, &mut generator).expect("room");
        }
        (map, tree, generator)
    }

    /// Four rooms in a 2x2 grid; leaves in preorder are top-left, top-right,
    /// bottom-left, bottom-right.
    fn four_room_fixture() -> (Map, BspTree, Vec<NodeId>) {
        let mut map = Map::new(42, 26).expect("map");
        let mut tree = BspTree::new(Rect::new(1, 1, 40, 24));
        let root = tree.root();
        let (top, bottom) = tree.split(root, 12, Axis::Y).expect("split");
        tree.split(top, 20, Axis::X).expect("split top");
        tree.split(bottom, 20, Axis::X).expect("split bottom");
        let mut generator = SeededGenerator::new(3);
        let bounds = RoomBounds { min: Size::new(4, 4), max: Size::new(10, 8) };
        let leaves: Vec<NodeId> = tree.leaves(root).into_iter().collect();
        for &leaf in &leaves {
            let region = tree.region(leaf).expect("region");
            carve_room(&mut map, region, bounds, 1, &mut generator).expect("room");
        }
        (map, tree, leaves)
    }

    fn all_rooms_connected(map: &Map, tree: &BspTree, leaves: &[NodeId]) -> bool {
        let start = floor_cells(map, tree, leaves[0])[0];
        leaves.iter().all(|&leaf| {
            let goal = floor_cells(map, tree, leaf)[0];
            find_path(start, goal, 1, chebyshev, &MapPassability::new(map)).is_some()
        })
    }

    fn floor_connected(map: &Map, tree: &BspTree) -> bool {
        let (left, right) = tree.children(tree.root()).expect("split root");
        let from = floor_cells(map, tree, left)[0];
        let to = floor_cells(map, tree, right)[0];
        find_path(from, to, 1, chebyshev, &MapPassability::new(map)).is_some()
    }

    #[test]
    fn dig_predicate_refuses_border_corners_and_wall_runs() {
        let mut map = Map::new(10, 10).expect("map");
        map.set_tile(Pos::new(4, 4), TileKind::Wall);
        map.set_tile(Pos::new(5, 4), TileKind::Wall);
        map.mark_corner(Pos::new(6, 6));
        let dig = DigPassability::new(&map);
        assert!(!dig.is_passable(Pos::new(0, 5)));
        assert!(!dig.is_passable(Pos::new(5, 9)));
        assert!(!dig.is_passable(Pos::new(6, 6)));
        assert!(dig.is_passable(Pos::new(4, 4)));
        assert!(dig.can_step(Pos::new(3, 4), Pos::new(4, 4)));
        assert!(!dig.can_step(Pos::new(4, 4), Pos::new(5, 4)));
    }

    #[test]
    fn carving_turns_walls_into_doorways_and_flags_their_neighbors() {
        let mut map = Map::new(10, 10).expect("map");
        for x in 2..7 {
            map.set_tile(Pos::new(x, 5), TileKind::Wall);
        }
        let path = Path::new(vec![Pos::new(4, 3), Pos::new(4, 4), Pos::new(4, 5), Pos::new(4, 6)]);
        carve(&mut map, &path);
        assert_eq!(map.tile_kind(Pos::new(4, 4)), Some(TileKind::Corridor));
        assert_eq!(map.tile_kind(Pos::new(4, 5)), Some(TileKind::Doorway));
        assert!(map.is_corner(Pos::new(3, 5)));
        assert!(map.is_corner(Pos::new(5, 5)));
        assert!(!map.is_corner(Pos::new(2, 5)));
    }

    #[test]
    fn crowded_breaches_are_detected() {
        let mut map = Map::new(10, 10).expect("map");
        map.set_tile(Pos::new(3, 2), TileKind::Wall);
        map.set_tile(Pos::new(2, 3), TileKind::Wall);
        let path = Path::new(vec![Pos::new(3, 1), Pos::new(3, 2), Pos::new(3, 3), Pos::new(2, 3)]);
        assert_eq!(crowded_breach(&map, &path), Some(Pos::new(2, 3)));
    }

    #[test]
    fn every_strategy_joins_two_rooms() {
        for strategy in CorridorStrategy::ALL {
            let (mut map, tree, mut generator) = two_room_fixture(11);
            let links = connect_regions(&mut map, &tree, strategy, &mut generator).expect("links");
            assert!(!links.is_empty(), "{strategy:?}");
            assert!(floor_connected(&map, &tree), "{strategy:?}\n{}", map.render_ascii());
            assert!(map.count_kind(TileKind::Doorway) >= 2, "{strategy:?}");
            for link in &links {
                assert!(link.path.steps().iter().all(|&pos| map.is_passable(pos)));
            }
        }
    }

    #[test]
    fn nearest_sibling_uses_the_cells_closest_to_the_split() {
        let (mut map, tree, mut generator) = two_room_fixture(4);
        let (left, right) = tree.children(tree.root()).expect("split root");
        let meeting = tree.split_midpoint(tree.root()).expect("midpoint");
        let expected_from = *nearest(&floor_cells(&map, &tree, left), meeting).expect("floor");
        let expected_to = *nearest(&floor_cells(&map, &tree, right), meeting).expect("floor");

        let links = connect_regions(&mut map, &tree, CorridorStrategy::NearestSibling, &mut generator)
            .expect("links");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].path.first(), Some(expected_from));
        assert_eq!(links[0].path.last(), Some(expected_to));
        assert_eq!((links[0].left, links[0].right), (left, right));
    }

    #[test]
    fn chaotic_partners_are_never_the_leaf_itself() {
        let (mut map, tree, leaves) = four_room_fixture();
        let mut generator = ScriptedGenerator::repeating(&[0]);
        let links = connect_regions(&mut map, &tree, CorridorStrategy::Chaotic, &mut generator)
            .expect("links");

        assert_eq!(links.len(), 4, "every leaf already joins leaf 0, nothing to repair");
        assert_eq!((links[0].left, links[0].right), (leaves[0], leaves[1]));
        for (link, &leaf) in links[1..].iter().zip(&leaves[1..]) {
            assert_eq!((link.left, link.right), (leaf, leaves[0]));
        }
        assert!(all_rooms_connected(&map, &tree, &leaves), "{}", map.render_ascii());
    }

    #[test]
    fn chaotic_repair_joins_sibling_subtrees_left_apart() {
        let (mut map, tree, leaves) = four_room_fixture();
        let (top, bottom) = tree.children(tree.root()).expect("split root");
        // Partner draw then two endpoint draws per leaf: 0-1, 1-0, 2-3, 3-2.
        let mut generator = ScriptedGenerator::repeating(&[0, 0, 0, 0, 0, 0, 2, 0, 0, 2, 0, 0]);
        let links = connect_regions(&mut map, &tree, CorridorStrategy::Chaotic, &mut generator)
            .expect("links");

        assert_eq!(links.len(), 5);
        assert_eq!((links[2].left, links[2].right), (leaves[2], leaves[3]));
        assert_eq!((links[3].left, links[3].right), (leaves[3], leaves[2]));
        assert_eq!((links[4].left, links[4].right), (top, bottom));
        assert!(all_rooms_connected(&map, &tree, &leaves), "{}", map.render_ascii());
    }

    #[test]
    fn disjoint_set_tracks_components() {
        let mut set = DisjointSet::new(5);
        set.union(0, 1);
        set.union(3, 4);
        assert_eq!(set.find(0), set.find(1));
        assert_ne!(set.find(1), set.find(3));
        set.union(1, 4);
        assert_eq!(set.find(0), set.find(3));
        assert_ne!(set.find(2), set.find(0));
    }
}
