//! Dijkstra distance fields: every reachable walkable cell scored by route cost to one
//! target. Agents descend the field greedily toward score zero.

use std::collections::BTreeMap;

use tracing::trace;

use super::passability::{MapPassability, Passability};
use crate::map::Map;
use crate::queue::PriorityQueue;
use crate::types::{Pos, diagonal_neighbors, neighbors};

/// Score reported for coordinates the field never reached.
pub const UNREACHABLE: u32 = u32::MAX;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    target: Pos,
    scores: BTreeMap<Pos, u32>,
}

impl DistanceField {
    pub fn target(&self) -> Pos {
        self.target
    }

    pub fn score(&self, pos: Pos) -> u32 {
        self.scores.get(&pos).copied().unwrap_or(UNREACHABLE)
    }

    pub fn is_reachable(&self, pos: Pos) -> bool {
        self.scores.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, u32)> + '_ {
        self.scores.iter().map(|(&pos, &score)| (pos, score))
    }

    /// Lowest-scored neighbor of `pos` accepted by `is_open`, with its score.
    /// Orthogonal neighbors are enumerated before diagonal ones; the first minimum wins.
    pub fn lowest_neighbor<F>(&self, pos: Pos, is_open: F) -> Option<(Pos, u32)>
    where
        F: Fn(Pos) -> bool,
    {
        let mut best: Option<(Pos, u32)> = None;
        for next in neighbors(pos).into_iter().chain(diagonal_neighbors(pos)) {
            let Some(&score) = self.scores.get(&next) else {
                continue;
            };
            if !is_open(next) {
                continue;
            }
            if best.is_none_or(|(_, best_score)| score < best_score) {
                best = Some((next, score));
            }
        }
        best
    }

    /// Neighbor one step closer to the target than `pos`, if any. Only steps `map`
    /// allows are offered, so diagonals never cut a blocked corner.
    pub fn nearest_lower_neighbor(&self, map: &Map, pos: Pos) -> Option<Pos> {
        let own = self.score(pos);
        let passable = MapPassability::new(map);
        self.lowest_neighbor(pos, |next| passable.can_step(pos, next))
            .filter(|&(_, score)| score < own)
            .map(|(next, _)| next)
    }
}

/// Scores every walkable cell reachable from `target`; each move costs
/// `heuristic(from, to)` and diagonal moves may not cut corners.
pub fn build_distance_field<H>(map: &Map, target: Pos, heuristic: H) -> DistanceField
where
    H: Fn(Pos, Pos) -> u32,
{
    let passable = MapPassability::new(map);
    let mut scores = BTreeMap::new();
    let mut open: PriorityQueue<Pos, u32> = PriorityQueue::new();
    scores.insert(target, 0);
    open.push(target, 0);

    while let Some((pos, score)) = open.pop_with_priority() {
        if scores.get(&pos).is_some_and(|&best| score > best) {
            continue;
        }
        for next in neighbors(pos).into_iter().chain(diagonal_neighbors(pos)) {
            if !passable.can_step(pos, next) {
                continue;
            }
            let candidate = score.saturating_add(heuristic(pos, next));
            if scores.get(&next).is_some_and(|&best| candidate >= best) {
                continue;
            }
            scores.insert(next, candidate);
            open.push(next, candidate);
        }
    }

    trace!(?target, reached = scores.len(), "distance field built");
    DistanceField { target, scores }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::open_map;
    use crate::types::{TileKind, chebyshev, manhattan};

    #[test]
    fn target_scores_zero_and_orthogonal_neighbors_one() {
        let map = open_map(21, 21);
        let target = Pos::new(10, 10);
        let field = build_distance_field(&map, target, manhattan);
        assert_eq!(field.score(target), 0);
        for next in neighbors(target) {
            assert_eq!(field.score(next), 1, "{next:?}");
        }
        assert_eq!(field.score(Pos::new(11, 11)), 2);
        assert_eq!(field.len(), 21 * 21);
    }

    #[test]
    fn chebyshev_scores_diagonals_as_single_steps() {
        let map = open_map(9, 9);
        let field = build_distance_field(&map, Pos::new(4, 4), chebyshev);
        assert_eq!(field.score(Pos::new(7, 7)), 3);
        assert_eq!(field.score(Pos::new(0, 8)), 4);
    }

    #[test]
    fn walls_force_detours_and_isolated_cells_stay_unreachable() {
        let mut map = open_map(9, 5);
        for y in 0..4 {
            map.set_tile(Pos::new(4, y), TileKind::Wall);
        }
        for pos in [Pos::new(7, 0), Pos::new(8, 1), Pos::new(7, 1)] {
            map.set_tile(pos, TileKind::Wall);
        }

        let field = build_distance_field(&map, Pos::new(2, 0), manhattan);
        assert_eq!(field.score(Pos::new(6, 0)), 12, "around the wall through row 4");
        assert_eq!(field.score(Pos::new(8, 0)), UNREACHABLE);
        assert!(!field.is_reachable(Pos::new(4, 0)));
    }

    #[test]
    fn descending_the_field_reaches_the_target() {
        let mut map = open_map(12, 8);
        for y in 1..8 {
            map.set_tile(Pos::new(6, y), TileKind::Wall);
        }
        let target = Pos::new(10, 6);
        let field = build_distance_field(&map, target, manhattan);

        let mut pos = Pos::new(1, 6);
        for _ in 0..64 {
            if pos == target {
                break;
            }
            pos = field.nearest_lower_neighbor(&map, pos).expect("a lower neighbor always exists");
        }
        assert_eq!(pos, target);
        assert_eq!(field.nearest_lower_neighbor(&map, target), None);
    }

    #[test]
    fn descent_never_cuts_a_walled_corner() {
        let mut map = Map::new(2, 2).expect("map");
        for pos in [Pos::new(0, 1), Pos::new(1, 1), Pos::new(1, 0)] {
            map.set_tile(pos, TileKind::Floor);
        }
        map.set_tile(Pos::new(0, 0), TileKind::Wall);

        let target = Pos::new(1, 0);
        let field = build_distance_field(&map, target, manhattan);
        assert_eq!(field.score(Pos::new(0, 1)), 2);
        assert_eq!(field.nearest_lower_neighbor(&map, Pos::new(0, 1)), Some(Pos::new(1, 1)));
        assert_eq!(field.nearest_lower_neighbor(&map, Pos::new(1, 1)), Some(target));
    }

    #[test]
    fn occupied_neighbors_are_skipped() {
        let map = open_map(5, 5);
        let field = build_distance_field(&map, Pos::new(4, 2), manhattan);
        let occupied = Pos::new(3, 2);
        assert_eq!(field.lowest_neighbor(Pos::new(2, 2), |_| true), Some((occupied, 1)));
        let (next, score) = field
            .lowest_neighbor(Pos::new(2, 2), |pos| pos != occupied)
            .expect("free neighbor");
        assert_eq!((next, score), (Pos::new(3, 1), 2));
    }
}
