//! Passability predicates injected into searches.

use super::is_diagonal;
use crate::map::Map;
use crate::types::Pos;

pub trait Passability {
    fn is_passable(&self, pos: Pos) -> bool;

    /// Whether a single move from `from` to the adjacent `to` is allowed.
    fn can_step(&self, from: Pos, to: Pos) -> bool {
        let _ = from;
        self.is_passable(to)
    }
}

impl<F> Passability for F
where
    F: Fn(Pos) -> bool,
{
    fn is_passable(&self, pos: Pos) -> bool {
        self(pos)
    }
}

/// Every coordinate is open. Used for abstract connectivity checks.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysPassable;

impl Passability for AlwaysPassable {
    fn is_passable(&self, _pos: Pos) -> bool {
        true
    }
}

/// Walkable tiles of a map; diagonal moves may not cut past a blocked corner.
#[derive(Clone, Copy, Debug)]
pub struct MapPassability<'a> {
    map: &'a Map,
}

impl<'a> MapPassability<'a> {
    pub fn new(map: &'a Map) -> Self {
        Self { map }
    }
}

impl Passability for MapPassability<'_> {
    fn is_passable(&self, pos: Pos) -> bool {
        self.map.is_passable(pos)
    }

    fn can_step(&self, from: Pos, to: Pos) -> bool {
        if !self.map.is_passable(to) {
            return false;
        }
        if !is_diagonal(from, to) {
            return true;
        }
        self.map.is_passable(Pos { y: from.y, x: to.x })
            && self.map.is_passable(Pos { y: to.y, x: from.x })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileKind;

    #[test]
    fn closures_act_as_predicates() {
        let only_even_x = |pos: Pos| pos.x % 2 == 0;
        assert!(only_even_x.can_step(Pos::new(1, 0), Pos::new(2, 0)));
        assert!(!only_even_x.can_step(Pos::new(0, 0), Pos::new(1, 0)));
    }

    #[test]
    fn map_predicate_forbids_corner_cutting() {
        let mut map = Map::new(3, 3).expect("map");
        for pos in [Pos::new(0, 0), Pos::new(1, 1), Pos::new(0, 1)] {
            map.set_tile(pos, TileKind::Floor);
        }
        let passable = MapPassability::new(&map);
        assert!(passable.can_step(Pos::new(0, 0), Pos::new(0, 1)));
        assert!(passable.can_step(Pos::new(0, 1), Pos::new(1, 1)));
        assert!(!passable.can_step(Pos::new(0, 0), Pos::new(1, 1)), "(1,0) is rock");

        map.set_tile(Pos::new(1, 0), TileKind::Corridor);
        let passable = MapPassability::new(&map);
        assert!(passable.can_step(Pos::new(0, 0), Pos::new(1, 1)));
    }
}
