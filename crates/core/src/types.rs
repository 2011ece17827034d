//! Coordinates, rectangles, and tile kinds shared by every engine component.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }
}

/// Orthogonal neighbors in north, east, south, west order.
pub fn neighbors(p: Pos) -> [Pos; 4] {
    [
        Pos { y: p.y - 1, x: p.x },
        Pos { y: p.y, x: p.x + 1 },
        Pos { y: p.y + 1, x: p.x },
        Pos { y: p.y, x: p.x - 1 },
    ]
}

/// Diagonal neighbors in north-east, south-east, south-west, north-west order.
pub fn diagonal_neighbors(p: Pos) -> [Pos; 4] {
    [
        Pos { y: p.y - 1, x: p.x + 1 },
        Pos { y: p.y + 1, x: p.x + 1 },
        Pos { y: p.y + 1, x: p.x - 1 },
        Pos { y: p.y - 1, x: p.x - 1 },
    ]
}

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

pub fn chebyshev(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x).max(a.y.abs_diff(b.y))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle addressed by its top-left corner, inclusive of both edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(self) -> i32 {
        self.x + self.width - 1
    }

    pub fn bottom(self) -> i32 {
        self.y + self.height - 1
    }

    pub fn area(self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    pub fn center(self) -> Pos {
        Pos { y: self.y + self.height / 2, x: self.x + self.width / 2 }
    }

    pub fn contains(self, pos: Pos) -> bool {
        pos.x >= self.x && pos.x <= self.right() && pos.y >= self.y && pos.y <= self.bottom()
    }

    /// Shrinks every side by `margin`; `None` when nothing is left.
    pub fn shrunk(self, margin: i32) -> Option<Self> {
        let width = self.width - 2 * margin;
        let height = self.height - 2 * margin;
        (width > 0 && height > 0).then_some(Self {
            x: self.x + margin,
            y: self.y + margin,
            width,
            height,
        })
    }

    pub fn is_perimeter(self, pos: Pos) -> bool {
        self.contains(pos)
            && (pos.x == self.x || pos.x == self.right() || pos.y == self.y || pos.y == self.bottom())
    }

    pub fn corners(self) -> [Pos; 4] {
        [
            Pos { y: self.y, x: self.x },
            Pos { y: self.y, x: self.right() },
            Pos { y: self.bottom(), x: self.right() },
            Pos { y: self.bottom(), x: self.x },
        ]
    }

    /// Row-major iteration over every cell.
    pub fn positions(self) -> impl Iterator<Item = Pos> {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| Pos { y, x }))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileKind {
    Rock,
    Floor,
    Wall,
    Corridor,
    Doorway,
    DoorwayOpen,
    StairUp,
    StairDown,
}

impl TileKind {
    /// Stairs count as walkable next to floor, corridor and doorway tiles so agents can
    /// reach them.
    pub const fn is_passable(self) -> bool {
        matches!(
            self,
            TileKind::Floor
                | TileKind::Corridor
                | TileKind::Doorway
                | TileKind::DoorwayOpen
                | TileKind::StairUp
                | TileKind::StairDown
        )
    }

    pub const fn blocks_sight(self) -> bool {
        matches!(self, TileKind::Rock | TileKind::Wall | TileKind::Doorway)
    }

    pub const fn is_wall_like(self) -> bool {
        matches!(self, TileKind::Wall | TileKind::Doorway | TileKind::DoorwayOpen)
    }

    pub const fn glyph(self) -> char {
        match self {
            TileKind::Rock => ' ',
            TileKind::Floor => '.',
            TileKind::Wall => '#',
            TileKind::Corridor => ',',
            TileKind::Doorway => '+',
            TileKind::DoorwayOpen => '\'',
            TileKind::StairUp => '<',
            TileKind::StairDown => '>',
        }
    }

    pub(crate) const fn code(self) -> u8 {
        match self {
            TileKind::Rock => 0,
            TileKind::Floor => 1,
            TileKind::Wall => 2,
            TileKind::Corridor => 3,
            TileKind::Doorway => 4,
            TileKind::DoorwayOpen => 5,
            TileKind::StairUp => 6,
            TileKind::StairDown => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_positions_cover_area_in_row_major_order() {
        let rect = Rect::new(2, 3, 3, 2);
        let cells: Vec<Pos> = rect.positions().collect();
        assert_eq!(cells.len() as i64, rect.area());
        assert_eq!(cells.first(), Some(&Pos::new(2, 3)));
        assert_eq!(cells[3], Pos::new(2, 4));
        assert_eq!(cells.last(), Some(&Pos::new(4, 4)));
    }

    #[test]
    fn shrinking_past_zero_yields_nothing() {
        assert_eq!(Rect::new(0, 0, 4, 6).shrunk(1), Some(Rect::new(1, 1, 2, 4)));
        assert_eq!(Rect::new(0, 0, 4, 6).shrunk(2), None);
    }

    #[test]
    fn passability_follows_kind() {
        for kind in [TileKind::Rock, TileKind::Wall] {
            assert!(!kind.is_passable(), "{kind:?}");
        }
        for kind in [
            TileKind::Floor,
            TileKind::Corridor,
            TileKind::Doorway,
            TileKind::DoorwayOpen,
            TileKind::StairUp,
            TileKind::StairDown,
        ] {
            assert!(kind.is_passable(), "{kind:?}");
        }
    }
}
