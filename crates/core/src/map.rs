//! Fixed-size tile grid shared by generation, pathfinding, and navigation.
//! Every query is bounds-checked; out-of-bounds reads yield `None` or `false`.

use std::hash::Hasher;

use bitflags::bitflags;
use xxhash_rust::xxh3::Xxh3;

use crate::error::MapgenError;
use crate::types::{Pos, Rect, TileKind};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TileFlags: u8 {
        const PASSABLE = 0x01;
        /// Generation-only mark: corridors may not dig through this cell.
        const CORNER = 0x02;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    kind: TileKind,
    flags: TileFlags,
}

impl Tile {
    pub const ROCK: Tile = Tile { kind: TileKind::Rock, flags: TileFlags::empty() };

    pub fn new(kind: TileKind) -> Self {
        let mut tile = Self::ROCK;
        tile.set_kind(kind);
        tile
    }

    pub fn kind(self) -> TileKind {
        self.kind
    }

    pub fn flags(self) -> TileFlags {
        self.flags
    }

    pub fn is_passable(self) -> bool {
        self.flags.contains(TileFlags::PASSABLE)
    }

    pub fn is_corner(self) -> bool {
        self.flags.contains(TileFlags::CORNER)
    }

    fn set_kind(&mut self, kind: TileKind) {
        self.kind = kind;
        self.flags.set(TileFlags::PASSABLE, kind.is_passable());
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Map {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Map {
    pub fn new(width: i32, height: i32) -> Result<Self, MapgenError> {
        if width <= 0 || height <= 0 {
            return Err(MapgenError::InvalidDimensions { width, height });
        }
        let cells = (width as usize)
            .checked_mul(height as usize)
            .ok_or(MapgenError::InvalidDimensions { width, height })?;
        Ok(Self { width, height, tiles: vec![Tile::ROCK; cells] })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn tile(&self, pos: Pos) -> Option<Tile> {
        self.index(pos).map(|idx| self.tiles[idx])
    }

    pub fn tile_kind(&self, pos: Pos) -> Option<TileKind> {
        self.tile(pos).map(Tile::kind)
    }

    pub fn is_passable(&self, pos: Pos) -> bool {
        self.tile(pos).is_some_and(Tile::is_passable)
    }

    pub fn is_corner(&self, pos: Pos) -> bool {
        self.tile(pos).is_some_and(Tile::is_corner)
    }

    pub fn blocks_sight(&self, pos: Pos) -> bool {
        self.tile_kind(pos).is_none_or(TileKind::blocks_sight)
    }

    /// Writes `kind` and re-derives passability. Returns `false` out of bounds.
    pub fn set_tile(&mut self, pos: Pos, kind: TileKind) -> bool {
        let Some(idx) = self.index(pos) else {
            return false;
        };
        self.tiles[idx].set_kind(kind);
        true
    }

    pub fn mark_corner(&mut self, pos: Pos) {
        if let Some(idx) = self.index(pos) {
            self.tiles[idx].flags.insert(TileFlags::CORNER);
        }
    }

    /// Drops every generation-only mark once carving is finished.
    pub fn clear_corner_marks(&mut self) {
        for tile in &mut self.tiles {
            tile.flags.remove(TileFlags::CORNER);
        }
    }

    pub fn open_door(&mut self, pos: Pos) -> bool {
        if self.tile_kind(pos) != Some(TileKind::Doorway) {
            return false;
        }
        self.set_tile(pos, TileKind::DoorwayOpen)
    }

    /// Row-major iteration over every coordinate.
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        self.bounds().positions()
    }

    pub fn count_kind(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| tile.kind == kind).count()
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.tiles.len() * 2);
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for tile in &self.tiles {
            bytes.push(tile.kind.code());
            bytes.push(tile.flags.bits());
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write(&self.canonical_bytes());
        hasher.finish()
    }

    /// One glyph per tile, rows separated by newlines.
    pub fn render_ascii(&self) -> String {
        let mut text = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { y, x };
                text.push(self.tile_kind(pos).map_or('?', TileKind::glyph));
            }
            text.push('\n');
        }
        text
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.y as usize) * (self.width as usize) + (pos.x as usize))
    }
}
