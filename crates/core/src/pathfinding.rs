//! Grid search toolkit shared by dungeon generation and monster navigation.
//! Searches are parameterized by a passability predicate and a heuristic so the same
//! code digs corridors, checks connectivity, and scores distance fields.

mod astar;
mod field;
mod line;
mod passability;

pub use astar::{SearchScratch, find_path};
pub use field::{DistanceField, UNREACHABLE, build_distance_field};
pub use line::{line_of_sight, straight_line};
pub use passability::{AlwaysPassable, MapPassability, Passability};

use crate::types::{Pos, diagonal_neighbors, neighbors};

/// Candidate moves from `pos`: orthogonal steps at cost 1, then diagonal steps at
/// `diagonal_cost` unless it is zero.
pub(crate) fn steps(pos: Pos, diagonal_cost: u32) -> impl Iterator<Item = (Pos, u32)> {
    let diagonals = if diagonal_cost == 0 { 0 } else { 4 };
    neighbors(pos)
        .into_iter()
        .map(|next| (next, 1))
        .chain(diagonal_neighbors(pos).into_iter().take(diagonals).map(move |next| (next, diagonal_cost)))
}

pub(crate) fn is_diagonal(from: Pos, to: Pos) -> bool {
    from.x != to.x && from.y != to.y
}
