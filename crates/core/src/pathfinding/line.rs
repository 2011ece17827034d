//! Straight-line paths by incremental error accumulation, and sight checks built on them.

use crate::map::Map;
use crate::path::Path;
use crate::types::Pos;

/// Cells approximating the segment from `from` to `to`, inclusive of both ends.
///
/// Each step compares the accumulated error on both axes and moves along the axis that
/// lags; exact ties move diagonally.
pub fn straight_line(from: Pos, to: Pos) -> Path {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let sx = dx.signum();
    let sy = dy.signum();
    let total_x = dx.abs();
    let total_y = dy.abs();

    let mut steps = Vec::with_capacity((total_x + total_y + 1) as usize);
    steps.push(from);

    let mut x = from.x;
    let mut y = from.y;
    let mut step_x = 0;
    let mut step_y = 0;
    while step_x < total_x || step_y < total_y {
        let lhs = (1 + 2 * step_x) * total_y;
        let rhs = (1 + 2 * step_y) * total_x;

        if lhs == rhs {
            x += sx;
            y += sy;
            step_x += 1;
            step_y += 1;
        } else if lhs < rhs {
            x += sx;
            step_x += 1;
        } else {
            y += sy;
            step_y += 1;
        }
        steps.push(Pos { y, x });
    }

    Path::new(steps)
}

/// True when no sight-blocking tile lies strictly between the two endpoints.
pub fn line_of_sight(map: &Map, from: Pos, to: Pos) -> bool {
    let line = straight_line(from, to);
    let steps = line.steps();
    if steps.len() <= 2 {
        return true;
    }
    steps[1..steps.len() - 1].iter().all(|&pos| !map.blocks_sight(pos))
}
