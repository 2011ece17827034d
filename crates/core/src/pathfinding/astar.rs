//! A* search with injected heuristic and passability.

use std::collections::BTreeMap;

use tracing::trace;

use super::passability::Passability;
use super::steps;
use crate::path::Path;
use crate::queue::PriorityQueue;
use crate::types::Pos;

#[derive(Clone, Copy, Debug)]
struct SearchNode {
    pos: Pos,
    g: u32,
    f: u32,
    parent: Option<usize>,
}

/// Reusable open set, best-cost table, and node arena for one searcher.
///
/// Each owner keeps its own scratch so repeated searches avoid reallocating without
/// sharing mutable state between callers.
#[derive(Debug, Default)]
pub struct SearchScratch {
    nodes: Vec<SearchNode>,
    open: PriorityQueue<usize, u32>,
    best_f: BTreeMap<Pos, u32>,
}

impl SearchScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of coordinates that received a cost during the last search.
    pub fn visited(&self) -> usize {
        self.best_f.len()
    }

    /// Finds a route from `start` to `end`, inclusive of both.
    ///
    /// Orthogonal moves cost 1; diagonal moves cost `diagonal_cost` and are skipped when
    /// it is zero. A coordinate is queued again only when its new estimate is strictly
    /// lower than every estimate recorded for it. The predicate must confine the search
    /// to a finite region when `end` may be unreachable.
    pub fn find_path<H, P>(
        &mut self,
        start: Pos,
        end: Pos,
        diagonal_cost: u32,
        heuristic: H,
        passable: &P,
    ) -> Option<Path>
    where
        H: Fn(Pos, Pos) -> u32,
        P: Passability + ?Sized,
    {
        self.clear();

        let h = heuristic(start, end);
        self.nodes.push(SearchNode { pos: start, g: 0, f: h, parent: None });
        self.best_f.insert(start, h);
        self.open.push(0, h);

        while let Some(index) = self.open.pop() {
            let current = self.nodes[index];
            if self.best_f.get(&current.pos).is_some_and(|&best| current.f > best) {
                continue;
            }
            if current.pos == end {
                return Some(self.reconstruct(index));
            }

            for (next, cost) in steps(current.pos, diagonal_cost) {
                if !passable.can_step(current.pos, next) {
                    continue;
                }
                let g = current.g.saturating_add(cost);
                let f = g.saturating_add(heuristic(next, end));
                if self.best_f.get(&next).is_some_and(|&best| f >= best) {
                    continue;
                }
                self.best_f.insert(next, f);
                self.nodes.push(SearchNode { pos: next, g, f, parent: Some(index) });
                self.open.push(self.nodes.len() - 1, f);
            }
        }

        trace!(?start, ?end, visited = self.best_f.len(), "open set exhausted without a route");
        None
    }

    fn reconstruct(&self, mut index: usize) -> Path {
        let mut steps = vec![self.nodes[index].pos];
        while let Some(parent) = self.nodes[index].parent {
            index = parent;
            steps.push(self.nodes[index].pos);
        }
        steps.reverse();
        Path::new(steps)
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.open.clear();
        self.best_f.clear();
    }
}

/// One-shot search with fresh scratch state.
pub fn find_path<H, P>(
    start: Pos,
    end: Pos,
    diagonal_cost: u32,
    heuristic: H,
    passable: &P,
) -> Option<Path>
where
    H: Fn(Pos, Pos) -> u32,
    P: Passability + ?Sized,
{
    SearchScratch::new().find_path(start, end, diagonal_cost, heuristic, passable)
}
