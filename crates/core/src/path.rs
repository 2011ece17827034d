//! Restartable, reversible coordinate sequence produced by searches and line walks.

use crate::types::Pos;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    steps: Vec<Pos>,
    cursor: usize,
}

impl Path {
    pub fn new(steps: Vec<Pos>) -> Self {
        Self { steps, cursor: 0 }
    }

    /// Returns the next coordinate and advances, or `None` once exhausted.
    pub fn walk(&mut self) -> Option<Pos> {
        let next = self.steps.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(next)
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Flips traversal order in place and rewinds the cursor.
    pub fn reverse(&mut self) {
        self.steps.reverse();
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn first(&self) -> Option<Pos> {
        self.steps.first().copied()
    }

    pub fn last(&self) -> Option<Pos> {
        self.steps.last().copied()
    }

    pub fn steps(&self) -> &[Pos] {
        &self.steps
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.steps.contains(&pos)
    }
}

impl From<Vec<Pos>> for Path {
    fn from(steps: Vec<Pos>) -> Self {
        Self::new(steps)
    }
}
