//! Stable min-priority queue: lowest priority first, equal priorities in insertion order.

use std::collections::{BTreeMap, btree_map};

#[derive(Clone, Debug)]
pub struct PriorityQueue<T, P = i64> {
    entries: BTreeMap<(P, u64), T>,
    next_seq: u64,
}

impl<T, P: Ord + Copy> PriorityQueue<T, P> {
    pub fn new() -> Self {
        Self { entries: BTreeMap::new(), next_seq: 0 }
    }

    pub fn push(&mut self, data: T, priority: P) {
        self.entries.insert((priority, self.next_seq), data);
        self.next_seq += 1;
    }

    pub fn pop(&mut self) -> Option<T> {
        self.pop_with_priority().map(|(data, _)| data)
    }

    pub fn pop_with_priority(&mut self) -> Option<(T, P)> {
        self.entries.pop_first().map(|((priority, _), data)| (data, priority))
    }

    pub fn peek(&self) -> Option<&T> {
        self.entries.first_key_value().map(|(_, data)| data)
    }

    pub fn peek_priority(&self) -> Option<P> {
        self.entries.first_key_value().map(|((priority, _), _)| *priority)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_seq = 0;
    }
}

impl<T, P: Ord + Copy> Default for PriorityQueue<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Drains in pop order.
impl<T, P: Ord + Copy> IntoIterator for PriorityQueue<T, P> {
    type Item = T;
    type IntoIter = btree_map::IntoValues<(P, u64), T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}
