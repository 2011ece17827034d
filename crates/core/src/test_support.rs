//! Shared fixtures for unit tests across the crate.
//! This module exists so tests can drive randomized code with a known integer stream.
//! It does not own production logic.

use crate::map::Map;
use crate::rng::Generator;
use crate::types::{Rect, TileKind};

/// Replays a fixed script of values, wrapping them into each requested range.
#[derive(Clone, Debug)]
pub(crate) struct ScriptedGenerator {
    values: Vec<i32>,
    cursor: usize,
}

impl ScriptedGenerator {
    pub(crate) fn repeating(values: &[i32]) -> Self {
        assert!(!values.is_empty(), "script must not be empty");
        Self { values: values.to_vec(), cursor: 0 }
    }
}

impl Generator for ScriptedGenerator {
    fn generate(&mut self, min: i32, max: i32) -> i32 {
        if min > max {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        let span = i64::from(max) - i64::from(min) + 1;
        (i64::from(min) + i64::from(value).rem_euclid(span)) as i32
    }
}

pub(crate) fn open_map(width: i32, height: i32) -> Map {
    let mut map = Map::new(width, height).expect("map");
    for pos in Rect::new(0, 0, width, height).positions() {
        map.set_tile(pos, TileKind::Floor);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_wraps_into_each_range() {
        let mut generator = ScriptedGenerator::repeating(&[0, 5, -1]);
        assert_eq!(generator.generate(3, 4), 3);
        assert_eq!(generator.generate(3, 4), 4);
        assert_eq!(generator.generate(3, 4), 4);
        assert_eq!(generator.generate(10, 12), 10);
        assert_eq!(generator.generate(2, 1), 0);
    }
}
