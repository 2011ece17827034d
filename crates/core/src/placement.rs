//! Bounded-retry random placement of points on a map.

use tracing::warn;

use crate::map::Map;
use crate::rng::Generator;
use crate::types::{Pos, Rect};

pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

/// Random coordinate anywhere on the map accepted by `accept`.
pub fn random_location<G, F>(map: &Map, generator: &mut G, accept: F) -> Option<Pos>
where
    G: Generator + ?Sized,
    F: Fn(Pos) -> bool,
{
    random_location_in(map.bounds(), generator, accept)
}

/// Random coordinate inside `area` accepted by `accept`, giving up after
/// [`MAX_PLACEMENT_ATTEMPTS`] draws.
pub fn random_location_in<G, F>(area: Rect, generator: &mut G, accept: F) -> Option<Pos>
where
    G: Generator + ?Sized,
    F: Fn(Pos) -> bool,
{
    if area.width <= 0 || area.height <= 0 {
        return None;
    }
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let pos = Pos {
            y: generator.generate(area.y, area.bottom()),
            x: generator.generate(area.x, area.right()),
        };
        if accept(pos) {
            return Some(pos);
        }
    }
    warn!(?area, attempts = MAX_PLACEMENT_ATTEMPTS, "random placement exhausted");
    None
}
