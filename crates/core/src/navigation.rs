//! Monster navigation by distance-field descent.
//!
//! A [`Navigator`] caches one field per goal and walks it downhill, one step per call.
//! Reaching the goal or losing every route drops the field; the next call then heads
//! for a fresh random destination.

use tracing::trace;

use crate::map::Map;
use crate::pathfinding::{DistanceField, MapPassability, Passability, build_distance_field};
use crate::placement::random_location;
use crate::rng::Generator;
use crate::types::{Pos, manhattan};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavStep {
    Move(Pos),
    /// Standing on the goal; the cached field has been dropped.
    Arrived,
    /// Every downhill neighbor is occupied.
    Wait,
    /// No scored neighbor exists; the cached field has been dropped.
    Stuck,
}

#[derive(Clone, Debug)]
pub struct Navigator {
    goal: Option<Pos>,
    field: Option<DistanceField>,
    heuristic: fn(Pos, Pos) -> u32,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::with_heuristic(manhattan)
    }

    pub fn with_heuristic(heuristic: fn(Pos, Pos) -> u32) -> Self {
        Self { goal: None, field: None, heuristic }
    }

    pub fn goal(&self) -> Option<Pos> {
        self.goal
    }

    pub fn field(&self) -> Option<&DistanceField> {
        self.field.as_ref()
    }

    /// Heads for `goal`, keeping the cached field only if the goal is unchanged.
    pub fn set_goal(&mut self, goal: Pos) {
        if self.goal != Some(goal) {
            self.field = None;
        }
        self.goal = Some(goal);
    }

    /// Drops the cached field, e.g. after the map changed.
    pub fn invalidate(&mut self) {
        self.field = None;
    }

    pub fn clear(&mut self) {
        self.goal = None;
        self.field = None;
    }

    /// Picks the next move from `position`. `occupied` reports cells another agent
    /// stands on.
    pub fn next_step<G, F>(
        &mut self,
        map: &Map,
        position: Pos,
        generator: &mut G,
        occupied: F,
    ) -> NavStep
    where
        G: Generator + ?Sized,
        F: Fn(Pos) -> bool,
    {
        if self.field.is_none() {
            let goal = match self.goal {
                Some(goal) => goal,
                None => {
                    let Some(goal) = random_location(map, generator, |pos| {
                        pos != position && map.is_passable(pos)
                    }) else {
                        return NavStep::Stuck;
                    };
                    goal
                }
            };
            trace!(?position, ?goal, "building navigation field");
            self.goal = Some(goal);
            self.field = Some(build_distance_field(map, goal, self.heuristic));
        }
        let Some(field) = self.field.as_ref() else {
            return NavStep::Stuck;
        };

        let own = field.score(position);
        if own == 0 {
            self.clear();
            return NavStep::Arrived;
        }

        let passable = MapPassability::new(map);
        let best = field
            .lowest_neighbor(position, |next| !occupied(next) && passable.can_step(position, next));
        match best {
            None => {
                self.clear();
                NavStep::Stuck
            }
            Some((_, score)) if score >= own => NavStep::Wait,
            Some((next, _)) => NavStep::Move(next),
        }
    }
}
