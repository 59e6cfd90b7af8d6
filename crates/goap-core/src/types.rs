//! Core types used throughout the GOAP crates

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entity an action can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an entity ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything with a location in the world, agents included
pub trait Positioned {
    fn position(&self) -> Vec3;
}

/// An entity an action must be performed on, with the position it was seen at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub entity: EntityId,
    pub position: Vec3,
}

impl Target {
    pub fn new(entity: EntityId, position: Vec3) -> Self {
        Self { entity, position }
    }

    /// Straight-line distance from `from` to this target
    pub fn distance_from(&self, from: Vec3) -> f32 {
        from.distance(self.position)
    }
}

impl Positioned for Target {
    fn position(&self) -> Vec3 {
        self.position
    }
}

/// Pick the candidate nearest to `position`, if any
pub fn closest_target<I>(candidates: I, position: Vec3) -> Option<Target>
where
    I: IntoIterator<Item = Target>,
{
    let mut best: Option<(Target, f32)> = None;
    for candidate in candidates {
        let dist = candidate.distance_from(position);
        match best {
            Some((_, best_dist)) if best_dist <= dist => {}
            _ => best = Some((candidate, dist)),
        }
    }
    best.map(|(target, _)| target)
}
