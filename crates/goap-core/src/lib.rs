//! GOAP Core - Shared types for the planner and the plan executor
//!
//! This crate provides the foundational types used across the workspace:
//! - Mathematical primitives (re-exported from glam)
//! - Entity identifiers and action targets
//! - Simulation clock used to time actions

pub mod time;
pub mod types;

pub use glam::{Vec2, Vec3};
pub use time::{SimTime, TimeConfig};
pub use types::{closest_target, EntityId, Positioned, Target};
