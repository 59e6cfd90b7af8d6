//! Collaborators the executor talks to
//!
//! The agent context `C` implements all of these; [`GoapContext`] is the
//! bundle the executor asks for.

use goap_core::{Positioned, Target};
use goap_planner::{Goal, Plan, PlanError, State};

use crate::error::ExecutionError;

/// Supplies the facts the planner starts from and the goal it aims for
pub trait WorldStateProvider {
    /// Snapshot of the world as the agent currently sees it
    fn world_state(&self) -> State;

    /// The goal to plan for next, or `None` when there is nothing to do
    fn create_goal_state(&self) -> Option<Goal>;
}

/// Receives planning and execution outcomes
pub trait PlanOutcomeSink {
    fn plan_found(&mut self, goal: &Goal, plan: &Plan);

    fn plan_failed(&mut self, goal: &Goal, error: &PlanError);

    /// A running plan was abandoned
    fn plan_aborted(&mut self, error: &ExecutionError);

    fn actions_finished(&mut self);

    /// Polled at the start of every tick. Returning true makes the agent
    /// throw away its current plan and go back to planning.
    fn take_replan_request(&mut self) -> bool {
        false
    }
}

/// Moves the agent towards action targets
pub trait Locomotion {
    /// Step towards `target`. Returns true once the agent is in range.
    fn move_agent(&mut self, target: &Target) -> bool;
}

/// Everything an agent context has to provide
pub trait GoapContext: Positioned + WorldStateProvider + PlanOutcomeSink + Locomotion {}

impl<T> GoapContext for T where T: Positioned + WorldStateProvider + PlanOutcomeSink + Locomotion {}
