//! Diagnostic sinks for the search
//!
//! The planner reports every node it creates and how each search ended.
//! Nothing here affects the result; the default sink drops everything.

use crate::error::PlanError;
use crate::plan::Plan;
use crate::state::State;

/// Observer of search progress
pub trait PlanTrace {
    /// A search node was created. `action` is `None` for the root.
    fn node_created(&mut self, _action: Option<&str>, _running_cost: f32, _state: &State) {}

    fn plan_found(&mut self, _plan: &Plan) {}

    /// The search ended without a plan. `last_state` is the state being
    /// expanded when it stopped (the start state if it never expanded).
    fn search_failed(&mut self, _error: &PlanError, _last_state: &State, _goal: &State) {}
}

/// Discards all trace events
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTrace;

impl PlanTrace for NullTrace {}

/// Emits trace events through `tracing` at TRACE level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTrace;

impl PlanTrace for TracingTrace {
    fn node_created(&mut self, action: Option<&str>, running_cost: f32, state: &State) {
        tracing::trace!(
            action = action.unwrap_or("<root>"),
            running_cost,
            state = %state,
            "search node"
        );
    }

    fn plan_found(&mut self, plan: &Plan) {
        tracing::trace!(cost = plan.cost(), plan = %plan, "plan found");
    }

    fn search_failed(&mut self, error: &PlanError, last_state: &State, goal: &State) {
        tracing::trace!(
            error = %error,
            last_state = %last_state,
            goal = %goal,
            "search failed"
        );
    }
}
