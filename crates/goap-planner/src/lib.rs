//! Goal Oriented Action Planning (GOAP) planner
//!
//! Finds the cheapest known sequence of actions whose combined effects turn
//! a start [`State`] into one satisfying a goal. The search is explicit and
//! resumable: [`PlanSearch::step`] runs for a bounded slice of wall-clock
//! time and can be called again on a later tick.
//!
//! - [`State`], [`Fact`], [`Assertion`]: symbolic world facts
//! - [`Action`], [`ActionBase`], [`ActionPool`]: what an agent can do
//! - [`PlanSearch`], [`GoapPlanner`]: the search and its per-agent owner
//! - [`PlanTrace`]: optional diagnostics

pub mod action;
pub mod config;
pub mod error;
pub mod goal;
pub mod plan;
pub mod planner;
pub mod search;
pub mod state;
pub mod trace;

pub use action::{Action, ActionBase, ActionId, ActionPool, BasicAction};
pub use config::{PlannerConfig, TravelConfig};
pub use error::PlanError;
pub use goal::Goal;
pub use plan::{Plan, PlanStep};
pub use planner::GoapPlanner;
pub use search::{PlanSearch, SearchStatus};
pub use state::{Assertion, Fact, State};
pub use trace::{NullTrace, PlanTrace, TracingTrace};
