//! GOAP agent executor
//!
//! [`GoapAgent`] turns goals from its context into plans and runs them with a
//! small stack machine: Idle plans, PerformAction runs the queued actions one
//! step per tick, MoveTo walks to action targets.

pub mod agent;
pub mod context;
pub mod error;
pub mod fsm;
pub mod library;

pub use agent::GoapAgent;
pub use context::{GoapContext, Locomotion, PlanOutcomeSink, WorldStateProvider};
pub use error::ExecutionError;
pub use fsm::{AgentState, StateChange, StateMachine, StateTransition};
pub use library::{ActionLibrary, GoalActions};
