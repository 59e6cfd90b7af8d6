use std::time::Duration;

use crate::state::State;

/// Why a planning attempt produced no plan
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("no actions available to plan with")]
    NoActions,

    #[error("no action sequence reaches goal [{goal}]")]
    NoPlan { goal: State },

    #[error("search discovered more than {limit} states planning for [{goal}]")]
    BudgetExceeded { goal: State, limit: usize },

    #[error("search ran longer than {limit:?} planning for [{goal}]")]
    TimedOut { goal: State, limit: Duration },
}

impl PlanError {
    /// True when the search was cut short rather than exhausted
    pub fn is_budget_exceeded(&self) -> bool {
        matches!(self, PlanError::BudgetExceeded { .. } | PlanError::TimedOut { .. })
    }
}
