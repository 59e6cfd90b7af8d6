//! GOAP planner: owns one in-flight search and advances it a slice at a time

use goap_core::Positioned;
use tracing::{debug, warn};

use crate::action::{ActionId, ActionPool};
use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::plan::Plan;
use crate::search::{PlanSearch, SearchStatus};
use crate::state::State;
use crate::trace::{NullTrace, PlanTrace};

pub struct GoapPlanner {
    config: PlannerConfig,
    search: Option<PlanSearch>,
    trace: Box<dyn PlanTrace>,
}

impl GoapPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            search: None,
            trace: Box::new(NullTrace),
        }
    }

    /// Replace the diagnostic sink
    pub fn with_trace(mut self, trace: Box<dyn PlanTrace>) -> Self {
        self.trace = trace;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Whether a search is in flight
    pub fn is_planning(&self) -> bool {
        self.search.is_some()
    }

    /// Start planning for `goal` from `world`, dropping any search in flight.
    /// Drive it with [`GoapPlanner::update`].
    pub fn begin<C: Positioned>(
        &mut self,
        ctx: &C,
        pool: &mut ActionPool<C>,
        available: &[ActionId],
        world: State,
        goal: State,
    ) {
        if self.search.is_some() {
            debug!("discarding in-flight search");
        }
        self.search = Some(PlanSearch::start(
            ctx,
            pool,
            available,
            world,
            goal,
            &self.config,
        ));
    }

    /// Advance the search by one slice. Returns the outcome once the
    /// search has finished; the planner is then free for the next request.
    pub fn update(&mut self) -> Option<Result<Plan, PlanError>> {
        let search = self.search.as_mut()?;
        let outcome = match search.step_traced(self.config.slice_budget(), self.trace.as_mut()) {
            SearchStatus::Running => return None,
            SearchStatus::Found(plan) => Ok(plan),
            SearchStatus::Failed(err) => {
                if err.is_budget_exceeded() {
                    warn!(error = %err, "planning aborted by search budget");
                }
                Err(err)
            }
        };
        self.search = None;
        Some(outcome)
    }

    /// Drop the search in flight, if any
    pub fn cancel(&mut self) {
        self.search = None;
    }

    /// Find a sequence of actions that transforms `world` into a state that
    /// satisfies `goal`, running the search to completion in one call.
    pub fn plan<C: Positioned>(
        &mut self,
        ctx: &C,
        pool: &mut ActionPool<C>,
        available: &[ActionId],
        world: State,
        goal: State,
    ) -> Result<Plan, PlanError> {
        self.begin(ctx, pool, available, world, goal);
        loop {
            if let Some(outcome) = self.update() {
                return outcome;
            }
        }
    }
}

impl Default for GoapPlanner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}
