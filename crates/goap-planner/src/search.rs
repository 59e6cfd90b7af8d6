//! Resumable forward search over symbolic states
//!
//! [`PlanSearch`] expands states depth-first from the start state using an
//! explicit stack, skipping any state it has produced before. The search
//! can be suspended between any two transitions and picked up again on a
//! later tick, so it never holds a simulation tick longer than its slice.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use goap_core::Positioned;
use tracing::{debug, error};

use crate::action::{ActionId, ActionPool};
use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::plan::{Plan, PlanStep};
use crate::state::State;
use crate::trace::{NullTrace, PlanTrace};

/// Result of advancing a search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus {
    /// Out of time for this slice; call `step` again later
    Running,
    Found(Plan),
    Failed(PlanError),
}

/// Planning view of a usable action, captured when the search starts
#[derive(Debug, Clone)]
struct Candidate {
    id: ActionId,
    name: String,
    preconditions: State,
    effects: State,
    cost: f32,
}

/// A node in the search tree
#[derive(Debug)]
struct SearchNode {
    parent: Option<usize>,
    /// Cost of every action from the root to here
    running_cost: f32,
    /// World state after applying actions so far
    state: State,
    /// Index into `candidates` of the action that produced this node
    action: Option<usize>,
}

/// Incremental, budgeted planning computation
#[derive(Debug)]
pub struct PlanSearch {
    candidates: Vec<Candidate>,
    goal: State,
    /// Arena of all nodes; parents are referred to by index
    nodes: Vec<SearchNode>,
    stack: Vec<usize>,
    visited: HashSet<String>,
    /// States discovered beyond the start state
    discovered: usize,
    max_discovered: usize,
    /// Node being expanded when the last slice ran out, and the next candidate to try
    cursor: Option<(usize, usize)>,
    best: Option<usize>,
    leaves: usize,
    time_limit: Option<Duration>,
    started: Instant,
    outcome: Option<SearchStatus>,
}

impl PlanSearch {
    /// Prepare a search for `goal` from `world`.
    ///
    /// Every available action is reset, then filtered through its procedural
    /// precondition. Costs are taken from the agent's position at this point.
    pub fn start<C: Positioned>(
        ctx: &C,
        pool: &mut ActionPool<C>,
        available: &[ActionId],
        world: State,
        goal: State,
        config: &PlannerConfig,
    ) -> Self {
        let mut search = Self::empty(world.clone(), goal.clone(), config);

        if available.is_empty() {
            debug!(goal = %goal, "no actions available");
            search.outcome = Some(SearchStatus::Failed(PlanError::NoActions));
            return search;
        }

        for id in available {
            if let Some(action) = pool.get_mut(*id) {
                action.do_reset();
            }
        }

        let position = ctx.position();
        for id in available {
            let Some(action) = pool.get_mut(*id) else {
                continue;
            };
            if !action.check_procedural_precondition(ctx) {
                continue;
            }
            search.candidates.push(Candidate {
                id: *id,
                name: action.name().to_string(),
                preconditions: action.preconditions().clone(),
                effects: action.effects().clone(),
                cost: action.cost(position, &config.travel),
            });
        }

        debug!(
            available = available.len(),
            usable = search.candidates.len(),
            goal = %goal,
            "planning search started"
        );

        if world.satisfies(&goal) {
            search.outcome = Some(SearchStatus::Found(Plan::empty()));
        }

        search
    }

    fn empty(world: State, goal: State, config: &PlannerConfig) -> Self {
        let mut visited = HashSet::new();
        visited.insert(world.canonical_key());

        Self {
            candidates: Vec::new(),
            goal,
            nodes: vec![SearchNode {
                parent: None,
                running_cost: 0.0,
                state: world,
                action: None,
            }],
            stack: vec![0],
            visited,
            discovered: 0,
            max_discovered: config.max_visited_states,
            cursor: None,
            best: None,
            leaves: 0,
            time_limit: config.max_search_time(),
            started: Instant::now(),
            outcome: None,
        }
    }

    pub fn goal(&self) -> &State {
        &self.goal
    }

    /// Whether the search has produced its outcome
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Number of states discovered beyond the start state
    pub fn discovered(&self) -> usize {
        self.discovered
    }

    /// Number of goal-satisfying nodes seen so far
    pub fn leaves(&self) -> usize {
        self.leaves
    }

    /// Advance the search for at most `slice` of wall-clock time
    pub fn step(&mut self, slice: Duration) -> SearchStatus {
        self.step_traced(slice, &mut NullTrace)
    }

    /// Like [`PlanSearch::step`], reporting progress to `trace`
    pub fn step_traced(&mut self, slice: Duration, trace: &mut dyn PlanTrace) -> SearchStatus {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        if self.nodes.len() == 1 && self.cursor.is_none() && self.stack.len() == 1 {
            trace.node_created(None, 0.0, &self.nodes[0].state);
        }

        let slice_start = Instant::now();
        loop {
            if let Some(limit) = self.time_limit {
                if self.started.elapsed() > limit {
                    error!(goal = %self.goal, ?limit, "search time exceeded, planning failed");
                    let err = PlanError::TimedOut {
                        goal: self.goal.clone(),
                        limit,
                    };
                    let last = self.cursor.map_or(0, |(node, _)| node);
                    trace.search_failed(&err, &self.nodes[last].state, &self.goal);
                    return self.finish(SearchStatus::Failed(err));
                }
            }

            let (parent, mut next) = match self.cursor.take() {
                Some(cursor) => cursor,
                None => match self.stack.pop() {
                    Some(node) => (node, 0),
                    None => return self.complete(trace),
                },
            };

            while next < self.candidates.len() {
                let candidate = next;
                next += 1;

                let parent_node = &self.nodes[parent];
                let action = &self.candidates[candidate];
                if !parent_node.state.satisfies(&action.preconditions) {
                    continue;
                }

                let state = parent_node.state.applied(&action.effects);
                let satisfied = state.satisfies(&self.goal);
                // Goal states are never expanded, so a repeat only matters
                // if it arrives cheaper.
                let is_new = self.visited.insert(state.canonical_key());
                if !is_new && !satisfied {
                    continue;
                }

                if is_new {
                    self.discovered += 1;
                }
                if self.discovered > self.max_discovered {
                    error!(
                        goal = %self.goal,
                        limit = self.max_discovered,
                        "max visited states exceeded, planning failed"
                    );
                    let err = PlanError::BudgetExceeded {
                        goal: self.goal.clone(),
                        limit: self.max_discovered,
                    };
                    trace.search_failed(&err, &self.nodes[parent].state, &self.goal);
                    return self.finish(SearchStatus::Failed(err));
                }

                let running_cost = parent_node.running_cost + action.cost;
                trace.node_created(Some(&action.name), running_cost, &state);

                let child = self.nodes.len();
                self.nodes.push(SearchNode {
                    parent: Some(parent),
                    running_cost,
                    state,
                    action: Some(candidate),
                });

                if satisfied {
                    self.leaves += 1;
                    let improves = match self.best {
                        Some(best) => running_cost < self.nodes[best].running_cost,
                        None => true,
                    };
                    if improves {
                        self.best = Some(child);
                    }
                } else {
                    self.stack.push(child);
                }

                if slice_start.elapsed() >= slice {
                    if next < self.candidates.len() {
                        self.cursor = Some((parent, next));
                    }
                    return SearchStatus::Running;
                }
            }
        }
    }

    /// Run to completion, ignoring the slice budget
    pub fn run_to_end(&mut self, trace: &mut dyn PlanTrace) -> SearchStatus {
        loop {
            match self.step_traced(Duration::MAX, trace) {
                SearchStatus::Running => continue,
                outcome => return outcome,
            }
        }
    }

    /// Stack exhausted: turn the best leaf into a plan
    fn complete(&mut self, trace: &mut dyn PlanTrace) -> SearchStatus {
        let Some(best) = self.best else {
            let err = PlanError::NoPlan {
                goal: self.goal.clone(),
            };
            trace.search_failed(&err, &self.nodes[0].state, &self.goal);
            return self.finish(SearchStatus::Failed(err));
        };

        let mut steps = Vec::new();
        let mut cursor = Some(best);
        while let Some(index) = cursor {
            let node = &self.nodes[index];
            if let Some(candidate) = node.action {
                let action = &self.candidates[candidate];
                steps.push(PlanStep {
                    action: action.id,
                    name: action.name.clone(),
                    cost: action.cost,
                });
            }
            cursor = node.parent;
        }
        steps.reverse();

        let plan = Plan::new(steps);
        debug!(
            cost = plan.cost(),
            leaves = self.leaves,
            discovered = self.discovered,
            "search complete"
        );
        trace.plan_found(&plan);
        self.finish(SearchStatus::Found(plan))
    }

    fn finish(&mut self, status: SearchStatus) -> SearchStatus {
        self.outcome = Some(status.clone());
        status
    }
}
