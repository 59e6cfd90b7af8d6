//! GOAP agent: plans for the context's goal and runs the resulting actions

use std::collections::{BTreeSet, VecDeque};

use goap_planner::{
    Action, ActionId, ActionPool, GoapPlanner, Goal, PlanStep, PlanTrace, PlannerConfig,
};
use tracing::{debug, error, info, warn};

use crate::context::GoapContext;
use crate::error::ExecutionError;
use crate::fsm::{AgentState, StateChange, StateMachine, StateTransition};
use crate::library::{ActionLibrary, GoalActions};

/// Runs one agent: Idle plans, PerformAction works through the plan and
/// MoveTo walks to targets in between.
pub struct GoapAgent<C> {
    actions: ActionPool<C>,
    /// Actions the planner may use for the next plan
    available: BTreeSet<ActionId>,
    current: VecDeque<PlanStep>,
    planner: GoapPlanner,
    library: GoalActions,
    fsm: StateMachine<AgentState>,
    goal: Option<Goal>,
    /// Set when an action fails; the plan is dropped on the next tick
    replan_pending: bool,
}

impl<C> GoapAgent<C> {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            actions: ActionPool::new(),
            available: BTreeSet::new(),
            current: VecDeque::new(),
            planner: GoapPlanner::new(config),
            library: GoalActions::new(),
            fsm: StateMachine::new(AgentState::Idle),
            goal: None,
            replan_pending: false,
        }
    }

    /// Replace the planner's diagnostic sink
    pub fn with_trace(mut self, trace: Box<dyn PlanTrace>) -> Self {
        self.planner = GoapPlanner::new(self.planner.config().clone()).with_trace(trace);
        self
    }

    /// Register an action and make it available right away
    pub fn add_action(&mut self, action: Box<dyn Action<C>>) -> ActionId {
        let id = self.actions.register(action);
        self.available.insert(id);
        id
    }

    /// Register an action that only becomes available through a goal mapping
    pub fn register_action(&mut self, action: Box<dyn Action<C>>) -> ActionId {
        self.actions.register(action)
    }

    /// Make `actions` available whenever the agent plans for `goal_name`
    pub fn map_goal(&mut self, goal_name: impl Into<String>, actions: impl IntoIterator<Item = ActionId>) {
        self.library.map(goal_name, actions);
    }

    /// Stop offering an action to the planner. It stays registered.
    pub fn remove_action(&mut self, id: ActionId) -> bool {
        self.available.remove(&id)
    }

    /// Drop an action for good
    pub fn unregister_action(&mut self, id: ActionId) -> Option<Box<dyn Action<C>>> {
        self.available.remove(&id);
        self.library.unmap(id);
        self.actions.remove(id)
    }

    pub fn action(&self, id: ActionId) -> Option<&dyn Action<C>> {
        self.actions.get(id)
    }

    pub fn action_mut(&mut self, id: ActionId) -> Option<&mut Box<dyn Action<C>>> {
        self.actions.get_mut(id)
    }

    pub fn action_by_name(&self, name: &str) -> Option<ActionId> {
        self.actions.find(name)
    }

    /// Add the actions mapped to `goal_name` to the available set.
    /// Returns false when the goal has no mapping.
    pub fn load_actions(&mut self, goal_name: &str) -> bool {
        match self.library.actions_for(goal_name) {
            Some(ids) => {
                self.available.extend(ids.iter().copied());
                true
            }
            None => false,
        }
    }

    pub fn available_actions(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.available.iter().copied()
    }

    /// Steps of the running plan that have not finished yet
    pub fn current_plan(&self) -> impl Iterator<Item = &PlanStep> {
        self.current.iter()
    }

    pub fn has_action_plan(&self) -> bool {
        !self.current.is_empty()
    }

    /// Goal of the plan being searched for or executed
    pub fn current_goal(&self) -> Option<&Goal> {
        self.goal.as_ref()
    }

    pub fn state(&self) -> AgentState {
        self.fsm.current()
    }

    pub fn is_planning(&self) -> bool {
        self.planner.is_planning()
    }

    /// Throw away the running plan and any search in flight, back to Idle
    pub fn replan(&mut self) {
        debug!(state = %self.state(), "replan requested");
        self.replan_pending = false;
        self.transition(StateTransition::Reset(AgentState::Idle));
    }

    fn transition(&mut self, transition: StateTransition<AgentState>) {
        for change in self.fsm.apply(transition) {
            match change {
                StateChange::Exited(state) => self.on_exit(state),
                StateChange::Entered(state) => self.on_enter(state),
            }
        }
    }

    fn on_enter(&mut self, state: AgentState) {
        debug!(state = %state, "entering state");
        if state == AgentState::Idle {
            self.current.clear();
            self.goal = None;
        }
    }

    fn on_exit(&mut self, state: AgentState) {
        if state == AgentState::Idle && self.planner.is_planning() {
            debug!("cancelling search in flight");
            self.planner.cancel();
        }
    }
}

impl<C: GoapContext> GoapAgent<C> {
    /// Run the top state once
    pub fn tick(&mut self, ctx: &mut C) {
        let requested = ctx.take_replan_request();
        if self.replan_pending || requested {
            self.replan();
        }

        let transition = match self.fsm.current() {
            AgentState::Idle => self.tick_idle(ctx),
            AgentState::MoveTo => self.tick_move_to(ctx),
            AgentState::PerformAction => self.tick_perform(ctx),
        };
        self.transition(transition);
    }

    fn tick_idle(&mut self, ctx: &mut C) -> StateTransition<AgentState> {
        if !self.planner.is_planning() {
            let world = ctx.world_state();
            let Some(goal) = ctx.create_goal_state() else {
                warn!("no goal to plan for");
                return StateTransition::None;
            };

            if !self.load_actions(&goal.name) {
                error!(goal = %goal.name, "no action set mapped to goal");
            }
            let available: Vec<ActionId> = self.available.iter().copied().collect();
            debug!(goal = %goal, actions = available.len(), "planning");
            self.planner.begin(
                &*ctx,
                &mut self.actions,
                &available,
                world,
                goal.desired_state.clone(),
            );
            self.goal = Some(goal);
        }

        let Some(outcome) = self.planner.update() else {
            return StateTransition::None;
        };
        let Some(goal) = self.goal.clone() else {
            return StateTransition::None;
        };

        match outcome {
            Ok(plan) => {
                info!(goal = %goal.name, cost = plan.cost(), "plan found: {plan}");
                ctx.plan_found(&goal, &plan);
                self.current = plan.into_queue();
                StateTransition::Replace(AgentState::PerformAction)
            }
            Err(err) => {
                warn!(goal = %goal.name, error = %err, "planning failed");
                ctx.plan_failed(&goal, &err);
                StateTransition::Replace(AgentState::Idle)
            }
        }
    }

    fn tick_move_to(&mut self, ctx: &mut C) -> StateTransition<AgentState> {
        let Some(step) = self.current.front() else {
            return abort(ctx, ExecutionError::EmptyQueue);
        };
        let Some(action) = self.actions.get_mut(step.action) else {
            return abort(ctx, ExecutionError::UnknownAction {
                action: step.name.clone(),
            });
        };

        if !action.requires_in_range() {
            action.set_in_range(true);
            return StateTransition::Pop;
        }
        let Some(target) = action.target().copied() else {
            return abort(ctx, ExecutionError::MissingTarget {
                action: step.name.clone(),
            });
        };

        if ctx.move_agent(&target) {
            debug!(action = %step.name, "in range");
            action.set_in_range(true);
            StateTransition::Pop
        } else {
            StateTransition::None
        }
    }

    fn tick_perform(&mut self, ctx: &mut C) -> StateTransition<AgentState> {
        let Some(head) = self.current.front() else {
            info!("actions finished");
            ctx.actions_finished();
            return StateTransition::Replace(AgentState::Idle);
        };

        match self.actions.get(head.action) {
            None => {
                return abort(ctx, ExecutionError::UnknownAction {
                    action: head.name.clone(),
                })
            }
            Some(action) if action.is_done() => {
                debug!(action = %head.name, "action done");
                self.current.pop_front();
            }
            Some(_) => {}
        }

        let Some(step) = self.current.front() else {
            self.available.clear();
            info!("actions finished");
            ctx.actions_finished();
            return StateTransition::Replace(AgentState::Idle);
        };
        let Some(action) = self.actions.get_mut(step.action) else {
            return abort(ctx, ExecutionError::UnknownAction {
                action: step.name.clone(),
            });
        };

        if action.requires_in_range() && !action.is_in_range() {
            return StateTransition::Push(AgentState::MoveTo);
        }

        if !action.perform(ctx) {
            let err = ExecutionError::ActionFailed {
                action: step.name.clone(),
            };
            warn!(error = %err, "plan aborted, replanning next tick");
            ctx.plan_aborted(&err);
            self.replan_pending = true;
        }
        StateTransition::None
    }
}

/// Give up on the running plan and start over from Idle
fn abort<C: GoapContext>(ctx: &mut C, err: ExecutionError) -> StateTransition<AgentState> {
    error!(error = %err, "plan aborted");
    ctx.plan_aborted(&err);
    StateTransition::Reset(AgentState::Idle)
}
