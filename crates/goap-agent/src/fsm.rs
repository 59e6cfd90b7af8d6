//! Stack-based state machine driving plan execution
//!
//! Only the top state runs each tick. States push other states onto the
//! stack and pop themselves off by returning a [`StateTransition`].

use std::fmt;

/// Executor states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Waiting for a plan; starts and advances the planner
    Idle,
    /// Closing distance to the head action's target
    MoveTo,
    /// Working through the queued actions
    PerformAction,
}

impl AgentState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::MoveTo => "MoveTo",
            Self::PerformAction => "PerformAction",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State transition commands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StateTransition<S> {
    /// No transition
    #[default]
    None,
    /// Push a new state onto the stack
    Push(S),
    /// Pop the current state
    Pop,
    /// Replace the current state
    Replace(S),
    /// Clear the whole stack and start over from the given state
    Reset(S),
}

/// What a transition did, in the order it happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange<S> {
    Exited(S),
    Entered(S),
}

/// Stack of states; the bottom state is never popped
#[derive(Debug, Clone)]
pub struct StateMachine<S> {
    stack: Vec<S>,
}

impl<S: Copy> StateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            stack: vec![initial],
        }
    }

    /// The state that runs on the next tick
    pub fn current(&self) -> S {
        // the stack always holds at least the bottom state
        self.stack[self.stack.len() - 1]
    }

    /// Number of stacked states
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// States from bottom to top
    pub fn states(&self) -> &[S] {
        &self.stack
    }

    /// Apply a transition and report the states left and entered
    pub fn apply(&mut self, transition: StateTransition<S>) -> Vec<StateChange<S>> {
        let mut changes = Vec::new();
        match transition {
            StateTransition::None => {}
            StateTransition::Push(state) => {
                self.stack.push(state);
                changes.push(StateChange::Entered(state));
            }
            StateTransition::Pop => {
                if self.stack.len() > 1 {
                    if let Some(state) = self.stack.pop() {
                        changes.push(StateChange::Exited(state));
                    }
                }
            }
            StateTransition::Replace(state) => {
                if let Some(old) = self.stack.pop() {
                    changes.push(StateChange::Exited(old));
                }
                self.stack.push(state);
                changes.push(StateChange::Entered(state));
            }
            StateTransition::Reset(state) => {
                while let Some(old) = self.stack.pop() {
                    changes.push(StateChange::Exited(old));
                }
                self.stack.push(state);
                changes.push(StateChange::Entered(state));
            }
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_initial_state() {
        let fsm = StateMachine::new(AgentState::Idle);
        assert_eq!(fsm.current(), AgentState::Idle);
        assert_eq!(fsm.depth(), 1);
    }

    #[test]
    fn push_and_pop() {
        let mut fsm = StateMachine::new(AgentState::PerformAction);
        let changes = fsm.apply(StateTransition::Push(AgentState::MoveTo));
        assert_eq!(changes, vec![StateChange::Entered(AgentState::MoveTo)]);
        assert_eq!(fsm.current(), AgentState::MoveTo);

        let changes = fsm.apply(StateTransition::Pop);
        assert_eq!(changes, vec![StateChange::Exited(AgentState::MoveTo)]);
        assert_eq!(fsm.current(), AgentState::PerformAction);
    }

    #[test]
    fn bottom_state_is_never_popped() {
        let mut fsm = StateMachine::new(AgentState::Idle);
        assert!(fsm.apply(StateTransition::Pop).is_empty());
        assert_eq!(fsm.current(), AgentState::Idle);
    }

    #[test]
    fn replace_swaps_top() {
        let mut fsm = StateMachine::new(AgentState::Idle);
        let changes = fsm.apply(StateTransition::Replace(AgentState::PerformAction));
        assert_eq!(
            changes,
            vec![
                StateChange::Exited(AgentState::Idle),
                StateChange::Entered(AgentState::PerformAction)
            ]
        );
        assert_eq!(fsm.states(), &[AgentState::PerformAction]);
    }

    #[test]
    fn reset_unwinds_everything() {
        let mut fsm = StateMachine::new(AgentState::PerformAction);
        fsm.apply(StateTransition::Push(AgentState::MoveTo));

        let changes = fsm.apply(StateTransition::Reset(AgentState::Idle));
        assert_eq!(
            changes,
            vec![
                StateChange::Exited(AgentState::MoveTo),
                StateChange::Exited(AgentState::PerformAction),
                StateChange::Entered(AgentState::Idle)
            ]
        );
        assert_eq!(fsm.states(), &[AgentState::Idle]);
    }

    #[test]
    fn none_is_default() {
        let transition: StateTransition<AgentState> = StateTransition::default();
        assert_eq!(transition, StateTransition::None);
    }
}
