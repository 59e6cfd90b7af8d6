use std::collections::HashMap;

use goap_planner::ActionId;

/// Supplies the actions an agent may use for a given goal
pub trait ActionLibrary {
    fn actions_for(&self, goal_name: &str) -> Option<&[ActionId]>;
}

/// Goal name to action list lookup
#[derive(Debug, Clone, Default)]
pub struct GoalActions {
    by_goal: HashMap<String, Vec<ActionId>>,
}

impl GoalActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `actions` to the set used for `goal_name`
    pub fn map(&mut self, goal_name: impl Into<String>, actions: impl IntoIterator<Item = ActionId>) {
        let entry = self.by_goal.entry(goal_name.into()).or_default();
        for id in actions {
            if !entry.contains(&id) {
                entry.push(id);
            }
        }
    }

    /// Forget an action for every goal
    pub fn unmap(&mut self, id: ActionId) {
        for actions in self.by_goal.values_mut() {
            actions.retain(|other| *other != id);
        }
    }
}

impl ActionLibrary for GoalActions {
    fn actions_for(&self, goal_name: &str) -> Option<&[ActionId]> {
        self.by_goal.get(goal_name).map(Vec::as_slice)
    }
}
