//! Planner output

use std::collections::VecDeque;
use std::fmt;

use crate::action::ActionId;

/// One action of a plan, with the cost it contributed
#[derive(Debug, Clone, PartialEq)]
pub struct PlanStep {
    pub action: ActionId,
    pub name: String,
    pub cost: f32,
}

/// Ordered actions that take the start state to one satisfying the goal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    steps: Vec<PlanStep>,
    cost: f32,
}

impl Plan {
    /// Build a plan from steps in execution order
    pub fn new(steps: Vec<PlanStep>) -> Self {
        let cost = steps.iter().fold(0.0, |total, step| total + step.cost);
        Self { steps, cost }
    }

    /// A plan with nothing to do (goal already satisfied)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Total cost of all steps
    pub fn cost(&self) -> f32 {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn action_ids(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.steps.iter().map(|step| step.action)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|step| step.name.as_str())
    }

    /// Consume the plan into an execution queue
    pub fn into_queue(self) -> VecDeque<PlanStep> {
        self.steps.into()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{} -> ", step.name)?;
        }
        f.write_str("GOAL")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: usize, name: &str, cost: f32) -> PlanStep {
        PlanStep {
            action: ActionId(id),
            name: name.to_string(),
            cost,
        }
    }

    #[test]
    fn test_cost_is_sum_of_steps() {
        let plan = Plan::new(vec![step(0, "find_food", 2.0), step(1, "eat_food", 1.5)]);
        assert_eq!(plan.cost(), 3.5);
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_display() {
        let plan = Plan::new(vec![step(0, "find_food", 2.0), step(1, "eat_food", 1.0)]);
        assert_eq!(plan.to_string(), "find_food -> eat_food -> GOAL");
        assert_eq!(Plan::empty().to_string(), "GOAL");
    }

    #[test]
    fn test_into_queue_keeps_order() {
        let plan = Plan::new(vec![step(3, "a", 1.0), step(1, "b", 1.0)]);
        let queue = plan.into_queue();
        assert_eq!(queue.front().map(|s| s.action), Some(ActionId(3)));
        assert_eq!(queue.back().map(|s| s.action), Some(ActionId(1)));
    }
}
