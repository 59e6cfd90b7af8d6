//! GOAP goal definitions

use std::fmt;

use super::state::State;

/// A desired world state change with priority
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub name: String,
    pub desired_state: State,
    pub priority: f32,
}

impl Goal {
    pub fn new(name: impl Into<String>, desired_state: State) -> Self {
        Self {
            name: name.into(),
            desired_state,
            priority: 0.0,
        }
    }

    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = priority;
        self
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.desired_state)
    }
}
