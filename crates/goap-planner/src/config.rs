//! Planner tuning knobs

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How travel distance turns into action cost
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelConfig {
    /// Assumed movement speed in world units per second
    pub speed: f32,
    /// Cost added per estimated second of travel
    pub cost_per_second: f32,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            speed: 0.5,
            cost_per_second: 1.0,
        }
    }
}

impl TravelConfig {
    /// Estimated seconds needed to cover `distance`
    pub fn travel_time(&self, distance: f32) -> f32 {
        if self.speed <= 0.0 {
            return 0.0;
        }
        distance / self.speed
    }

    /// Cost of covering `distance`
    pub fn travel_cost(&self, distance: f32) -> f32 {
        self.travel_time(distance) * self.cost_per_second
    }
}

/// Search limits for the planner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Newly discovered states allowed before the search gives up
    pub max_visited_states: usize,
    /// Wall-clock time one step may run before yielding (milliseconds)
    pub slice_budget_ms: u64,
    /// Optional cap on total wall-clock time across all steps (milliseconds)
    pub max_search_time_ms: Option<u64>,
    pub travel: TravelConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_visited_states: 1000,
            slice_budget_ms: 100,
            max_search_time_ms: None,
            travel: TravelConfig::default(),
        }
    }
}

impl PlannerConfig {
    pub fn slice_budget(&self) -> Duration {
        Duration::from_millis(self.slice_budget_ms)
    }

    pub fn max_search_time(&self) -> Option<Duration> {
        self.max_search_time_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        let config = PlannerConfig::default();
        assert_eq!(config.max_visited_states, 1000);
        assert_eq!(config.slice_budget(), Duration::from_millis(100));
        assert!(config.max_search_time().is_none());
    }

    #[test]
    fn travel_cost_scales_with_distance() {
        let travel = TravelConfig::default();
        assert!((travel.travel_time(2.0) - 4.0).abs() < 1e-6);
        assert!((travel.travel_cost(2.0) - 4.0).abs() < 1e-6);

        let stalled = TravelConfig {
            speed: 0.0,
            cost_per_second: 1.0,
        };
        assert_eq!(stalled.travel_cost(10.0), 0.0);
    }
}
