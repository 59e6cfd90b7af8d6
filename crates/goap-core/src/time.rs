//! Simulation clock
//!
//! Tracks scaled simulation time across ticks. Timed actions read
//! `total_time` to decide when they are done.

use serde::{Deserialize, Serialize};

/// Configuration for simulation time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many simulated seconds pass per real second
    pub time_scale: f32,
    /// Maximum delta time accepted for a single tick
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta_time: 0.25,
        }
    }
}

/// Simulation time tracking
#[derive(Debug, Clone, Default)]
pub struct SimTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since simulation start in seconds
    pub total_time: f64,
    /// Delta time for this tick (clamped and scaled)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Tick counter
    pub tick_count: u64,
}

impl SimTime {
    /// Create a new clock with custom config. A negative time scale
    /// freezes the clock instead of running it backwards.
    pub fn new(mut config: TimeConfig) -> Self {
        config.time_scale = config.time_scale.max(0.0);
        Self {
            config,
            ..Default::default()
        }
    }

    /// Advance the clock with the raw delta since the previous tick
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.min(self.config.max_delta_time);
        self.tick_count += 1;
        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_time() {
        let mut time = SimTime::default();
        time.update(0.016);

        assert!(time.delta_time > 0.0);
        assert_eq!(time.tick_count, 1);

        time.update(0.016);
        assert_eq!(time.tick_count, 2);
        assert!((time.total_time - 0.032).abs() < 1e-6);
    }

    #[test]
    fn test_delta_is_clamped_and_scaled() {
        let mut time = SimTime::new(TimeConfig {
            time_scale: 2.0,
            max_delta_time: 0.1,
        });
        time.update(1.0);
        assert!((time.unscaled_delta_time - 0.1).abs() < 1e-6);
        assert!((time.delta_time - 0.2).abs() < 1e-6);
        assert!((time.total_time - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_negative_time_scale_is_clamped() {
        let mut time = SimTime::new(TimeConfig {
            time_scale: -3.0,
            ..TimeConfig::default()
        });
        time.update(0.1);
        assert_eq!(time.total_time, 0.0);
    }
}
