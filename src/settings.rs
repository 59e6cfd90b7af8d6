//! Simulation settings with persistence
//!
//! Settings are saved to `~/.config/goap-sim/settings.toml`

use std::fs;
use std::path::PathBuf;

use goap_core::TimeConfig;
use goap_planner::PlannerConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All simulation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub planner: PlannerConfig,
    pub time: TimeConfig,
    pub simulation: SimulationSettings,
}

impl SimSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("goap-sim"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match Self::parse(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Parse settings from TOML; missing sections and fields take defaults
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut settings: Self = toml::from_str(content)?;
        settings.simulation.sanitize();
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Village simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Number of ticks to run
    pub ticks: u32,
    /// Seconds of simulated time per tick
    pub delta: f32,
    /// Seed for food placement
    pub seed: u64,
    /// Food items scattered at startup
    pub food_count: usize,
    /// Half-width of the square food is scattered in
    pub area: f32,
    /// Villager walking speed in units per second
    pub villager_speed: f32,
}

impl SimulationSettings {
    /// Replace values the simulation cannot run with
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        if !self.area.is_finite() || self.area < 0.0 {
            warn!("Invalid area {}, using {}", self.area, defaults.area);
            self.area = defaults.area;
        }
        if !self.delta.is_finite() || self.delta < 0.0 {
            warn!("Invalid delta {}, using {}", self.delta, defaults.delta);
            self.delta = defaults.delta;
        }
        if !self.villager_speed.is_finite() || self.villager_speed < 0.0 {
            warn!(
                "Invalid villager speed {}, using {}",
                self.villager_speed, defaults.villager_speed
            );
            self.villager_speed = defaults.villager_speed;
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            ticks: 600,
            delta: 0.1,
            seed: 42,
            food_count: 5,
            area: 10.0,
            villager_speed: 2.0,
        }
    }
}
