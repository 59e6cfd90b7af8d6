//! goap-sim - a villager run by a GOAP agent
//!
//! Logging honours `RUST_LOG`, e.g. `RUST_LOG=goap_planner=trace` to watch
//! the search.

mod settings;
mod village;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::SimSettings;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Starting goap-sim...");

    let settings = SimSettings::load();
    if std::env::args().any(|arg| arg == "--write-settings") {
        settings.save().context("Failed to save settings")?;
    }

    let stats = village::run(&settings);
    info!(
        plans = stats.plans_found,
        failed = stats.plans_failed,
        aborted = stats.plans_aborted,
        "Simulation complete"
    );
    Ok(())
}
