pub mod classify;
pub mod config;
pub mod simulate;

use std::path::Path;

use anyhow::{Context, Result};
use valis_core::SimulatorConfig;

pub(crate) fn load_config(path: Option<&Path>) -> Result<SimulatorConfig> {
    SimulatorConfig::load_or_default(path).context("Failed to load simulator configuration")
}
