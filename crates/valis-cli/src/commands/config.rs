use std::path::Path;

use anyhow::{Context, Result};
use valis_core::SimulatorConfig;

pub fn show(path: Option<&Path>) -> Result<()> {
    let config = super::load_config(path)?;

    match path.map(Path::to_path_buf).or_else(SimulatorConfig::default_path) {
        Some(source) if source.exists() => println!("# Loaded from {}", source.display()),
        _ => println!("# Built-in defaults"),
    }

    let rendered = config
        .to_toml_string()
        .context("Failed to render configuration")?;
    print!("{}", rendered);

    Ok(())
}
