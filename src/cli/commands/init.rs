//! Init and Config commands.

use anyhow::{Context, anyhow};
use std::path::Path;

use crate::config::Settings;

/// Create `.classmap/settings.toml` under `dir`.
pub fn run_init(dir: &Path, force: bool) -> anyhow::Result<()> {
    let path = Settings::init_config_file(dir, force).map_err(|e| anyhow!("{e}"))?;
    println!("Created configuration file at: {}", path.display());
    println!("Edit this file to customize your settings.");
    Ok(())
}

/// Print the effective configuration.
pub fn run_config(config: &Settings) -> anyhow::Result<()> {
    println!("Current Configuration:");
    println!("{}", "=".repeat(50));
    let rendered = toml::to_string_pretty(config).context("Error displaying config")?;
    println!("{rendered}");
    Ok(())
}
