// ABOUTME: CLI config command - print the effective configuration or write the defaults

use super::ConfigArgs;
use analysis_wizard::config::AppConfig;
use anyhow::{bail, Result};
use std::path::Path;

/// Execute the config command
pub fn execute(args: ConfigArgs, config: &AppConfig) -> Result<()> {
    if args.init {
        let path = AppConfig::user_config_path()?;
        let written = init_at(&path, args.force)?;
        println!("✅ Wrote default configuration to {}", written.display());
        return Ok(());
    }

    print!("{}", config.to_toml()?);
    Ok(())
}

/// Write `AppConfig::default()` to `path`, refusing to clobber unless forced
fn init_at(path: &Path, force: bool) -> Result<&Path> {
    if path.exists() && !force {
        bail!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        );
    }
    AppConfig::default().save_to(path)?;
    Ok(path)
}
