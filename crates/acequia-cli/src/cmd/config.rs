use std::path::Path;

use anyhow::{Context, Result};

use acequia_core::config::{Config, WarnLevel};

use crate::output;

#[derive(clap::Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,
    /// Check the configuration for suspect values
    Validate,
}

pub fn run(config_path: &Path, subcommand: ConfigSubcommand, json: bool) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    match subcommand {
        ConfigSubcommand::Show => {
            if json {
                output::print_json(&config);
            } else {
                let text = serde_yaml::to_string(&config).context("failed to render config")?;
                print!("{text}");
            }
            Ok(())
        }
        ConfigSubcommand::Validate => {
            let warnings = config.validate();
            if json {
                output::print_json(&warnings);
            } else if warnings.is_empty() {
                println!("Config OK: {}", config_path.display());
            } else {
                for warning in &warnings {
                    println!("{}: {}", warning.level, warning.message);
                }
            }
            if warnings.iter().any(|w| w.level == WarnLevel::Error) {
                anyhow::bail!("config has errors");
            }
            Ok(())
        }
    }
}
