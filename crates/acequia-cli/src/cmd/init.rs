use std::path::Path;

use anyhow::{Context, Result};

use acequia_core::config::Config;
use acequia_core::io;

use crate::output;

pub fn run(config_path: &Path, json: bool) -> Result<()> {
    let text =
        serde_yaml::to_string(&Config::default()).context("failed to render default config")?;
    let created = io::write_if_missing(config_path, &text)
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    if json {
        output::print_json(&serde_json::json!({
            "path": config_path,
            "created": created,
        }));
        return Ok(());
    }

    if created {
        println!("Wrote {}", config_path.display());
    } else {
        println!("{} already exists, leaving it alone", config_path.display());
    }
    Ok(())
}
