use std::path::Path;

use anyhow::{Context, Result};

use acequia_core::config::Config;
use acequia_core::journal::{CycleJournal, CycleRecord};

use crate::output;

pub fn run(config_path: &Path, limit: usize, json: bool) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let Some(path) = &config.journal else {
        if json {
            output::print_json(&Vec::<CycleRecord>::new());
        } else {
            println!(
                "No journal configured; set `journal:` in {}",
                config_path.display()
            );
        }
        return Ok(());
    };

    let records = CycleJournal::new(path)
        .read_all()
        .context("failed to read journal")?;
    let start = records.len().saturating_sub(limit);
    let recent = &records[start..];

    if json {
        output::print_json(&recent);
        return Ok(());
    }

    if recent.is_empty() {
        println!("Journal is empty: {}", path.display());
        return Ok(());
    }

    let rows: Vec<Vec<String>> = recent
        .iter()
        .map(|record| {
            vec![
                record.ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                record.cycle_id.chars().take(8).collect(),
                (if record.executed { "yes" } else { "no" }).to_string(),
                record.message.clone(),
            ]
        })
        .collect();
    output::print_table(&["TIME", "CYCLE", "EXECUTED", "MESSAGE"], &rows);
    Ok(())
}
