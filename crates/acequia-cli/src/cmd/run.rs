use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;

use acequia_core::actuation::{ActuationAgent, SimulatedValve};
use acequia_core::advisory::AdvisoryAgent;
use acequia_core::backend::{AdvisoryBackend, StaticBackend};
use acequia_core::config::{BackendConfig, Config};
use acequia_core::journal::{CycleJournal, CycleRecord};
use acequia_core::orchestrator::Orchestrator;
use acequia_core::sensor::SensorAgent;
use ollama_advisor::OllamaAdvisor;

use crate::output;

/// Instruction used when the caller gives none.
const DEFAULT_INSTRUCTION: &str = "Irrigate automatically based on current soil moisture.";

pub fn run(config_path: &Path, instruction: Option<String>, json: bool) -> Result<()> {
    let config = Config::load(config_path).with_context(|| {
        format!(
            "failed to load config from {} (run `acequia init` first)",
            config_path.display()
        )
    })?;
    let instruction = instruction.unwrap_or_else(|| DEFAULT_INSTRUCTION.to_string());

    let pipeline = build_pipeline(&config);
    let cycle_id = Uuid::new_v4().to_string();
    // Every log line of the cycle carries the id.
    let span = tracing::info_span!("cycle", id = %cycle_id);

    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let started = Instant::now();
    let outcome = rt.block_on(pipeline.run(&instruction).instrument(span));
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if let Some(path) = &config.journal {
        let record = CycleRecord {
            ts: Utc::now(),
            cycle_id,
            instruction,
            executed: outcome.executed,
            message: outcome.message.clone(),
            error: outcome.error.clone(),
            elapsed_ms,
        };
        if let Err(e) = CycleJournal::new(path).append(&record) {
            tracing::warn!(error = %e, path = %path.display(), "failed to append journal record");
        }
    }

    if json {
        output::print_json(&outcome);
        return Ok(());
    }

    println!("{}", outcome.message);
    if let Some(detail) = &outcome.error {
        println!("  detail: {detail}");
    }
    Ok(())
}

/// Wire the agents from config. The backend choice is the only
/// branch.
fn build_pipeline(config: &Config) -> Orchestrator {
    let backend: Box<dyn AdvisoryBackend> = match &config.backend {
        BackendConfig::Ollama { endpoint, model } => {
            Box::new(OllamaAdvisor::new(endpoint.clone(), model.clone()))
        }
        BackendConfig::Static { response } => Box::new(StaticBackend::new(response.clone())),
    };

    let sensor = SensorAgent::new(config.sensor.snapshot());
    let advisory = AdvisoryAgent::new(backend)
        .with_timeout(Duration::from_secs(config.advisory.timeout_seconds));
    let actuation = ActuationAgent::new(
        Arc::new(config.registry()),
        Box::new(SimulatedValve),
        config.policy.clone(),
    );
    Orchestrator::new(sensor, advisory, actuation)
}
