use crate::actuation::ActuationAgent;
use crate::advisory::AdvisoryAgent;
use crate::agent::Agent;
use crate::sensor::SensorAgent;
use crate::types::ActuationOutcome;

/// One irrigation decision cycle: sense, advise, actuate.
///
/// The user instruction is carried for logging and future routing;
/// the v1 cycle always runs the full pipeline.
pub struct Orchestrator {
    sensor: SensorAgent,
    advisory: AdvisoryAgent,
    actuation: ActuationAgent,
}

impl Orchestrator {
    pub fn new(sensor: SensorAgent, advisory: AdvisoryAgent, actuation: ActuationAgent) -> Self {
        Self {
            sensor,
            advisory,
            actuation,
        }
    }

    /// Run a single cycle. Never fails: every fault arrives as a
    /// non-executed outcome.
    pub async fn run(&self, instruction: &str) -> ActuationOutcome {
        tracing::info!(instruction, "cycle started");

        let snapshot = self.sensor.run(()).await;
        let command = self.advisory.run(snapshot).await;
        tracing::info!(
            action = %command.action,
            duration_minutes = command.duration_minutes,
            area = %command.area,
            "advisory decided"
        );

        let outcome = self.actuation.run(command).await;
        tracing::info!(executed = outcome.executed, message = %outcome.message, "cycle finished");
        outcome
    }
}
