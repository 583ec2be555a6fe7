use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::agent::Agent;
use crate::permission::{PermissionRegistry, IRRIGATION_AGENT};
use crate::policy::IrrigationPolicy;
use crate::types::{ActuationOutcome, IrrigationAction, IrrigationCommand};

/// Failure from the actuation hardware boundary.
#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("hardware fault: {0}")]
    Hardware(String),
}

/// Valve-side boundary. The simulation always succeeds; a real
/// driver may not.
#[async_trait]
pub trait Actuator: Send + Sync {
    async fn actuate(&self, area: &str, duration_minutes: u32) -> Result<(), ActuatorError>;
}

/// Logs the actuation it would have performed.
#[derive(Debug, Clone, Default)]
pub struct SimulatedValve;

#[async_trait]
impl Actuator for SimulatedValve {
    async fn actuate(&self, area: &str, duration_minutes: u32) -> Result<(), ActuatorError> {
        tracing::info!(area, duration_minutes, "simulated valve opened");
        Ok(())
    }
}

/// Executes (or refuses) irrigation commands under the permission
/// gate.
///
/// The gate comes first: an ungranted agent refuses before looking at
/// the command at all. Durations are clamped to the policy maximum on
/// the way to the valve.
pub struct ActuationAgent {
    registry: Arc<PermissionRegistry>,
    actuator: Box<dyn Actuator>,
    policy: IrrigationPolicy,
}

impl ActuationAgent {
    pub fn new(
        registry: Arc<PermissionRegistry>,
        actuator: Box<dyn Actuator>,
        policy: IrrigationPolicy,
    ) -> Self {
        Self {
            registry,
            actuator,
            policy,
        }
    }
}

#[async_trait]
impl Agent for ActuationAgent {
    const NAME: &'static str = IRRIGATION_AGENT;
    type Input = IrrigationCommand;
    type Output = ActuationOutcome;

    async fn run(&self, command: IrrigationCommand) -> ActuationOutcome {
        if !self.registry.check(Self::NAME) {
            tracing::warn!(agent = Self::NAME, "actuation refused: no permission grant");
            return ActuationOutcome {
                executed: false,
                message: "permission denied".to_string(),
                error: None,
            };
        }

        if command.action == IrrigationAction::None {
            tracing::info!("advisory requested no irrigation");
            return ActuationOutcome {
                executed: false,
                message: "no irrigation needed".to_string(),
                error: command.error,
            };
        }

        let minutes = self.policy.clamp(command.duration_minutes);
        if minutes < command.duration_minutes {
            tracing::warn!(
                requested = command.duration_minutes,
                clamped = minutes,
                "irrigation duration clamped to policy maximum"
            );
        }

        match self.actuator.actuate(&command.area, minutes).await {
            Ok(()) => ActuationOutcome {
                executed: true,
                message: format!(
                    "irrigation started: area {}, duration {} minutes",
                    command.area, minutes
                ),
                error: None,
            },
            Err(e) => {
                tracing::error!(error = %e, area = %command.area, "actuation failed");
                ActuationOutcome {
                    executed: false,
                    message: "actuation failed".to_string(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
