use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::agent::Agent;
use crate::backend::AdvisoryBackend;
use crate::permission::ADVISORY_AGENT;
use crate::types::{IrrigationAction, IrrigationCommand, SensorSnapshot, DEFAULT_AREA};

/// Default bound on one backend invocation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Render the advisory prompt for a snapshot. A missing moisture
/// reading is spelled out as `unknown` rather than omitted.
fn build_prompt(snapshot: &SensorSnapshot) -> String {
    let moisture = match snapshot.soil_moisture {
        Some(value) => format!("{value}%"),
        None => "unknown".to_string(),
    };
    format!(
        "Current soil moisture is {moisture}. Decide whether irrigation is needed.\n\
         Output ONLY a raw JSON object, no markdown fences, no prose, of the shape:\n\
         {{\"action\": \"irrigate\", \"duration\": <minutes>, \"area\": \"<zone>\"}}\n\
         If no irrigation is needed, set \"action\" to \"none\"."
    )
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

/// Why an advisory reply failed to become a command.
#[derive(Debug, Error)]
pub enum AdvisoryParseError {
    #[error("no JSON object in advisory text")]
    NoJson,

    #[error("malformed advisory JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("invalid duration {0}")]
    InvalidDuration(i64),
}

/// Raw shape the backend is asked to produce. `duration` and `area`
/// are optional; `action` is not.
#[derive(Debug, Deserialize)]
struct AdvisoryPayload {
    action: String,
    #[serde(default)]
    duration: Option<i64>,
    #[serde(default)]
    area: Option<String>,
}

/// Strip `<think>...</think>` blocks emitted by reasoning models.
/// An unterminated block is left in place.
fn strip_think_blocks(text: &str) -> String {
    let mut out = text.to_string();
    loop {
        let Some(start) = out.find("<think>") else {
            break;
        };
        let Some(end) = out[start..].find("</think>") else {
            break;
        };
        out.replace_range(start..start + end + "</think>".len(), "");
    }
    out
}

/// Outermost `{...}` substring, for replies wrapped in fences or
/// prose.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse and validate backend text into a command.
///
/// Lenient about wrapping (fences, prose, think blocks), strict about
/// content: an unrecognized action or a nonsense duration is an
/// error, not a guess.
pub fn parse_advisory(raw: &str) -> Result<IrrigationCommand, AdvisoryParseError> {
    let cleaned = strip_think_blocks(raw);
    let cleaned = cleaned.trim();

    let payload: AdvisoryPayload = match serde_json::from_str(cleaned) {
        Ok(payload) => payload,
        Err(_) => {
            let object = extract_json_object(cleaned).ok_or(AdvisoryParseError::NoJson)?;
            serde_json::from_str(object)?
        }
    };

    let action = match payload.action.to_ascii_lowercase().as_str() {
        "irrigate" => IrrigationAction::Irrigate,
        "none" => IrrigationAction::None,
        _ => return Err(AdvisoryParseError::UnknownAction(payload.action)),
    };

    let duration_minutes = match payload.duration {
        None => 0,
        Some(minutes) => {
            u32::try_from(minutes).map_err(|_| AdvisoryParseError::InvalidDuration(minutes))?
        }
    };
    // A no-op advisory carries no duration, whatever the reply said.
    let duration_minutes = if action == IrrigationAction::None {
        0
    } else {
        duration_minutes
    };

    let area = match payload.area {
        Some(area) if !area.trim().is_empty() => area.trim().to_string(),
        _ => DEFAULT_AREA.to_string(),
    };

    Ok(IrrigationCommand {
        action,
        duration_minutes,
        area,
        raw_advisory: raw.to_string(),
        error: None,
    })
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// Turns a sensor snapshot into an irrigation command by way of a
/// language model.
///
/// Every failure mode (unreachable backend, timeout, unparseable
/// reply) degrades to the safe no-op fallback; `run` never errors.
pub struct AdvisoryAgent {
    backend: Box<dyn AdvisoryBackend>,
    timeout: Duration,
}

impl AdvisoryAgent {
    pub fn new(backend: Box<dyn AdvisoryBackend>) -> Self {
        Self {
            backend,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Agent for AdvisoryAgent {
    const NAME: &'static str = ADVISORY_AGENT;
    type Input = SensorSnapshot;
    type Output = IrrigationCommand;

    async fn run(&self, snapshot: SensorSnapshot) -> IrrigationCommand {
        if let Some(reason) = &snapshot.error {
            tracing::warn!(reason = %reason, "advising on a degraded snapshot");
        }

        let prompt = build_prompt(&snapshot);
        tracing::debug!(prompt_len = prompt.len(), "invoking advisory backend");

        let raw = match tokio::time::timeout(self.timeout, self.backend.invoke(&prompt)).await {
            Err(_) => {
                let secs = self.timeout.as_secs();
                tracing::warn!("advisory backend timed out after {secs}s");
                return IrrigationCommand::safe_fallback("")
                    .with_error(format!("advisory backend timed out after {secs}s"));
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "advisory backend failed");
                return IrrigationCommand::safe_fallback("").with_error(e.to_string());
            }
            Ok(Ok(raw)) => raw,
        };

        match parse_advisory(&raw) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable advisory, falling back to no-op");
                IrrigationCommand::safe_fallback(raw)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, StaticBackend};
    use std::sync::{Arc, Mutex};

    #[test]
    fn prompt_embeds_the_moisture_reading() {
        let prompt = build_prompt(&SensorSnapshot::new(25.0, 60.0, 30.0));
        assert!(prompt.contains("30%"));
        assert!(prompt.contains("\"action\""));
    }

    #[test]
    fn prompt_spells_out_a_missing_reading() {
        let prompt = build_prompt(&SensorSnapshot::unavailable("probe offline"));
        assert!(prompt.contains("unknown"));
        assert!(!prompt.contains("%."));
    }

    #[test]
    fn parses_a_well_formed_reply() {
        let command =
            parse_advisory(r#"{"action": "irrigate", "duration": 15, "area": "zoneA"}"#).unwrap();
        assert_eq!(command.action, IrrigationAction::Irrigate);
        assert_eq!(command.duration_minutes, 15);
        assert_eq!(command.area, "zoneA");
    }

    #[test]
    fn prose_is_not_a_command() {
        let err = parse_advisory("I think you should water it").unwrap_err();
        assert!(matches!(err, AdvisoryParseError::NoJson));
    }

    #[test]
    fn tolerates_markdown_fences() {
        let raw = "```json\n{\"action\": \"irrigate\", \"duration\": 5, \"area\": \"north\"}\n```";
        let command = parse_advisory(raw).unwrap();
        assert_eq!(command.duration_minutes, 5);
        assert_eq!(command.area, "north");
    }

    #[test]
    fn tolerates_think_blocks_and_prose() {
        let raw = "<think>the soil is dry, 30% is low</think>Sure: {\"action\": \"irrigate\", \"duration\": 20, \"area\": \"all\"}";
        let command = parse_advisory(raw).unwrap();
        assert_eq!(command.action, IrrigationAction::Irrigate);
        assert_eq!(command.duration_minutes, 20);
    }

    #[test]
    fn action_is_case_insensitive() {
        let command = parse_advisory(r#"{"action": "IRRIGATE", "duration": 1}"#).unwrap();
        assert_eq!(command.action, IrrigationAction::Irrigate);
    }

    #[test]
    fn missing_duration_and_area_take_defaults() {
        let command = parse_advisory(r#"{"action": "irrigate"}"#).unwrap();
        assert_eq!(command.duration_minutes, 0);
        assert_eq!(command.area, "all");
    }

    #[test]
    fn blank_area_takes_the_default() {
        let command = parse_advisory(r#"{"action": "irrigate", "area": "  "}"#).unwrap();
        assert_eq!(command.area, "all");
    }

    #[test]
    fn none_action_forces_zero_duration() {
        let command = parse_advisory(r#"{"action": "none", "duration": 30}"#).unwrap();
        assert_eq!(command.action, IrrigationAction::None);
        assert_eq!(command.duration_minutes, 0);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = parse_advisory(r#"{"action": "flood", "duration": 5}"#).unwrap_err();
        assert!(matches!(err, AdvisoryParseError::UnknownAction(a) if a == "flood"));
    }

    #[test]
    fn negative_duration_is_rejected() {
        let err = parse_advisory(r#"{"action": "irrigate", "duration": -5}"#).unwrap_err();
        assert!(matches!(err, AdvisoryParseError::InvalidDuration(-5)));
    }

    #[test]
    fn fractional_duration_is_rejected() {
        let err = parse_advisory(r#"{"action": "irrigate", "duration": 2.5}"#).unwrap_err();
        assert!(matches!(err, AdvisoryParseError::Json(_)));
    }

    #[test]
    fn missing_action_is_rejected() {
        let err = parse_advisory(r#"{"duration": 5, "area": "all"}"#).unwrap_err();
        assert!(matches!(err, AdvisoryParseError::Json(_)));
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(parse_advisory("").is_err());
        assert!(parse_advisory("   \n  ").is_err());
    }

    #[tokio::test]
    async fn agent_passes_through_a_valid_advisory() {
        let backend = StaticBackend::new(r#"{"action": "irrigate", "duration": 15, "area": "zoneA"}"#);
        let agent = AdvisoryAgent::new(Box::new(backend));
        let command = agent.run(SensorSnapshot::new(25.0, 60.0, 30.0)).await;
        assert_eq!(command.action, IrrigationAction::Irrigate);
        assert_eq!(command.duration_minutes, 15);
        assert_eq!(command.area, "zoneA");
        assert!(command.error.is_none());
    }

    #[tokio::test]
    async fn agent_falls_back_on_prose() {
        let backend = StaticBackend::new("I think you should water it");
        let agent = AdvisoryAgent::new(Box::new(backend));
        let command = agent.run(SensorSnapshot::new(25.0, 60.0, 30.0)).await;
        assert_eq!(command.action, IrrigationAction::None);
        assert_eq!(command.duration_minutes, 0);
        assert_eq!(command.area, "all");
        assert_eq!(command.raw_advisory, "I think you should water it");
        assert!(command.error.is_none());
    }

    struct CapturingBackend {
        reply: &'static str,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl AdvisoryBackend for CapturingBackend {
        async fn invoke(&self, prompt: &str) -> Result<String, BackendError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.to_string())
        }
    }

    #[tokio::test]
    async fn agent_advises_on_a_degraded_snapshot() {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let backend = CapturingBackend {
            reply: r#"{"action": "irrigate", "duration": 5, "area": "north"}"#,
            prompts: Arc::clone(&prompts),
        };
        let agent = AdvisoryAgent::new(Box::new(backend));
        let command = agent.run(SensorSnapshot::unavailable("sensor offline")).await;
        assert_eq!(command.action, IrrigationAction::Irrigate);
        assert_eq!(command.duration_minutes, 5);
        assert_eq!(command.area, "north");
        assert!(command.error.is_none());
        assert!(prompts.lock().unwrap()[0].contains("unknown"));
    }

    #[tokio::test]
    async fn agent_degrades_to_noop_without_a_reading() {
        let backend = StaticBackend::new("water it, probably");
        let agent = AdvisoryAgent::new(Box::new(backend));
        let command = agent.run(SensorSnapshot::unavailable("sensor offline")).await;
        assert_eq!(command.action, IrrigationAction::None);
        assert_eq!(command.duration_minutes, 0);
        assert_eq!(command.area, "all");
    }

    struct FailingBackend;

    #[async_trait]
    impl AdvisoryBackend for FailingBackend {
        async fn invoke(&self, _prompt: &str) -> Result<String, BackendError> {
            Err(BackendError::Unreachable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn agent_tags_backend_failures() {
        let agent = AdvisoryAgent::new(Box::new(FailingBackend));
        let command = agent.run(SensorSnapshot::new(25.0, 60.0, 30.0)).await;
        assert_eq!(command.action, IrrigationAction::None);
        assert_eq!(command.duration_minutes, 0);
        assert!(command.error.as_deref().unwrap().contains("connection refused"));
    }

    struct StalledBackend;

    #[async_trait]
    impl AdvisoryBackend for StalledBackend {
        async fn invoke(&self, _prompt: &str) -> Result<String, BackendError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn agent_times_out_a_stalled_backend() {
        let agent =
            AdvisoryAgent::new(Box::new(StalledBackend)).with_timeout(Duration::from_millis(20));
        let command = agent.run(SensorSnapshot::new(25.0, 60.0, 30.0)).await;
        assert_eq!(command.action, IrrigationAction::None);
        assert!(command.error.as_deref().unwrap().contains("timed out"));
    }
}
