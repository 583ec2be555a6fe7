use serde::{Deserialize, Serialize};

/// Irrigation target used when the advisory names no zone.
pub const DEFAULT_AREA: &str = "all";

/// One reading of the field environment.
///
/// A faulted sensor still produces a snapshot: affected readings are
/// `None` and `error` names the fault, so the rest of the pipeline
/// keeps moving with degraded data instead of halting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Air temperature in degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
    /// Volumetric soil moisture, 0-100 percent.
    pub soil_moisture: Option<f64>,
    /// Fault marker for a degraded read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SensorSnapshot {
    pub fn new(temperature: f64, humidity: f64, soil_moisture: f64) -> Self {
        Self {
            temperature: Some(temperature),
            humidity: Some(humidity),
            soil_moisture: Some(soil_moisture),
            error: None,
        }
    }

    /// Snapshot-shaped fault: no readings, reason recorded.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            temperature: None,
            humidity: None,
            soil_moisture: None,
            error: Some(reason.into()),
        }
    }
}

/// What the advisory decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrrigationAction {
    Irrigate,
    None,
}

impl std::fmt::Display for IrrigationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IrrigationAction::Irrigate => write!(f, "irrigate"),
            IrrigationAction::None => write!(f, "none"),
        }
    }
}

/// A validated irrigation command, ready for the actuation gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationCommand {
    pub action: IrrigationAction,
    pub duration_minutes: u32,
    pub area: String,
    /// Verbatim backend text this command was parsed from.
    #[serde(default)]
    pub raw_advisory: String,
    /// Set when the command is a fallback caused by a backend fault.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IrrigationCommand {
    /// The no-op command every advisory failure degrades to.
    pub fn safe_fallback(raw_advisory: impl Into<String>) -> Self {
        Self {
            action: IrrigationAction::None,
            duration_minutes: 0,
            area: DEFAULT_AREA.to_string(),
            raw_advisory: raw_advisory.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, detail: impl Into<String>) -> Self {
        self.error = Some(detail.into());
        self
    }
}

/// Result of one actuation attempt (or refusal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuationOutcome {
    pub executed: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Current conditions from the weather stub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall_mm: f64,
    pub condition: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_fallback_is_a_noop() {
        let command = IrrigationCommand::safe_fallback("gibberish");
        assert_eq!(command.action, IrrigationAction::None);
        assert_eq!(command.duration_minutes, 0);
        assert_eq!(command.area, "all");
        assert_eq!(command.raw_advisory, "gibberish");
        assert!(command.error.is_none());
    }

    #[test]
    fn with_error_tags_the_command() {
        let command = IrrigationCommand::safe_fallback("").with_error("backend down");
        assert_eq!(command.error.as_deref(), Some("backend down"));
    }

    #[test]
    fn actions_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&IrrigationAction::Irrigate).unwrap(),
            "\"irrigate\""
        );
        assert_eq!(
            serde_json::to_string(&IrrigationAction::None).unwrap(),
            "\"none\""
        );
    }

    #[test]
    fn unavailable_snapshot_keeps_shape() {
        let snapshot = SensorSnapshot::unavailable("probe offline");
        assert!(snapshot.soil_moisture.is_none());
        assert!(snapshot.temperature.is_none());
        assert_eq!(snapshot.error.as_deref(), Some("probe offline"));
    }

    #[test]
    fn outcome_omits_absent_error_in_json() {
        let outcome = ActuationOutcome {
            executed: true,
            message: "ok".into(),
            error: None,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(!json.contains("error"));
    }
}
