use serde::{Deserialize, Serialize};

fn default_max_duration() -> u32 {
    60
}

/// Actuation limits applied after the permission gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrigationPolicy {
    /// Longest single irrigation run, in minutes. Longer requests are
    /// clamped, not rejected.
    #[serde(default = "default_max_duration")]
    pub max_duration_minutes: u32,
}

impl Default for IrrigationPolicy {
    fn default() -> Self {
        Self {
            max_duration_minutes: default_max_duration(),
        }
    }
}

impl IrrigationPolicy {
    /// Duration actually allowed for one run.
    pub fn clamp(&self, requested_minutes: u32) -> u32 {
        requested_minutes.min(self.max_duration_minutes)
    }
}
