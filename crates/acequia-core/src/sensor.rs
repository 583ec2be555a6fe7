use async_trait::async_trait;

use crate::agent::Agent;
use crate::permission::SENSOR_AGENT;
use crate::types::SensorSnapshot;

/// Stubbed environmental sensor.
///
/// A real deployment would poll hardware here; this version reports a
/// configured snapshot so the rest of the pipeline can be exercised
/// end to end.
#[derive(Debug, Clone)]
pub struct SensorAgent {
    snapshot: SensorSnapshot,
}

impl SensorAgent {
    pub fn new(snapshot: SensorSnapshot) -> Self {
        Self { snapshot }
    }
}

impl Default for SensorAgent {
    fn default() -> Self {
        Self::new(SensorSnapshot::new(25.0, 60.0, 30.0))
    }
}

#[async_trait]
impl Agent for SensorAgent {
    const NAME: &'static str = SENSOR_AGENT;
    type Input = ();
    type Output = SensorSnapshot;

    async fn run(&self, _input: ()) -> SensorSnapshot {
        tracing::debug!(
            temperature = ?self.snapshot.temperature,
            humidity = ?self.snapshot.humidity,
            soil_moisture = ?self.snapshot.soil_moisture,
            "sensor snapshot read"
        );
        self.snapshot.clone()
    }
}
