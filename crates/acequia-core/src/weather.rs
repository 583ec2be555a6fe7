use async_trait::async_trait;

use crate::agent::Agent;
use crate::permission::WEATHER_AGENT;
use crate::types::WeatherReport;

/// Stubbed weather feed.
///
/// Not part of the v1 irrigation cycle; kept alongside the other
/// agents for callers that want current conditions next to the soil
/// readings.
#[derive(Debug, Clone)]
pub struct WeatherAgent {
    report: WeatherReport,
}

impl WeatherAgent {
    pub fn new(report: WeatherReport) -> Self {
        Self { report }
    }
}

impl Default for WeatherAgent {
    fn default() -> Self {
        Self::new(WeatherReport {
            temperature: 28.0,
            humidity: 70.0,
            rainfall_mm: 0.0,
            condition: "clear".to_string(),
        })
    }
}

#[async_trait]
impl Agent for WeatherAgent {
    const NAME: &'static str = WEATHER_AGENT;
    type Input = String;
    type Output = WeatherReport;

    async fn run(&self, location: String) -> WeatherReport {
        tracing::debug!(%location, condition = %self.report.condition, "weather report read");
        self.report.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_report_is_clear_and_dry() {
        let report = WeatherAgent::default().run("field-1".to_string()).await;
        assert_eq!(report.condition, "clear");
        assert_eq!(report.rainfall_mm, 0.0);
        assert_eq!(report.temperature, 28.0);
    }

    #[tokio::test]
    async fn configured_report_passes_through() {
        let agent = WeatherAgent::new(WeatherReport {
            temperature: 12.0,
            humidity: 95.0,
            rainfall_mm: 4.2,
            condition: "rain".to_string(),
        });
        let report = agent.run("anywhere".to_string()).await;
        assert_eq!(report.condition, "rain");
        assert_eq!(report.rainfall_mm, 4.2);
    }

    #[test]
    fn registry_identity() {
        assert_eq!(WeatherAgent::NAME, "WeatherAgent");
    }
}
