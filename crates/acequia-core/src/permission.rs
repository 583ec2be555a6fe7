use std::collections::HashMap;

/// Agent names known to a default deployment.
pub const SENSOR_AGENT: &str = "SensorAgent";
pub const ADVISORY_AGENT: &str = "AdvisoryAgent";
pub const IRRIGATION_AGENT: &str = "IrrigationAgent";
pub const WEATHER_AGENT: &str = "WeatherAgent";

pub const KNOWN_AGENTS: [&str; 4] = [
    SENSOR_AGENT,
    ADVISORY_AGENT,
    IRRIGATION_AGENT,
    WEATHER_AGENT,
];

/// Name-to-grant store consulted before any actuation.
///
/// Deny by default: a name nobody registered checks as `false`.
/// Registration happens once at startup; during a cycle the registry
/// is shared read-only behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct PermissionRegistry {
    grants: HashMap<String, bool>,
}

impl PermissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a configured grant map.
    pub fn from_map(map: &HashMap<String, bool>) -> Self {
        let mut registry = Self::new();
        for (name, enabled) in map {
            registry.register(name.clone(), *enabled);
        }
        registry
    }

    /// Insert or overwrite a grant. Idempotent.
    pub fn register(&mut self, name: impl Into<String>, enabled: bool) {
        self.grants.insert(name.into(), enabled);
    }

    /// `false` for any name never registered.
    pub fn check(&self, name: &str) -> bool {
        self.grants.get(name).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_denied() {
        let registry = PermissionRegistry::new();
        assert!(!registry.check("IrrigationAgent"));
        assert!(!registry.check("NoSuchAgent"));
    }

    #[test]
    fn registered_grant_is_honored() {
        let mut registry = PermissionRegistry::new();
        registry.register(IRRIGATION_AGENT, true);
        assert!(registry.check(IRRIGATION_AGENT));
    }

    #[test]
    fn explicit_deny_stays_denied() {
        let mut registry = PermissionRegistry::new();
        registry.register(IRRIGATION_AGENT, false);
        assert!(!registry.check(IRRIGATION_AGENT));
    }

    #[test]
    fn register_overwrites() {
        let mut registry = PermissionRegistry::new();
        registry.register(SENSOR_AGENT, true);
        registry.register(SENSOR_AGENT, false);
        assert!(!registry.check(SENSOR_AGENT));
        registry.register(SENSOR_AGENT, true);
        assert!(registry.check(SENSOR_AGENT));
    }

    #[test]
    fn from_map_carries_every_grant() {
        let mut map = HashMap::new();
        map.insert(IRRIGATION_AGENT.to_string(), true);
        map.insert(WEATHER_AGENT.to_string(), false);
        let registry = PermissionRegistry::from_map(&map);
        assert!(registry.check(IRRIGATION_AGENT));
        assert!(!registry.check(WEATHER_AGENT));
        assert!(!registry.check(SENSOR_AGENT));
    }
}
