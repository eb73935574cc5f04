use std::time::Duration;

/// Runtime settings handed to a driver factory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverSettings {
    /// Interval between keep-alive status polls
    pub keepalive_interval: Duration,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            keepalive_interval: Duration::from_secs(30),
        }
    }
}
