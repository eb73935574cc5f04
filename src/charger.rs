//! Charger capability contract
//!
//! Drivers implement [`Charger`] plus whichever measurement traits the
//! hardware supports. Callers hold drivers behind these traits so a registry
//! can hand out any registered implementation.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// IEC 61851 mode 3 charge state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeStatus {
    /// No vehicle connected
    A,
    /// Vehicle connected, not charging
    B,
    /// Charging
    C,
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChargeStatus::A => "A",
            ChargeStatus::B => "B",
            ChargeStatus::C => "C",
        };
        f.write_str(s)
    }
}

/// Point-in-time charger readout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargerSnapshot {
    pub timestamp: DateTime<Utc>,
    pub status: ChargeStatus,
    pub enabled: bool,
    /// L1..L3 in A
    pub currents: Option<[f64; 3]>,
    /// L1..L3 in V
    pub voltages: Option<[f64; 3]>,
    pub power_w: Option<f64>,
    pub energy_kwh: Option<f64>,
    pub phases: Option<u16>,
    pub max_amps: Option<i64>,
}

/// Core charger control
#[async_trait::async_trait]
pub trait Charger: Send + Sync {
    /// Current charge state
    async fn status(&self) -> Result<ChargeStatus>;

    /// Whether the charger currently offers current to the vehicle
    async fn enabled(&self) -> Result<bool>;

    /// Enable or disable power delivery
    async fn enable(&self, enable: bool) -> Result<()>;

    /// Set the maximum charging current in amps
    async fn set_max_current(&self, amps: i64) -> Result<()>;

    /// Point-in-time readout; drivers with measurement registers fill in more
    async fn snapshot(&self) -> Result<ChargerSnapshot> {
        Ok(ChargerSnapshot {
            timestamp: Utc::now(),
            status: self.status().await?,
            enabled: self.enabled().await?,
            currents: None,
            voltages: None,
            power_w: None,
            energy_kwh: None,
            phases: None,
            max_amps: None,
        })
    }

    /// Stop background work owned by the driver
    async fn close(&self) {}
}

/// Per-phase current measurement in A
#[async_trait::async_trait]
pub trait PhaseCurrents: Send + Sync {
    async fn currents(&self) -> Result<(f64, f64, f64)>;
}

/// Per-phase voltage measurement in V
#[async_trait::async_trait]
pub trait PhaseVoltages: Send + Sync {
    async fn voltages(&self) -> Result<(f64, f64, f64)>;
}

/// Active power measurement in W
#[async_trait::async_trait]
pub trait Meter: Send + Sync {
    async fn current_power(&self) -> Result<f64>;
}

/// Cumulative imported energy in kWh
#[async_trait::async_trait]
pub trait MeterEnergy: Send + Sync {
    async fn total_energy(&self) -> Result<f64>;
}

/// Hardware current ceiling in A
#[async_trait::async_trait]
pub trait CurrentLimiter: Send + Sync {
    async fn max_amps(&self) -> Result<i64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serializes_missing_measurements_as_null() {
        let snap = ChargerSnapshot {
            timestamp: "2024-01-01T00:00:00Z".parse().unwrap(),
            status: ChargeStatus::B,
            enabled: false,
            currents: None,
            voltages: Some([230.0, 230.0, 230.0]),
            power_w: None,
            energy_kwh: None,
            phases: None,
            max_amps: None,
        };
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00Z");
        assert_eq!(json["status"], "B");
        assert!(json["currents"].is_null());
        assert_eq!(json["voltages"][0], 230.0);

        let back: ChargerSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back.timestamp, snap.timestamp);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ChargeStatus::A.to_string(), "A");
        assert_eq!(ChargeStatus::C.to_string(), "C");
    }
}
