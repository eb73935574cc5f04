//! Configuration management for the Enovates driver
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files.

use crate::driver::DriverSettings;
use crate::error::{EnovatesError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

mod defaults;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Modbus TCP connection configuration
    pub modbus: ModbusConfig,

    /// Charger driver selection and behavior
    pub charger: ChargerConfig,

    /// Sponsor entitlement
    pub sponsor: SponsorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Measurement logging interval in milliseconds
    pub poll_interval_ms: u64,
}

/// Modbus TCP connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModbusConfig {
    /// IP address of the EV charger
    pub ip: String,

    /// TCP port (typically 502)
    pub port: u16,

    /// Modbus unit id of the charger
    pub slave_id: u8,

    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,

    /// Per-request timeout in milliseconds
    pub operation_timeout_ms: u64,
}

/// Charger driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargerConfig {
    /// Registered driver name
    pub driver: String,

    /// Keep-alive status poll interval in seconds
    pub keepalive_interval_seconds: u64,
}

/// Sponsor entitlement configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SponsorConfig {
    /// Sponsor token; empty means not entitled
    pub token: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl ChargerConfig {
    /// Runtime settings handed to the driver factory
    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            keepalive_interval: Duration::from_secs(self.keepalive_interval_seconds),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        let default_paths = [
            "enovates.yaml",
            "/data/enovates.yaml",
            "/etc/enovates/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.modbus.ip.is_empty() {
            return Err(EnovatesError::validation(
                "modbus.ip",
                "IP address cannot be empty",
            ));
        }

        if self.modbus.port == 0 {
            return Err(EnovatesError::validation(
                "modbus.port",
                "Port must be greater than 0",
            ));
        }

        if self.modbus.operation_timeout_ms == 0 {
            return Err(EnovatesError::validation(
                "modbus.operation_timeout_ms",
                "Must be greater than 0",
            ));
        }

        if self.charger.driver.is_empty() {
            return Err(EnovatesError::validation(
                "charger.driver",
                "Driver name cannot be empty",
            ));
        }

        if self.charger.keepalive_interval_seconds == 0 {
            return Err(EnovatesError::validation(
                "charger.keepalive_interval_seconds",
                "Must be greater than 0",
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(EnovatesError::validation(
                "poll_interval_ms",
                "Must be greater than 0",
            ));
        }

        Ok(())
    }
}
