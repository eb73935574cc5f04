use super::*;

impl Default for ModbusConfig {
    fn default() -> Self {
        Self {
            ip: "192.168.1.100".to_string(),
            port: 502,
            slave_id: 1,
            connect_timeout_ms: 5000,
            operation_timeout_ms: 2000,
        }
    }
}

impl Default for ChargerConfig {
    fn default() -> Self {
        Self {
            driver: "enovates".to_string(),
            keepalive_interval_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: "/tmp/enovates.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modbus: ModbusConfig::default(),
            charger: ChargerConfig::default(),
            sponsor: SponsorConfig::default(),
            logging: LoggingConfig::default(),
            poll_interval_ms: 5000,
        }
    }
}
