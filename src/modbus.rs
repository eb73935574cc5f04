//! Modbus transport for Enovates charger communication
//!
//! The driver only depends on the [`Transport`] trait. [`ModbusClient`] is the
//! tokio-modbus TCP implementation; it serializes concurrent requests behind a
//! mutex and bounds every request with a timeout. Reconnection is left to the
//! caller.

use crate::config::ModbusConfig;
use crate::error::{EnovatesError, Result};
use crate::logging::{LogContext, get_logger_with_context};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_modbus::client::tcp;
use tokio_modbus::prelude::*;

/// Holding register request/response transport
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Read `count` holding registers starting at `address`
    async fn read_holding_registers(&self, address: u16, count: u16) -> Result<Vec<u16>>;

    /// Write a single holding register
    async fn write_single_register(&self, address: u16, value: u16) -> Result<()>;

    /// Optional connection status. Default: unknown (None).
    fn connection_status(&self) -> Option<bool> {
        None
    }
}

/// Modbus TCP client for Enovates communication
pub struct ModbusClient {
    /// Modbus TCP client connection
    client: Mutex<Option<tokio_modbus::client::Context>>,

    /// Configuration
    config: ModbusConfig,

    /// Connection timeout
    connection_timeout: Duration,

    /// Operation timeout
    operation_timeout: Duration,

    /// Logger
    logger: crate::logging::StructuredLogger,
}

impl ModbusClient {
    /// Create a new Modbus client
    pub fn new(config: &ModbusConfig) -> Self {
        let logger = get_logger_with_context(
            LogContext::new("modbus")
                .with_device(format!("{}:{}", config.ip, config.port))
                .with_field("slave", config.slave_id.to_string()),
        );
        Self {
            client: Mutex::new(None),
            config: config.clone(),
            connection_timeout: Duration::from_millis(config.connect_timeout_ms),
            operation_timeout: Duration::from_millis(config.operation_timeout_ms),
            logger,
        }
    }

    /// Connect to the Modbus server
    pub async fn connect(&self) -> Result<()> {
        let address = format!("{}:{}", self.config.ip, self.config.port);

        self.logger
            .info(&format!("Connecting to Modbus server at {}", address));

        let socket_addr: std::net::SocketAddr = address
            .parse()
            .map_err(|e| EnovatesError::modbus(format!("Invalid socket address: {}", e)))?;

        let slave = Slave(self.config.slave_id);
        match timeout(self.connection_timeout, tcp::connect_slave(socket_addr, slave)).await {
            Ok(Ok(ctx)) => {
                *self.client.lock().await = Some(ctx);
                self.logger.info("Successfully connected to Modbus server");
                Ok(())
            }
            Ok(Err(e)) => {
                let error_msg = format!("Failed to connect to Modbus server: {}", e);
                self.logger.error(&error_msg);
                Err(EnovatesError::modbus(error_msg))
            }
            Err(_) => {
                let error_msg = "Connection timeout".to_string();
                self.logger.error(&error_msg);
                Err(EnovatesError::timeout(error_msg))
            }
        }
    }

    /// Disconnect from the Modbus server
    pub async fn disconnect(&self) {
        if self.client.lock().await.take().is_some() {
            self.logger.info("Disconnecting from Modbus server");
        }
    }

    /// Check if connected
    pub async fn is_connected(&self) -> bool {
        self.client.lock().await.is_some()
    }
}

#[async_trait::async_trait]
impl Transport for ModbusClient {
    async fn read_holding_registers(&self, address: u16, count: u16) -> Result<Vec<u16>> {
        self.logger.debug(&format!(
            "Reading {} registers from address {} on slave {}",
            count, address, self.config.slave_id
        ));

        let mut guard = self.client.lock().await;
        let client = guard
            .as_mut()
            .ok_or_else(|| EnovatesError::modbus("Not connected to Modbus server"))?;

        match timeout(
            self.operation_timeout,
            client.read_holding_registers(address, count),
        )
        .await
        {
            Ok(Ok(Ok(response))) => {
                self.logger.trace(&format!(
                    "Read {} registers: {:?}",
                    response.len(),
                    response
                ));
                Ok(response)
            }
            Ok(Ok(Err(exception))) => {
                let error_msg = format!("Read exception at {}: {:?}", address, exception);
                self.logger.error(&error_msg);
                Err(EnovatesError::modbus(error_msg))
            }
            Ok(Err(e)) => {
                let error_msg = format!("Failed to read holding registers: {}", e);
                self.logger.error(&error_msg);
                Err(EnovatesError::modbus(error_msg))
            }
            Err(_) => {
                let error_msg = "Read operation timeout".to_string();
                self.logger.error(&error_msg);
                Err(EnovatesError::timeout(error_msg))
            }
        }
    }

    async fn write_single_register(&self, address: u16, value: u16) -> Result<()> {
        self.logger.debug(&format!(
            "Writing value {} to register {} on slave {}",
            value, address, self.config.slave_id
        ));

        let mut guard = self.client.lock().await;
        let client = guard
            .as_mut()
            .ok_or_else(|| EnovatesError::modbus("Not connected to Modbus server"))?;

        match timeout(
            self.operation_timeout,
            client.write_single_register(address, value),
        )
        .await
        {
            Ok(Ok(Ok(()))) => {
                self.logger.debug("Successfully wrote single register");
                Ok(())
            }
            Ok(Ok(Err(exception))) => {
                let error_msg = format!("Write exception at {}: {:?}", address, exception);
                self.logger.error(&error_msg);
                Err(EnovatesError::modbus(error_msg))
            }
            Ok(Err(e)) => {
                let error_msg = format!("Failed to write single register: {}", e);
                self.logger.error(&error_msg);
                Err(EnovatesError::modbus(error_msg))
            }
            Err(_) => {
                let error_msg = "Write operation timeout".to_string();
                self.logger.error(&error_msg);
                Err(EnovatesError::timeout(error_msg))
            }
        }
    }

    fn connection_status(&self) -> Option<bool> {
        self.client.try_lock().ok().map(|guard| guard.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modbus_config() {
        let config = ModbusConfig::default();
        assert_eq!(config.port, 502);
        assert_eq!(config.slave_id, 1);
    }

    #[tokio::test]
    async fn test_modbus_client_creation() {
        let config = ModbusConfig::default();
        let client = ModbusClient::new(&config);
        assert!(!client.is_connected().await);
        assert_eq!(client.connection_status(), Some(false));
    }

    #[test]
    fn test_logger_carries_device_address() {
        let cfg = ModbusConfig {
            ip: "10.0.0.5".to_string(),
            port: 1502,
            ..Default::default()
        };
        let client = ModbusClient::new(&cfg);
        assert_eq!(client.logger.context.device.as_deref(), Some("10.0.0.5:1502"));
        assert_eq!(
            client.logger.context.extra_fields.get("slave"),
            Some(&"1".to_string())
        );
    }

    #[tokio::test]
    async fn test_connect_invalid_address_errors() {
        let cfg = ModbusConfig {
            ip: "bad host".to_string(),
            ..Default::default()
        };
        let client = ModbusClient::new(&cfg);
        let err = client.connect().await.unwrap_err();
        assert!(err.to_string().contains("Invalid socket address"));
    }

    #[tokio::test]
    async fn test_read_write_without_connect_returns_not_connected() {
        let client = ModbusClient::new(&ModbusConfig::default());
        let err_r = client.read_holding_registers(301, 1).await.unwrap_err();
        assert!(err_r.to_string().contains("Not connected"));
        assert!(err_r.is_transport());
        let err_w = client.write_single_register(401, 0).await.unwrap_err();
        assert!(err_w.to_string().contains("Not connected"));
    }
}
