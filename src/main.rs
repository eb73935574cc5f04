use anyhow::Result;
use enovates::auth::SponsorToken;
use enovates::config::Config;
use enovates::logging::{get_logger, init_logging};
use enovates::modbus::ModbusClient;
use enovates::registry::{DriverRegistry, register_builtin};
use std::sync::Arc;
use tokio::time::{Duration, interval};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    init_logging(&config.logging)?;
    let logger = get_logger("main");
    logger.info(&format!(
        "Enovates charger driver {} starting up",
        env!("APP_VERSION")
    ));

    let mut registry = DriverRegistry::new();
    register_builtin(&mut registry)?;

    let client = Arc::new(ModbusClient::new(&config.modbus));
    let authorizer = SponsorToken::from_config(&config.sponsor);
    let charger = registry
        .create(
            &config.charger.driver,
            client.clone(),
            &authorizer,
            config.charger.driver_settings(),
        )
        .map_err(|e| anyhow::anyhow!("Failed to create driver: {}", e))?;

    // Only open the socket once the driver has been authorized
    if let Err(e) = client.connect().await {
        charger.close().await;
        return Err(e.into());
    }

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut ticker = interval(Duration::from_millis(config.poll_interval_ms));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match charger.snapshot().await {
                    Ok(snapshot) => logger.info(&serde_json::to_string(&snapshot)?),
                    Err(e) => logger.warn(&format!("Snapshot failed: {}", e)),
                }
            }
            _ = &mut shutdown => {
                logger.info("Shutdown signal received");
                break;
            }
        }
    }

    charger.close().await;
    client.disconnect().await;
    logger.info("Driver shutdown complete");
    Ok(())
}
