//! Named charger driver factories
//!
//! The application builds a [`DriverRegistry`] during startup, registers the
//! drivers it ships with and resolves the configured one by name.

use crate::auth::Authorizer;
use crate::charger::Charger;
use crate::driver::{DriverSettings, EnovatesDriver};
use crate::error::{EnovatesError, Result};
use crate::logging::get_logger;
use crate::modbus::Transport;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Constructor for a registered driver
pub type DriverFactory =
    fn(Arc<dyn Transport>, &dyn Authorizer, DriverSettings) -> Result<Arc<dyn Charger>>;

/// Lookup table of driver factories
pub struct DriverRegistry {
    factories: BTreeMap<String, DriverFactory>,
    logger: crate::logging::StructuredLogger,
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
            logger: get_logger("registry"),
        }
    }

    /// Register a factory; names are case-insensitive and must be unique
    pub fn register(&mut self, name: &str, factory: DriverFactory) -> Result<()> {
        let key = name.to_lowercase();
        if self.factories.contains_key(&key) {
            return Err(EnovatesError::config(format!(
                "Driver already registered: {}",
                key
            )));
        }
        self.logger.debug(&format!("Registered driver {}", key));
        self.factories.insert(key, factory);
        Ok(())
    }

    /// Construct the driver registered under `name`
    pub fn create(
        &self,
        name: &str,
        transport: Arc<dyn Transport>,
        authorizer: &dyn Authorizer,
        settings: DriverSettings,
    ) -> Result<Arc<dyn Charger>> {
        let factory = self
            .factories
            .get(&name.to_lowercase())
            .ok_or_else(|| EnovatesError::unknown_driver(name))?;
        factory(transport, authorizer, settings)
    }

    /// Registered driver names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

/// Register every driver shipped with this crate
pub fn register_builtin(registry: &mut DriverRegistry) -> Result<()> {
    registry.register(EnovatesDriver::NAME, EnovatesDriver::factory)
}
