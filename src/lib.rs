//! # Enovates - EV Charger Driver
//!
//! Monitors and controls an Enovates wallbox over Modbus TCP: charge state,
//! enabling and disabling power delivery, the offered charging current and
//! the per-phase measurements.
//!
//! ## Architecture
//!
//! - `registers`: Holding register map (address, width, scale per field)
//! - `modbus`: Transport trait and the tokio-modbus TCP client
//! - `charger`: Charger capability traits and charge status
//! - `auth`: Entitlement check injected at driver construction
//! - `driver`: Enovates driver and its keep-alive task
//! - `registry`: Named driver factories populated at startup
//! - `config`: YAML configuration and validation
//! - `logging`: Structured logging and tracing
//! - `error`: Error types

pub mod auth;
pub mod charger;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod modbus;
pub mod registers;
pub mod registry;

// Re-export commonly used types
pub use charger::{ChargeStatus, Charger};
pub use config::Config;
pub use driver::EnovatesDriver;
pub use error::{EnovatesError, Result};
