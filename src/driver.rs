//! Enovates charger driver
//!
//! Translates the [`Charger`] contract into reads and writes of the Enovates
//! holding registers. The driver keeps exactly one piece of state, the last
//! commanded current set-point; everything else is sampled from the hardware
//! on every call.

use crate::auth::Authorizer;
use crate::charger::{
    ChargeStatus, Charger, ChargerSnapshot, CurrentLimiter, Meter, MeterEnergy, PhaseCurrents,
    PhaseVoltages,
};
use crate::error::{EnovatesError, Result};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use crate::modbus::Transport;
use crate::registers::{self, RegisterDescriptor};
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

pub mod keepalive;
mod types;

pub use keepalive::KeepAlive;
pub use types::DriverSettings;

/// Minimum current the EVSE may offer while charging is permitted
pub const MIN_CURRENT_A: i64 = 6;

/// Set-point applied until the first `set_max_current`
pub const DEFAULT_SET_POINT_MA: u16 = 6000;

/// Enovates wallbox driver
pub struct EnovatesDriver {
    transport: Arc<dyn Transport>,

    /// Last commanded current in mA. Concurrent `set_max_current` calls are
    /// not serialized: the last store wins.
    set_point_ma: AtomicU16,

    keepalive: KeepAlive,

    logger: StructuredLogger,
}

impl EnovatesDriver {
    /// Registry name
    pub const NAME: &'static str = "enovates";

    /// Create a driver and start its keep-alive task.
    ///
    /// The authorizer is consulted before anything else; a refusal yields
    /// `PermissionDenied` without any transport traffic. Outside of a Tokio
    /// runtime construction fails with a `Config` error.
    pub fn new(
        transport: Arc<dyn Transport>,
        authorizer: &dyn Authorizer,
        settings: DriverSettings,
    ) -> Result<Self> {
        if !authorizer.is_authorized() {
            return Err(EnovatesError::permission_denied(
                "sponsor token required for enovates driver",
            ));
        }

        let logger = get_logger_with_context(LogContext::new("driver").with_field(
            "keepalive_s",
            settings.keepalive_interval.as_secs().to_string(),
        ));
        logger.info("Initializing Enovates charger driver");

        let keepalive = KeepAlive::spawn(transport.clone(), settings.keepalive_interval)?;

        Ok(Self {
            transport,
            set_point_ma: AtomicU16::new(DEFAULT_SET_POINT_MA),
            keepalive,
            logger,
        })
    }

    /// Factory matching [`crate::registry::DriverFactory`]
    pub fn factory(
        transport: Arc<dyn Transport>,
        authorizer: &dyn Authorizer,
        settings: DriverSettings,
    ) -> Result<Arc<dyn Charger>> {
        Ok(Arc::new(Self::new(transport, authorizer, settings)?))
    }

    /// Last commanded current in mA
    pub fn set_point_ma(&self) -> u16 {
        self.set_point_ma.load(Ordering::Relaxed)
    }

    /// Whether the keep-alive task is still polling
    pub fn keepalive_running(&self) -> bool {
        self.keepalive.is_running()
    }

    /// Number of connector output phases
    pub async fn phases(&self) -> Result<u16> {
        let raw = self.read_single(&registers::PHASES).await?;
        Ok(raw as u16)
    }

    async fn read(&self, reg: &RegisterDescriptor) -> Result<Vec<u16>> {
        self.transport
            .read_holding_registers(reg.address, reg.count)
            .await
    }

    async fn read_single(&self, reg: &RegisterDescriptor) -> Result<u32> {
        reg.decode_single(&self.read(reg).await?)
    }

    async fn read_triplet(&self, reg: &RegisterDescriptor) -> Result<(f64, f64, f64)> {
        match reg.decode_scaled(&self.read(reg).await?)?.as_slice() {
            [l1, l2, l3] => Ok((*l1, *l2, *l3)),
            other => Err(EnovatesError::short_response(3, other.len())),
        }
    }
}

/// Map a raw mode 3 register value onto a charge state
pub fn decode_status(raw: u32) -> Result<ChargeStatus> {
    match raw {
        0 => Ok(ChargeStatus::A),
        1..=3 => Ok(ChargeStatus::B),
        4 => Ok(ChargeStatus::C),
        _ => Err(EnovatesError::protocol_decode(
            registers::MODE3_STATE.name,
            raw,
        )),
    }
}

/// Read and decode the mode 3 state register
pub async fn read_status(transport: &dyn Transport) -> Result<ChargeStatus> {
    let reg = registers::MODE3_STATE;
    let regs = transport
        .read_holding_registers(reg.address, reg.count)
        .await?;
    decode_status(reg.decode_single(&regs)?)
}

#[async_trait::async_trait]
impl Charger for EnovatesDriver {
    async fn status(&self) -> Result<ChargeStatus> {
        read_status(self.transport.as_ref()).await
    }

    async fn enabled(&self) -> Result<bool> {
        Ok(self.read_single(&registers::CURRENT_OFFERED).await? > 0)
    }

    async fn enable(&self, enable: bool) -> Result<()> {
        let current = if enable { self.set_point_ma() } else { 0 };
        self.logger.debug(&format!(
            "Writing current offered {} mA (enable={})",
            current, enable
        ));
        self.transport
            .write_single_register(registers::CURRENT_OFFERED.address, current)
            .await
    }

    async fn set_max_current(&self, amps: i64) -> Result<()> {
        if amps < MIN_CURRENT_A {
            return Err(EnovatesError::invalid_argument(
                "current",
                "must be at least 6 A",
            ));
        }
        let milliamps = amps
            .checked_mul(1000)
            .and_then(|ma| u16::try_from(ma).ok())
            .ok_or_else(|| {
                EnovatesError::invalid_argument("current", "exceeds 16-bit mA register range")
            })?;

        self.set_point_ma.store(milliamps, Ordering::Relaxed);
        self.logger.info(&format!("Set-point changed to {} A", amps));

        // No register stages a current without offering it
        self.enable(true).await
    }

    async fn snapshot(&self) -> Result<ChargerSnapshot> {
        let status = self.status().await?;
        let enabled = self.enabled().await?;
        let (c1, c2, c3) = self.currents().await?;
        let (v1, v2, v3) = self.voltages().await?;
        Ok(ChargerSnapshot {
            timestamp: chrono::Utc::now(),
            status,
            enabled,
            currents: Some([c1, c2, c3]),
            voltages: Some([v1, v2, v3]),
            power_w: Some(self.current_power().await?),
            energy_kwh: Some(self.total_energy().await?),
            phases: Some(self.phases().await?),
            max_amps: Some(self.max_amps().await?),
        })
    }

    async fn close(&self) {
        self.logger.info("Stopping Enovates charger driver");
        self.keepalive.shutdown().await;
    }
}

#[async_trait::async_trait]
impl PhaseCurrents for EnovatesDriver {
    async fn currents(&self) -> Result<(f64, f64, f64)> {
        self.read_triplet(&registers::CURRENTS).await
    }
}

#[async_trait::async_trait]
impl PhaseVoltages for EnovatesDriver {
    async fn voltages(&self) -> Result<(f64, f64, f64)> {
        self.read_triplet(&registers::VOLTAGES).await
    }
}

#[async_trait::async_trait]
impl Meter for EnovatesDriver {
    async fn current_power(&self) -> Result<f64> {
        let reg = registers::POWER_TOTAL;
        Ok(reg.scale.apply(self.read_single(&reg).await?))
    }
}

#[async_trait::async_trait]
impl MeterEnergy for EnovatesDriver {
    async fn total_energy(&self) -> Result<f64> {
        let reg = registers::ENERGY;
        Ok(reg.scale.apply(self.read_single(&reg).await?))
    }
}

#[async_trait::async_trait]
impl CurrentLimiter for EnovatesDriver {
    async fn max_amps(&self) -> Result<i64> {
        Ok(i64::from(self.read_single(&registers::MAX_AMP).await?))
    }
}

#[cfg(test)]
mod tests;
