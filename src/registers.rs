//! Enovates holding register map
//!
//! Every semantic field the driver touches is described once here: where it
//! lives, how many 16-bit registers it spans, how to decode it and how to
//! scale the decoded value into engineering units.

use crate::error::{EnovatesError, Result};

/// How a register slice is turned into raw integers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeKind {
    /// One unsigned 16-bit big-endian value per register
    U16Be,
    /// One unsigned 32-bit big-endian value per register pair (high word first)
    U32Be,
}

impl DecodeKind {
    /// Registers consumed by one decoded value
    pub const fn width(self) -> u16 {
        match self {
            DecodeKind::U16Be => 1,
            DecodeKind::U32Be => 2,
        }
    }
}

/// Conversion from raw register value to engineering units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Value is used as-is
    Raw,
    /// Value is divided by the given factor
    Divide(f64),
}

impl Scale {
    pub fn apply(self, raw: u32) -> f64 {
        match self {
            Scale::Raw => f64::from(raw),
            Scale::Divide(divisor) => f64::from(raw) / divisor,
        }
    }
}

/// Location and encoding of a single semantic field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegisterDescriptor {
    /// Short field name used in logs and errors
    pub name: &'static str,
    /// Holding register start address
    pub address: u16,
    /// Number of 16-bit registers to read
    pub count: u16,
    /// Decode width
    pub kind: DecodeKind,
    /// Scale into engineering units
    pub scale: Scale,
}

impl RegisterDescriptor {
    const fn new(
        name: &'static str,
        address: u16,
        count: u16,
        kind: DecodeKind,
        scale: Scale,
    ) -> Self {
        Self {
            name,
            address,
            count,
            kind,
            scale,
        }
    }

    /// Decode the first `count` registers of `regs` into raw integers
    pub fn decode_raw(&self, regs: &[u16]) -> Result<Vec<u32>> {
        let needed = usize::from(self.count);
        if regs.len() < needed {
            return Err(EnovatesError::short_response(needed, regs.len()));
        }
        let values = match self.kind {
            DecodeKind::U16Be => regs[..needed].iter().map(|&r| u32::from(r)).collect(),
            DecodeKind::U32Be => regs[..needed]
                .chunks_exact(2)
                .map(|pair| decode_u32(pair[0], pair[1]))
                .collect(),
        };
        Ok(values)
    }

    /// Decode and scale into engineering units
    pub fn decode_scaled(&self, regs: &[u16]) -> Result<Vec<f64>> {
        Ok(self
            .decode_raw(regs)?
            .into_iter()
            .map(|raw| self.scale.apply(raw))
            .collect())
    }

    /// Decode exactly one raw value
    pub fn decode_single(&self, regs: &[u16]) -> Result<u32> {
        self.decode_raw(regs)?
            .first()
            .copied()
            .ok_or_else(|| EnovatesError::short_response(usize::from(self.count), 0))
    }
}

/// Combine two registers, high word first
pub const fn decode_u32(high: u16, low: u16) -> u32 {
    ((high as u32) << 16) | low as u32
}

/// Number of connector output phases
pub const PHASES: RegisterDescriptor =
    RegisterDescriptor::new("phases", 51, 1, DecodeKind::U16Be, Scale::Raw);
/// Max amp per phase supported by the hardware
pub const MAX_AMP: RegisterDescriptor =
    RegisterDescriptor::new("max_amp", 52, 1, DecodeKind::U16Be, Scale::Raw);
/// OCPP status
pub const OCPP_STATUS: RegisterDescriptor =
    RegisterDescriptor::new("ocpp_status", 53, 1, DecodeKind::U16Be, Scale::Raw);
/// Load shedding enabled
pub const LOAD_SHEDDING: RegisterDescriptor =
    RegisterDescriptor::new("load_shedding", 54, 1, DecodeKind::U16Be, Scale::Raw);
/// Lock state
pub const LOCK_STATE: RegisterDescriptor =
    RegisterDescriptor::new("lock_state", 55, 1, DecodeKind::U16Be, Scale::Raw);
/// Contactor state
pub const CONTACTOR: RegisterDescriptor =
    RegisterDescriptor::new("contactor", 56, 1, DecodeKind::U16Be, Scale::Raw);
/// LED index
pub const LED: RegisterDescriptor =
    RegisterDescriptor::new("led", 57, 1, DecodeKind::U16Be, Scale::Raw);
/// Measured current L1-L3, mA on the wire
pub const CURRENTS: RegisterDescriptor =
    RegisterDescriptor::new("currents", 201, 3, DecodeKind::U16Be, Scale::Divide(1000.0));
/// Measured voltage L1-L3, dV on the wire
pub const VOLTAGES: RegisterDescriptor =
    RegisterDescriptor::new("voltages", 204, 3, DecodeKind::U16Be, Scale::Divide(10.0));
/// Active power total in W
pub const POWER_TOTAL: RegisterDescriptor =
    RegisterDescriptor::new("power_total", 207, 2, DecodeKind::U32Be, Scale::Raw);
/// Active energy import total, Wh on the wire
pub const ENERGY: RegisterDescriptor =
    RegisterDescriptor::new("energy", 214, 2, DecodeKind::U32Be, Scale::Divide(1000.0));
/// IEC 61851 mode 3 state
pub const MODE3_STATE: RegisterDescriptor =
    RegisterDescriptor::new("mode3_state", 301, 1, DecodeKind::U16Be, Scale::Raw);
/// Current offered to the vehicle in mA
pub const CURRENT_OFFERED: RegisterDescriptor =
    RegisterDescriptor::new("current_offered", 401, 1, DecodeKind::U16Be, Scale::Raw);

/// Full register map in address order
pub const ALL: [RegisterDescriptor; 13] = [
    PHASES,
    MAX_AMP,
    OCPP_STATUS,
    LOAD_SHEDDING,
    LOCK_STATE,
    CONTACTOR,
    LED,
    CURRENTS,
    VOLTAGES,
    POWER_TOTAL,
    ENERGY,
    MODE3_STATE,
    CURRENT_OFFERED,
];
