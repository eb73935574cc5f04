// Shared in-memory transport for integration tests
#![allow(dead_code)]

use enovates::error::{EnovatesError, Result};
use enovates::modbus::Transport;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Register bank backed transport; writes land in the bank so reads see them
#[derive(Default)]
pub struct MockTransport {
    registers: Mutex<HashMap<u16, u16>>,
    reads: Mutex<Vec<(u16, u16)>>,
    writes: Mutex<Vec<(u16, u16)>>,
    short_reads: AtomicBool,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, address: u16, values: &[u16]) {
        let mut regs = self.registers.lock().unwrap();
        for (i, v) in values.iter().enumerate() {
            regs.insert(address + i as u16, *v);
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_short_reads(&self, short: bool) {
        self.short_reads.store(short, Ordering::SeqCst);
    }

    pub fn reads(&self) -> Vec<(u16, u16)> {
        self.reads.lock().unwrap().clone()
    }

    pub fn reads_at(&self, address: u16) -> usize {
        self.reads().iter().filter(|(a, _)| *a == address).count()
    }

    pub fn writes(&self) -> Vec<(u16, u16)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn read_holding_registers(&self, address: u16, count: u16) -> Result<Vec<u16>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reads.lock().unwrap().push((address, count));
        if self.fail.load(Ordering::SeqCst) {
            return Err(EnovatesError::modbus("connection reset by peer"));
        }
        let count = if self.short_reads.load(Ordering::SeqCst) {
            count.saturating_sub(1)
        } else {
            count
        };
        let regs = self.registers.lock().unwrap();
        Ok((address..address + count)
            .map(|a| regs.get(&a).copied().unwrap_or(0))
            .collect())
    }

    async fn write_single_register(&self, address: u16, value: u16) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(EnovatesError::timeout("Write operation timeout"));
        }
        self.writes.lock().unwrap().push((address, value));
        self.registers.lock().unwrap().insert(address, value);
        Ok(())
    }
}
