//! Periodic status poll keeping the charger session alive
//!
//! The charger drops into a safe state when it sees no Modbus traffic for a
//! while. The task reads the mode 3 register on every tick and discards the
//! outcome; a failed poll is simply tried again on the next tick.

use crate::error::{EnovatesError, Result};
use crate::logging::get_logger;
use crate::modbus::Transport;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};

/// Handle to a running keep-alive task
pub struct KeepAlive {
    stop_tx: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl KeepAlive {
    /// Spawn the poller on the current Tokio runtime; the first poll happens
    /// one `period` from now
    pub fn spawn(transport: Arc<dyn Transport>, period: Duration) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| EnovatesError::config("driver requires a Tokio runtime"))?;
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let logger = get_logger("keepalive");

        let handle = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match super::read_status(transport.as_ref()).await {
                            Ok(status) => logger.trace(&format!("Keep-alive status {}", status)),
                            Err(e) => logger.debug(&format!("Keep-alive poll failed: {}", e)),
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            logger.debug("Keep-alive task stopped");
        });

        Ok(Self {
            stop_tx,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Signal the task to stop without waiting for it
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Signal the task to stop and wait until it has exited
    pub async fn shutdown(&self) {
        self.stop();
        let handle = self.handle.lock().ok().and_then(|mut h| h.take());
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Whether the task is still running
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .ok()
            .and_then(|h| h.as_ref().map(|j| !j.is_finished()))
            .unwrap_or(false)
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.stop();
    }
}
