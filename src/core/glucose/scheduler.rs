//! Fixed-interval poll scheduler.
//!
//! Ticks fire on wall-clock time and each tick's work is spawned on its own,
//! so a slow cycle never delays the next one. Restarting with a new interval
//! always cancels the previous schedule first.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::error::{GlucmonError, Result};

/// Passed to every tick.
#[derive(Debug, Clone)]
pub struct TickContext {
    pub tick: u64,
    active: Arc<AtomicBool>,
}

impl TickContext {
    /// False once the scheduler was stopped. Work finishing after that must
    /// not publish its results.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

struct Schedule {
    period: Duration,
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

pub struct PollScheduler {
    active: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    current: Option<Schedule>,
}

impl Default for PollScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl PollScheduler {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(false)),
            ticks: Arc::new(AtomicU64::new(0)),
            current: None,
        }
    }

    /// Tick once right away, then every `period`.
    ///
    /// Must be called from inside a tokio runtime. A running schedule is
    /// stopped before the new one starts.
    pub fn start<F, Fut>(&mut self, period: Duration, on_tick: F) -> Result<()>
    where
        F: Fn(TickContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if period.is_zero() {
            return Err(GlucmonError::scheduler("poll interval must be greater than zero"));
        }

        self.stop();
        self.active.store(true, Ordering::SeqCst);

        let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
        let active = self.active.clone();
        let ticks = self.ticks.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let ctx = TickContext {
                            tick: ticks.fetch_add(1, Ordering::SeqCst),
                            active: active.clone(),
                        };
                        tokio::spawn(on_tick(ctx));
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        log::debug!("Poll schedule started ({}s)", period.as_secs());
        self.current = Some(Schedule {
            period,
            shutdown_tx,
            handle,
        });
        Ok(())
    }

    /// Cancel the schedule. In-flight ticks keep running but see
    /// [`TickContext::is_active`] return false.
    pub fn stop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(schedule) = self.current.take() {
            // send() only fails when the loop already exited
            let _ = schedule.shutdown_tx.send(());
            schedule.handle.abort();
            log::debug!("Poll schedule stopped ({}s)", schedule.period.as_secs());
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.current.as_ref().map(|s| s.period)
    }

    /// Total ticks fired across every schedule of this scheduler.
    pub fn ticks_fired(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
