//! One poll cycle: fetch, parse, evaluate, display and notify.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;

use super::alerts::{evaluate, AlertDecision, STYLE_FRESH};
use super::display::{DisplaySink, DisplayState};
use super::feed::FeedClient;
use super::notifications::NotificationManager;
use super::reading::parse_latest;
use super::scheduler::TickContext;
use crate::core::config::SharedConfig;

/// Result of a single cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A reading was evaluated and published.
    Evaluated(AlertDecision),
    /// The feed answered without a usable reading; "No data" was shown.
    NoData(String),
    /// Transport failure; nothing was published this cycle.
    Skipped(String),
    /// The scheduler was stopped while the request was in flight.
    Inactive,
}

pub struct MonitorPipeline {
    feed: Arc<dyn FeedClient>,
    settings: SharedConfig,
    display: Arc<Mutex<Box<dyn DisplaySink>>>,
    notifications: Option<Arc<Mutex<NotificationManager>>>,
}

impl MonitorPipeline {
    pub fn new(
        feed: Arc<dyn FeedClient>,
        settings: SharedConfig,
        display: Box<dyn DisplaySink>,
    ) -> Self {
        Self {
            feed,
            settings,
            display: Arc::new(Mutex::new(display)),
            notifications: None,
        }
    }

    pub fn with_notifications(mut self, manager: NotificationManager) -> Self {
        self.notifications = Some(Arc::new(Mutex::new(manager)));
        self
    }

    pub fn notifications(&self) -> Option<Arc<Mutex<NotificationManager>>> {
        self.notifications.clone()
    }

    pub fn current_display(&self) -> Option<DisplayState> {
        self.display.lock().current().cloned()
    }

    pub fn show(&self, state: &DisplayState) {
        self.display.lock().show(state);
    }

    /// Run a cycle on behalf of a scheduler tick.
    pub async fn run_tick(&self, ctx: TickContext) -> CycleOutcome {
        let outcome = self.run_cycle(|| ctx.is_active()).await;
        log::debug!("Cycle {} finished: {}", ctx.tick, outcome.summary());
        outcome
    }

    /// Run a single cycle outside of any schedule.
    pub async fn run_once(&self) -> CycleOutcome {
        self.run_cycle(|| true).await
    }

    async fn run_cycle<A: Fn() -> bool>(&self, still_active: A) -> CycleOutcome {
        // Each cycle works on the latest settings
        let settings = self.settings.read().clone();

        let request = match settings.feed_request() {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Skipping cycle: {}", e);
                return CycleOutcome::Skipped(e.to_string());
            }
        };

        let body = match self.feed.fetch(&request).await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Skipping cycle: {}", e);
                return CycleOutcome::Skipped(e.to_string());
            }
        };

        if !still_active() {
            return CycleOutcome::Inactive;
        }

        let reading = match parse_latest(&body) {
            Ok(reading) => reading,
            Err(e) => {
                log::info!("No usable reading: {}", e);
                let mut display = self.display.lock();
                let style = display
                    .current()
                    .map(|s| s.style_class.clone())
                    .unwrap_or_else(|| STYLE_FRESH.to_string());
                display.show(&DisplayState::no_data(&style));
                return CycleOutcome::NoData(e.to_string());
            }
        };

        let decision = evaluate(&reading, &settings.alerts, Utc::now());
        log::debug!(
            "Reading {} mg/dL ({:?}), severity {:?}, stale {}",
            reading.glucose,
            reading.direction,
            decision.severity,
            decision.stale
        );

        self.display.lock().show(&DisplayState::from(&decision));

        if let Some(manager) = &self.notifications {
            let failures = manager.lock().notify_decision(&decision);
            if failures > 0 {
                log::warn!("{} notification(s) could not be posted", failures);
            }
        }

        CycleOutcome::Evaluated(decision)
    }
}

impl CycleOutcome {
    pub fn summary(&self) -> String {
        match self {
            CycleOutcome::Evaluated(d) => format!("{} [{}]", d.display_text, d.style_class),
            CycleOutcome::NoData(reason) => format!("no data ({})", reason),
            CycleOutcome::Skipped(reason) => format!("skipped ({})", reason),
            CycleOutcome::Inactive => "discarded after stop".to_string(),
        }
    }
}
