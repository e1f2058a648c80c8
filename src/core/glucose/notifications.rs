//! Notification lifecycle: one slot per alert kind.
//!
//! A sustained condition keeps updating the same notification instead of
//! stacking new popups. Once the user dismisses a notification its slot is
//! emptied and the next activation of that kind creates a fresh one.

use std::collections::HashMap;
use std::sync::mpsc;

use serde::Serialize;

use super::alerts::{AlertDecision, AlertKind};
use crate::error::{GlucmonError, Result};

/// Urgency attached to a notification. Every alert kind posts at normal
/// urgency and updates re-assert it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Urgency {
    Normal,
}

/// Opaque reference to a notification owned by the notification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NotificationHandle(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub description: String,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dismissal {
    pub kind: AlertKind,
    pub handle: NotificationHandle,
}

/// Callback given to the sink for every created notification.
///
/// The sink calls [`DismissObserver::dismissed`] once the notification is
/// closed by the user or by the notification service.
#[derive(Debug, Clone)]
pub struct DismissObserver {
    kind: AlertKind,
    tx: mpsc::Sender<Dismissal>,
}

impl DismissObserver {
    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    pub fn dismissed(&self, handle: NotificationHandle) {
        // The manager may already be gone during shutdown
        let _ = self.tx.send(Dismissal {
            kind: self.kind,
            handle,
        });
    }
}

/// Desktop notification service as seen by the manager.
pub trait NotificationSink: Send {
    /// Whether the notification source is still attached.
    fn source_available(&self) -> bool;

    /// (Re)attach the notification source. Calling it while attached is a no-op.
    fn attach_source(&mut self) -> Result<()>;

    fn create(
        &mut self,
        content: &NotificationContent,
        observer: DismissObserver,
    ) -> Result<NotificationHandle>;

    /// Replace title and description of a live notification and reassert its urgency.
    fn update(&mut self, handle: NotificationHandle, content: &NotificationContent) -> Result<()>;
}

/// Per-kind notification state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationSlot {
    pub last_title: Option<String>,
    pub last_description: Option<String>,
    pub live_handle: Option<NotificationHandle>,
}

/// What `notify` did with the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyAction {
    Created(NotificationHandle),
    Updated(NotificationHandle),
}

pub struct NotificationManager {
    sink: Box<dyn NotificationSink>,
    slots: HashMap<AlertKind, NotificationSlot>,
    dismissals_tx: mpsc::Sender<Dismissal>,
    dismissals_rx: mpsc::Receiver<Dismissal>,
}

impl NotificationManager {
    pub fn new(sink: Box<dyn NotificationSink>) -> Self {
        let (dismissals_tx, dismissals_rx) = mpsc::channel();
        Self {
            sink,
            slots: HashMap::new(),
            dismissals_tx,
            dismissals_rx,
        }
    }

    pub fn slot(&self, kind: AlertKind) -> Option<&NotificationSlot> {
        self.slots.get(&kind)
    }

    pub fn live_count(&self) -> usize {
        self.slots.values().filter(|s| s.live_handle.is_some()).count()
    }

    /// Apply pending dismissals. Returns how many slots were reset.
    pub fn process_dismissals(&mut self) -> usize {
        let mut reset = 0;
        while let Ok(dismissal) = self.dismissals_rx.try_recv() {
            let current = self
                .slots
                .get(&dismissal.kind)
                .and_then(|slot| slot.live_handle);

            // Ignore events for notifications that were already replaced
            if current == Some(dismissal.handle) {
                log::debug!(
                    "Notification {:?} for {} dismissed",
                    dismissal.handle,
                    dismissal.kind.label()
                );
                self.slots.remove(&dismissal.kind);
                reset += 1;
            }
        }
        reset
    }

    /// Show `title`/`description` for `kind`, updating the live notification
    /// of that kind when there is one.
    pub fn notify(&mut self, kind: AlertKind, title: &str, description: &str) -> Result<NotifyAction> {
        self.process_dismissals();

        if !self.sink.source_available() {
            log::info!("Notification source missing, re-attaching");
            self.sink
                .attach_source()
                .map_err(|e| GlucmonError::notification_source(e.to_string()))?;
        }

        let content = NotificationContent {
            title: title.to_string(),
            description: description.to_string(),
            urgency: Urgency::Normal,
        };

        let live = self.slots.get(&kind).and_then(|slot| slot.live_handle);
        let action = match live {
            Some(handle) => match self.sink.update(handle, &content) {
                Ok(()) => NotifyAction::Updated(handle),
                Err(e) => {
                    log::warn!(
                        "Could not update {} notification ({}), creating a new one",
                        kind.label(),
                        e
                    );
                    self.slots.remove(&kind);
                    NotifyAction::Created(self.create(kind, &content)?)
                }
            },
            None => NotifyAction::Created(self.create(kind, &content)?),
        };

        let slot = self.slots.entry(kind).or_default();
        slot.last_title = Some(content.title);
        slot.last_description = Some(content.description);

        Ok(action)
    }

    /// Post every notification implied by a decision. Returns the number of failures.
    pub fn notify_decision(&mut self, decision: &AlertDecision) -> usize {
        let mut failures = 0;
        for notification in decision.notifications() {
            if let Err(e) = self.notify(notification.kind, &notification.title, &notification.description) {
                log::warn!("Failed to post {} notification: {}", notification.kind.label(), e);
                failures += 1;
            }
        }
        failures
    }

    fn create(&mut self, kind: AlertKind, content: &NotificationContent) -> Result<NotificationHandle> {
        let observer = DismissObserver {
            kind,
            tx: self.dismissals_tx.clone(),
        };
        let handle = self.sink.create(content, observer)?;
        self.slots.entry(kind).or_default().live_handle = Some(handle);
        Ok(handle)
    }
}
