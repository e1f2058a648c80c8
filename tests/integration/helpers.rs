// Shared test doubles

use std::sync::{Arc, Mutex};

use chrono::Utc;
use glucmon::core::glucose::{
    DismissObserver, NotificationContent, NotificationHandle, NotificationSink,
};
use glucmon::error::{GlucmonError, Result};

#[derive(Default)]
pub struct Recorded {
    pub created: Vec<(NotificationHandle, NotificationContent)>,
    pub updated: Vec<(NotificationHandle, NotificationContent)>,
    pub observers: Vec<(NotificationHandle, DismissObserver)>,
}

impl Recorded {
    /// Close a notification the way the desktop service would.
    pub fn dismiss(&mut self, handle: NotificationHandle) {
        if let Some(pos) = self.observers.iter().position(|(h, _)| *h == handle) {
            let (h, observer) = self.observers.remove(pos);
            observer.dismissed(h);
        }
    }
}

/// Notification sink that records every call.
pub struct RecordingSink {
    recorded: Arc<Mutex<Recorded>>,
    next_id: u32,
    pub fail_updates: bool,
}

impl RecordingSink {
    pub fn new() -> (Self, Arc<Mutex<Recorded>>) {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let sink = Self {
            recorded: recorded.clone(),
            next_id: 100,
            fail_updates: false,
        };
        (sink, recorded)
    }
}

impl NotificationSink for RecordingSink {
    fn source_available(&self) -> bool {
        true
    }

    fn attach_source(&mut self) -> Result<()> {
        Ok(())
    }

    fn create(
        &mut self,
        content: &NotificationContent,
        observer: DismissObserver,
    ) -> Result<NotificationHandle> {
        let handle = NotificationHandle(self.next_id);
        self.next_id += 1;
        let mut recorded = self.recorded.lock().unwrap();
        recorded.created.push((handle, content.clone()));
        recorded.observers.push((handle, observer));
        Ok(handle)
    }

    fn update(&mut self, handle: NotificationHandle, content: &NotificationContent) -> Result<()> {
        if self.fail_updates {
            return Err(GlucmonError::notification("notification no longer exists"));
        }
        self.recorded
            .lock()
            .unwrap()
            .updated
            .push((handle, content.clone()));
        Ok(())
    }
}

/// Feed body with a single entry taken `age_secs` ago.
pub fn feed_body(sgv: i64, direction: &str, delta: i64, age_secs: i64) -> String {
    let date = Utc::now().timestamp_millis() - age_secs * 1000;
    serde_json::json!([
        { "sgv": sgv, "direction": direction, "delta": delta, "date": date, "type": "sgv" }
    ])
    .to_string()
}
