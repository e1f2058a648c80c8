//! Notification sinks for the host platform.
//!
//! On freedesktop systems notifications go through the desktop notification
//! service; everywhere else, or when asked to, they are only logged.

use crate::core::glucose::{
    DismissObserver, NotificationContent, NotificationHandle, NotificationSink,
};
use crate::error::Result;

pub const APP_NAME: &str = "glucmon";

/// Themed icon name shipped by Nightscout desktop integrations.
pub const ICON_NAME: &str = "nightscout-icon";

/// Pick the sink for this platform. `desktop = false` forces the log sink.
pub fn default_sink(desktop: bool) -> Box<dyn NotificationSink> {
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        if desktop {
            return Box::new(desktop::DesktopNotifier::new());
        }
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    {
        if desktop {
            log::info!("Desktop notifications are not supported here, logging them instead");
        }
    }

    Box::new(LogNotifier::default())
}

/// Writes notifications to the log. Never dismissed.
#[derive(Debug, Default)]
pub struct LogNotifier {
    next_id: u32,
}

impl NotificationSink for LogNotifier {
    fn source_available(&self) -> bool {
        true
    }

    fn attach_source(&mut self) -> Result<()> {
        Ok(())
    }

    fn create(
        &mut self,
        content: &NotificationContent,
        _observer: DismissObserver,
    ) -> Result<NotificationHandle> {
        self.next_id += 1;
        log::warn!("{} - {}", content.title, content.description);
        Ok(NotificationHandle(self.next_id))
    }

    fn update(&mut self, handle: NotificationHandle, content: &NotificationContent) -> Result<()> {
        log::warn!("{} - {} (#{})", content.title, content.description, handle.0);
        Ok(())
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
mod desktop {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use notify_rust::{Notification, Timeout};

    use super::{APP_NAME, ICON_NAME};
    use crate::core::glucose::{
        DismissObserver, NotificationContent, NotificationHandle, NotificationSink, Urgency,
    };
    use crate::error::{GlucmonError, Result};

    const SHOW_TIMEOUT: Duration = Duration::from_secs(5);

    /// Sink backed by the freedesktop notification service.
    pub struct DesktopNotifier {
        source_up: bool,
        icon: String,
    }

    impl DesktopNotifier {
        pub fn new() -> Self {
            Self {
                source_up: false,
                icon: ICON_NAME.to_string(),
            }
        }

        fn build(&self, content: &NotificationContent, replaces: Option<u32>) -> Notification {
            let mut notification = Notification::new();
            notification
                .appname(APP_NAME)
                .summary(&content.title)
                .body(&content.description)
                .icon(&self.icon)
                .urgency(map_urgency(content.urgency))
                .timeout(Timeout::Never);
            if let Some(id) = replaces {
                notification.id(id);
            }
            notification
        }
    }

    fn map_urgency(urgency: Urgency) -> notify_rust::Urgency {
        match urgency {
            Urgency::Normal => notify_rust::Urgency::Normal,
        }
    }

    impl NotificationSink for DesktopNotifier {
        fn source_available(&self) -> bool {
            self.source_up
        }

        fn attach_source(&mut self) -> Result<()> {
            let info = notify_rust::get_server_information()
                .map_err(|e| GlucmonError::notification_source(e.to_string()))?;
            log::debug!("Notification server: {} {}", info.name, info.version);
            self.source_up = true;
            Ok(())
        }

        fn create(
            &mut self,
            content: &NotificationContent,
            observer: DismissObserver,
        ) -> Result<NotificationHandle> {
            let notification = self.build(content, None);
            let (id_tx, id_rx) = mpsc::channel();

            // The close signal is only delivered to a thread blocked on the handle
            thread::Builder::new()
                .name(format!("notify-{}", observer.kind().label()))
                .spawn(move || match notification.show() {
                    Ok(handle) => {
                        let id = handle.id();
                        let _ = id_tx.send(Ok(id));
                        handle.on_close(move || observer.dismissed(NotificationHandle(id)));
                    }
                    Err(e) => {
                        let _ = id_tx.send(Err(e.to_string()));
                    }
                })?;

            match id_rx.recv_timeout(SHOW_TIMEOUT) {
                Ok(Ok(id)) => Ok(NotificationHandle(id)),
                Ok(Err(e)) => {
                    self.source_up = false;
                    Err(GlucmonError::notification(e))
                }
                Err(_) => {
                    self.source_up = false;
                    Err(GlucmonError::notification("notification service did not answer"))
                }
            }
        }

        fn update(&mut self, handle: NotificationHandle, content: &NotificationContent) -> Result<()> {
            self.build(content, Some(handle.0)).show().map(|_| ()).map_err(|e| {
                self.source_up = false;
                GlucmonError::notification(e.to_string())
            })
        }
    }

}
