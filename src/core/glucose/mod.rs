//! Glucose monitoring core.
//!
//! Turns periodic Nightscout readings into a status label plus deduplicated,
//! updateable desktop notifications.

pub mod alerts;
pub mod display;
pub mod feed;
pub mod messages;
pub mod notifications;
pub mod pipeline;
pub mod reading;
pub mod scheduler;
pub mod url_builder;

pub use alerts::{
    evaluate, AlertConfig, AlertDecision, AlertKind, LowComparison, RateAlert, ThresholdAlert,
    VariabilityBasis,
};
pub use display::{DisplaySink, DisplayState};
pub use feed::{FeedClient, FeedRequest, NightscoutClient};
pub use messages::AlertNotification;
pub use notifications::{
    DismissObserver, NotificationContent, NotificationHandle, NotificationManager,
    NotificationSink, NotificationSlot, NotifyAction, Urgency,
};
pub use pipeline::{CycleOutcome, MonitorPipeline};
pub use reading::{parse_latest, Direction, Reading};
pub use scheduler::{PollScheduler, TickContext};
pub use url_builder::UrlBuilder;
