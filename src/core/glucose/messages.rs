//! Notification texts for each alert kind.

use super::alerts::{AlertDecision, AlertKind};

struct Template {
    title: &'static str,
    description: &'static str,
}

fn template(kind: AlertKind) -> Option<Template> {
    let t = match kind {
        AlertKind::Prize => Template {
            title: "Prize! You got {glucose}!",
            description: "Your glucose is now {glucose} mg/dl, congratulations!",
        },
        AlertKind::High => Template {
            title: "Your blood glucose is high!",
            description: "Your glucose is now {glucose} mg/dl.",
        },
        AlertKind::UrgentHigh => Template {
            title: "Your blood glucose is too high!",
            description: "Your glucose is now {glucose} mg/dl.",
        },
        AlertKind::Low => Template {
            title: "Your blood glucose is low!",
            description: "Your glucose is now {glucose} mg/dl.",
        },
        AlertKind::UrgentLow => Template {
            title: "Your blood glucose is too low!",
            description: "Your glucose is now {glucose} mg/dl.",
        },
        AlertKind::Stale => Template {
            title: "You have missing readings!",
            description: "There is no new readings since {elapsed} seconds ago.",
        },
        AlertKind::FallingFast => Template {
            title: "Your blood glucose is falling down fastly!",
            description: "Your glucose is falling down at ↓{delta} mg/dl since last reading.",
        },
        AlertKind::RisingFast => Template {
            title: "Your blood glucose is raising up fastly!",
            description: "Your glucose is raising up at ↑{delta} mg/dl since last reading.",
        },
        AlertKind::Normal => return None,
    };
    Some(t)
}

/// A rendered notification, ready to hand to the notification manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertNotification {
    pub kind: AlertKind,
    pub title: String,
    pub description: String,
}

/// Render the notification for `kind` from the values in `decision`.
/// `Normal` has no notification.
pub fn render(kind: AlertKind, decision: &AlertDecision) -> Option<AlertNotification> {
    let template = template(kind)?;
    let fill = |text: &str| {
        text.replace("{glucose}", &decision.glucose.to_string())
            .replace("{elapsed}", &decision.elapsed_secs.to_string())
            .replace("{delta}", &decision.delta.unsigned_abs().to_string())
    };

    Some(AlertNotification {
        kind,
        title: fill(template.title),
        description: fill(template.description),
    })
}

impl AlertDecision {
    /// Notifications implied by this decision: severity, staleness, variability.
    pub fn notifications(&self) -> Vec<AlertNotification> {
        let stale = self.stale.then_some(AlertKind::Stale);

        [Some(self.severity), stale, self.variability]
            .into_iter()
            .flatten()
            .filter_map(|kind| render(kind, self))
            .collect()
    }
}
