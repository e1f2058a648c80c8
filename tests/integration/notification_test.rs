use chrono::{TimeZone, Utc};
use glucmon::core::glucose::{
    evaluate, AlertConfig, AlertKind, Direction, NotificationManager, NotifyAction, Reading,
    ThresholdAlert, Urgency,
};

use super::helpers::RecordingSink;

fn decision_for(glucose: i64, delta: i64, age_secs: i64, config: &AlertConfig) -> glucmon::AlertDecision {
    let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let reading = Reading {
        glucose,
        direction: Direction::Flat,
        delta,
        timestamp_ms: now.timestamp_millis() - age_secs * 1000,
    };
    evaluate(&reading, config, now)
}

fn high_config() -> AlertConfig {
    AlertConfig {
        high: ThresholdAlert::enabled(180),
        ..Default::default()
    }
}

#[test]
fn test_sustained_high_updates_single_notification() {
    let (sink, recorded) = RecordingSink::new();
    let mut manager = NotificationManager::new(Box::new(sink));
    let config = high_config();

    for glucose in [200, 210, 220] {
        let decision = decision_for(glucose, 0, 10, &config);
        assert_eq!(manager.notify_decision(&decision), 0);
    }

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.created.len(), 1);
    assert_eq!(recorded.updated.len(), 2);
    assert!(recorded.updated[1].1.description.contains("220"));
    assert_eq!(recorded.updated[1].1.urgency, Urgency::Normal);
    assert_eq!(manager.live_count(), 1);
}

#[test]
fn test_dismissed_notification_is_recreated() {
    let (sink, recorded) = RecordingSink::new();
    let mut manager = NotificationManager::new(Box::new(sink));

    let first = manager.notify(AlertKind::High, "high", "200").unwrap();
    let NotifyAction::Created(handle) = first else {
        panic!("expected a new notification, got {:?}", first);
    };

    recorded.lock().unwrap().dismiss(handle);
    assert_eq!(manager.process_dismissals(), 1);
    assert!(manager.slot(AlertKind::High).is_none());

    let second = manager.notify(AlertKind::High, "high", "205").unwrap();
    assert!(matches!(second, NotifyAction::Created(h) if h != handle));
    assert_eq!(recorded.lock().unwrap().created.len(), 2);
}

#[test]
fn test_dismissal_of_replaced_notification_is_ignored() {
    let (mut sink, recorded) = RecordingSink::new();
    sink.fail_updates = true;
    let mut manager = NotificationManager::new(Box::new(sink));

    let NotifyAction::Created(old) = manager.notify(AlertKind::Stale, "stale", "600").unwrap() else {
        panic!("expected a new notification");
    };
    // Update fails so the slot moves to a fresh notification
    let replaced = manager.notify(AlertKind::Stale, "stale", "630").unwrap();
    let NotifyAction::Created(new) = replaced else {
        panic!("expected a replacement, got {:?}", replaced);
    };
    assert_ne!(old, new);

    recorded.lock().unwrap().dismiss(old);
    assert_eq!(manager.process_dismissals(), 0);
    assert_eq!(
        manager.slot(AlertKind::Stale).and_then(|s| s.live_handle),
        Some(new)
    );
}

#[test]
fn test_each_kind_has_its_own_slot() {
    let (sink, recorded) = RecordingSink::new();
    let mut manager = NotificationManager::new(Box::new(sink));
    let config = AlertConfig {
        variability_enabled: true,
        variability_basis: glucmon::core::glucose::VariabilityBasis::Delta,
        ..high_config()
    };

    // High, stale and rising fast all at once
    let decision = decision_for(250, 15, 900, &config);
    assert_eq!(manager.notify_decision(&decision), 0);

    let recorded = recorded.lock().unwrap();
    let titles: Vec<&str> = recorded.created.iter().map(|(_, c)| c.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Your blood glucose is high!",
            "You have missing readings!",
            "Your blood glucose is raising up fastly!",
        ]
    );
    assert_eq!(manager.live_count(), 3);
}

#[test]
fn test_normal_reading_posts_nothing() {
    let (sink, recorded) = RecordingSink::new();
    let mut manager = NotificationManager::new(Box::new(sink));

    let decision = decision_for(120, 0, 10, &high_config());
    assert_eq!(decision.severity, AlertKind::Normal);
    assert_eq!(manager.notify_decision(&decision), 0);
    assert!(recorded.lock().unwrap().created.is_empty());
}

#[test]
fn test_prize_notification() {
    let (sink, recorded) = RecordingSink::new();
    let mut manager = NotificationManager::new(Box::new(sink));

    let decision = decision_for(111, 0, 10, &AlertConfig::default());
    assert_eq!(decision.severity, AlertKind::Prize);
    manager.notify_decision(&decision);

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.created.len(), 1);
    assert_eq!(recorded.created[0].1.title, "Prize! You got 111!");
}
