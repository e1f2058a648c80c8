use chrono::{TimeZone, Utc};
use glucmon::core::glucose::{
    evaluate, parse_latest, AlertConfig, AlertKind, LowComparison, ThresholdAlert,
};

fn thresholds(cmp: LowComparison) -> AlertConfig {
    AlertConfig {
        urgent_low: ThresholdAlert::enabled(55),
        low: ThresholdAlert::enabled(70),
        high: ThresholdAlert::enabled(180),
        urgent_high: ThresholdAlert::enabled(250),
        low_comparison: cmp,
        ..Default::default()
    }
}

#[test]
fn test_conventional_low_side() {
    let config = thresholds(LowComparison::AtOrBelow);
    let expected = [
        (40, AlertKind::UrgentLow),
        (55, AlertKind::UrgentLow),
        (56, AlertKind::Low),
        (70, AlertKind::Low),
        (71, AlertKind::Normal),
        (111, AlertKind::Prize),
        (179, AlertKind::Normal),
        (180, AlertKind::High),
        (250, AlertKind::UrgentHigh),
    ];
    for (glucose, kind) in expected {
        assert_eq!(
            glucmon::core::glucose::alerts::classify_severity(glucose, &config),
            kind,
            "glucose {}",
            glucose
        );
    }
}

#[test]
fn test_decision_is_stable_for_same_input() {
    let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let body = r#"[{"sgv": 187.6, "direction": "FortyFiveUp", "delta": 3.4, "date": 1699999700000}]"#;
    let reading = parse_latest(body).unwrap();
    let config = thresholds(LowComparison::AtOrBelow);

    let first = evaluate(&reading, &config, now);
    let second = evaluate(&reading, &config, now);
    assert_eq!(first, second);
    assert_eq!(first.display_text, "188 ↗");
    assert_eq!(first.severity, AlertKind::High);
    assert_eq!(first.delta, 3);
    assert_eq!(first.elapsed_secs, 300);
    assert!(!first.stale);
}

#[test]
fn test_every_decision_has_exactly_one_severity() {
    let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let body = |sgv: i64| {
        format!(r#"[{{"sgv": {}, "direction": "Flat", "delta": 0, "date": 1700000000000}}]"#, sgv)
    };
    for cmp in [LowComparison::AtOrAbove, LowComparison::AtOrBelow] {
        let config = thresholds(cmp);
        for sgv in (20..=400).step_by(7) {
            let decision = evaluate(&parse_latest(&body(sgv)).unwrap(), &config, now);
            assert!(decision.severity.is_severity());
            let severity_notes = decision
                .notifications()
                .iter()
                .filter(|n| n.kind.is_severity())
                .count();
            assert!(severity_notes <= 1);
        }
    }
}
