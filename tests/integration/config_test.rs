use std::fs;
use std::time::Duration;

use glucmon::core::glucose::{LowComparison, ThresholdAlert, VariabilityBasis};
use glucmon::core::{Config, SettingsStore};
use tempfile::TempDir;

#[test]
fn test_partial_file_fills_in_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "nightscout_url": "https://cgm.example.com",
            "alerts": {
                "high": { "value": 180, "enabled": true },
                "low_comparison": "at-or-below",
                "variability_basis": "delta"
            }
        }"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.nightscout_url, "https://cgm.example.com");
    assert_eq!(config.auth_token, None);
    assert_eq!(config.request_timeout(), Duration::from_secs(10));
    assert_eq!(config.alerts.high, ThresholdAlert::enabled(180));
    assert!(!config.alerts.urgent_high.enabled);
    assert_eq!(config.alerts.low_comparison, LowComparison::AtOrBelow);
    assert_eq!(config.alerts.variability_basis, VariabilityBasis::Delta);
    assert_eq!(config.alerts.rising_rate.value, 10);
    assert_eq!(config.alerts.falling_rate.value, -10);
    assert_eq!(config.poll_interval(), Duration::from_secs(30));
}

#[test]
fn test_reload_picks_up_external_change() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    Config::default().save_to(&path).unwrap();

    let mut store = SettingsStore::open(path.clone()).unwrap();
    assert!(store.reload_if_changed().is_none());

    let edited = Config {
        nightscout_url: "https://cgm.example.com".to_string(),
        ..Default::default()
    };
    // Make sure the modification time moves even on coarse filesystems
    std::thread::sleep(Duration::from_millis(1100));
    edited.save_to(&path).unwrap();

    let reloaded = store.reload_if_changed().unwrap();
    assert_eq!(reloaded.nightscout_url, "https://cgm.example.com");
    assert_eq!(store.snapshot(), edited);
    assert_eq!(store.shared().read().nightscout_url, "https://cgm.example.com");
}

#[test]
fn test_broken_reload_keeps_previous_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let original = Config {
        nightscout_url: "https://cgm.example.com".to_string(),
        ..Default::default()
    };
    original.save_to(&path).unwrap();

    let mut store = SettingsStore::open(path.clone()).unwrap();
    std::thread::sleep(Duration::from_millis(1100));
    fs::write(&path, "{ half written").unwrap();

    assert!(store.reload_if_changed().is_none());
    assert_eq!(store.snapshot(), original);
}

#[test]
fn test_config_file_is_pretty_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    Config::default().save_to(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n  \"nightscout_url\""));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["alerts"]["stale_after_secs"], 600);
    assert_eq!(value["alerts"]["low_comparison"], "at-or-above");
}
