//! Alert evaluation for glucose readings.
//!
//! Classifies a reading along three independent axes: freshness, severity and
//! variability. Evaluation is pure; the caller passes the latest settings
//! snapshot and the current time on every cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reading::Reading;

/// Glucose value that triggers the prize notification.
pub const PRIZE_GLUCOSE: i64 = 111;

pub const STYLE_FRESH: &str = "fresh-data";
pub const STYLE_EXPIRED: &str = "expired-data";

/// Every alert the monitor can raise. Each kind owns one notification slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    Prize,
    High,
    UrgentHigh,
    Low,
    UrgentLow,
    Stale,
    RisingFast,
    FallingFast,
    Normal,
}

impl AlertKind {
    pub fn is_severity(&self) -> bool {
        matches!(
            self,
            AlertKind::Prize
                | AlertKind::High
                | AlertKind::UrgentHigh
                | AlertKind::Low
                | AlertKind::UrgentLow
                | AlertKind::Normal
        )
    }

    /// Style class a severity imposes on the status label, if any.
    pub fn style_class(&self) -> Option<&'static str> {
        match self {
            AlertKind::UrgentHigh => Some("urgent-high-glucose"),
            AlertKind::High => Some("high-glucose"),
            AlertKind::Low => Some("low-glucose"),
            AlertKind::UrgentLow => Some("urgent-low-glucose"),
            AlertKind::Prize => Some(STYLE_FRESH),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlertKind::Prize => "prize",
            AlertKind::High => "high",
            AlertKind::UrgentHigh => "urgent-high",
            AlertKind::Low => "low",
            AlertKind::UrgentLow => "urgent-low",
            AlertKind::Stale => "stale",
            AlertKind::RisingFast => "rising-fast",
            AlertKind::FallingFast => "falling-fast",
            AlertKind::Normal => "normal",
        }
    }
}

/// A glucose threshold that can be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdAlert {
    pub value: i64,
    pub enabled: bool,
}

impl ThresholdAlert {
    pub fn disabled(value: i64) -> Self {
        Self { value, enabled: false }
    }

    pub fn enabled(value: i64) -> Self {
        Self { value, enabled: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateAlert {
    pub value: i64,
}

/// How the low-side thresholds compare against the reading.
///
/// `AtOrAbove` fires when glucose >= threshold, which is how the low rules
/// have always behaved. `AtOrBelow` is the conventional reading of a low alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LowComparison {
    #[default]
    AtOrAbove,
    AtOrBelow,
}

impl LowComparison {
    fn matches(&self, glucose: i64, threshold: i64) -> bool {
        match self {
            LowComparison::AtOrAbove => glucose >= threshold,
            LowComparison::AtOrBelow => glucose <= threshold,
        }
    }
}

/// Which value the rising/falling thresholds are compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariabilityBasis {
    #[default]
    Glucose,
    Delta,
}

/// Alert configuration with thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub urgent_low: ThresholdAlert,
    pub low: ThresholdAlert,
    pub high: ThresholdAlert,
    pub urgent_high: ThresholdAlert,
    pub rising_rate: RateAlert,
    pub falling_rate: RateAlert,
    pub variability_enabled: bool,
    pub stale_after_secs: u64,
    pub poll_interval_secs: u64,
    pub low_comparison: LowComparison,
    pub variability_basis: VariabilityBasis,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            urgent_low: ThresholdAlert::disabled(0),
            low: ThresholdAlert::disabled(0),
            high: ThresholdAlert::disabled(0),
            urgent_high: ThresholdAlert::disabled(0),
            rising_rate: RateAlert { value: 10 },
            falling_rate: RateAlert { value: -10 },
            variability_enabled: false,
            stale_after_secs: 600,
            poll_interval_secs: 30,
            low_comparison: LowComparison::default(),
            variability_basis: VariabilityBasis::default(),
        }
    }
}

/// Outcome of evaluating one reading. Replaced every cycle, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertDecision {
    pub severity: AlertKind,
    pub stale: bool,
    pub variability: Option<AlertKind>,
    pub display_text: String,
    pub style_class: String,
    pub glucose: i64,
    pub delta: i64,
    pub elapsed_secs: i64,
}

/// Evaluate a reading against the alert configuration.
pub fn evaluate(reading: &Reading, config: &AlertConfig, now: DateTime<Utc>) -> AlertDecision {
    let elapsed_secs = now
        .timestamp_millis()
        .saturating_sub(reading.timestamp_ms)
        .div_euclid(1000);
    let stale_after = i64::try_from(config.stale_after_secs).unwrap_or(i64::MAX);
    let stale = elapsed_secs >= stale_after;

    let severity = classify_severity(reading.glucose, config);
    let variability = classify_variability(reading, config);

    // Staleness sets the base class; any non-normal severity overrides it.
    let base_style = if stale { STYLE_EXPIRED } else { STYLE_FRESH };
    let style_class = severity.style_class().unwrap_or(base_style);

    AlertDecision {
        severity,
        stale,
        variability,
        display_text: format!("{} {}", reading.glucose, reading.direction.glyph()),
        style_class: style_class.to_string(),
        glucose: reading.glucose,
        delta: reading.delta,
        elapsed_secs,
    }
}

/// First enabled rule wins: urgent high, high, low side, then the prize.
pub fn classify_severity(glucose: i64, config: &AlertConfig) -> AlertKind {
    if config.urgent_high.enabled && glucose >= config.urgent_high.value {
        return AlertKind::UrgentHigh;
    }
    if config.high.enabled && glucose >= config.high.value {
        return AlertKind::High;
    }

    let cmp = config.low_comparison;
    let low = (AlertKind::Low, config.low);
    let urgent_low = (AlertKind::UrgentLow, config.urgent_low);
    let low_side = match cmp {
        LowComparison::AtOrAbove => [low, urgent_low],
        LowComparison::AtOrBelow => [urgent_low, low],
    };
    for (kind, threshold) in low_side {
        if threshold.enabled && cmp.matches(glucose, threshold.value) {
            return kind;
        }
    }

    if glucose == PRIZE_GLUCOSE {
        AlertKind::Prize
    } else {
        AlertKind::Normal
    }
}

pub fn classify_variability(reading: &Reading, config: &AlertConfig) -> Option<AlertKind> {
    if !config.variability_enabled {
        return None;
    }

    let value = match config.variability_basis {
        VariabilityBasis::Glucose => reading.glucose,
        VariabilityBasis::Delta => reading.delta,
    };

    if value >= config.rising_rate.value {
        Some(AlertKind::RisingFast)
    } else if value <= config.falling_rate.value {
        Some(AlertKind::FallingFast)
    } else {
        None
    }
}
