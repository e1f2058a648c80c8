use crate::core::glucose::{LowComparison, ThresholdAlert, VariabilityBasis};
use crate::core::{Config, SettingsStore};
use crate::ui::{confirm, dimmed, success};
use anyhow::{anyhow, bail, Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use super::config_path;

/// Thresholds that can be switched on and off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Toggle {
    UrgentLow,
    Low,
    High,
    UrgentHigh,
    Variability,
}

impl Toggle {
    fn parse(name: &str) -> Result<Self> {
        match name {
            "urgent-low" => Ok(Toggle::UrgentLow),
            "low" => Ok(Toggle::Low),
            "high" => Ok(Toggle::High),
            "urgent-high" => Ok(Toggle::UrgentHigh),
            "variability" => Ok(Toggle::Variability),
            other => bail!(
                "Unknown alert '{}' (expected urgent-low, low, high, urgent-high or variability)",
                other
            ),
        }
    }

    fn set(&self, config: &mut Config, enabled: bool) {
        let alerts = &mut config.alerts;
        match self {
            Toggle::UrgentLow => alerts.urgent_low.enabled = enabled,
            Toggle::Low => alerts.low.enabled = enabled,
            Toggle::High => alerts.high.enabled = enabled,
            Toggle::UrgentHigh => alerts.urgent_high.enabled = enabled,
            Toggle::Variability => alerts.variability_enabled = enabled,
        }
    }
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(matches),
        Some(("path", _)) => {
            println!("{}", config_path(matches)?.display());
            Ok(())
        }
        Some(("set", sub_matches)) => set(matches, sub_matches),
        Some(("enable", sub_matches)) => toggle(matches, sub_matches, true),
        Some(("disable", sub_matches)) => toggle(matches, sub_matches, false),
        Some(("reset", sub_matches)) => reset(matches, sub_matches),
        _ => {
            println!("Use 'glucmon config --help' for more information.");
            Ok(())
        }
    }
}

fn open_store(matches: &ArgMatches) -> Result<SettingsStore> {
    SettingsStore::open(config_path(matches)?)
}

fn show(matches: &ArgMatches) -> Result<()> {
    let path = config_path(matches)?;
    let config = Config::load_from(&path)?;
    let alerts = &config.alerts;

    println!("{} {}", "Settings file:".white(), path.display().to_string().cyan());
    println!();

    let url = if config.nightscout_url.is_empty() {
        "(not set)".yellow()
    } else {
        config.nightscout_url.cyan()
    };
    println!("  {:<22} {}", "Nightscout URL", url);
    println!(
        "  {:<22} {}",
        "Auth token",
        if config.auth_token.is_some() { "set".green() } else { "-".dimmed() }
    );
    println!("  {:<22} {}s", "Poll interval", alerts.poll_interval_secs);
    println!("  {:<22} {}s", "Stale after", alerts.stale_after_secs);
    println!("  {:<22} {}s", "Request timeout", config.request_timeout_secs);
    println!();

    print_threshold("Urgent high", &alerts.urgent_high);
    print_threshold("High", &alerts.high);
    print_threshold("Low", &alerts.low);
    print_threshold("Urgent low", &alerts.urgent_low);
    println!(
        "  {:<22} {}",
        "Low comparison",
        match alerts.low_comparison {
            LowComparison::AtOrAbove => "at-or-above",
            LowComparison::AtOrBelow => "at-or-below",
        }
    );
    println!();

    println!(
        "  {:<22} {} (rising >= {}, falling <= {}, on {})",
        "Variability",
        state_label(alerts.variability_enabled),
        alerts.rising_rate.value,
        alerts.falling_rate.value,
        match alerts.variability_basis {
            VariabilityBasis::Glucose => "glucose",
            VariabilityBasis::Delta => "delta",
        }
    );

    let problems = config.validate();
    if !problems.is_empty() {
        println!();
        for problem in problems {
            println!("{}", format!("⚠️  {}", problem).yellow());
        }
    }

    Ok(())
}

fn print_threshold(name: &str, threshold: &ThresholdAlert) {
    println!(
        "  {:<22} {:>4} mg/dl  {}",
        name,
        threshold.value,
        state_label(threshold.enabled)
    );
}

fn state_label(enabled: bool) -> colored::ColoredString {
    if enabled {
        "enabled".green()
    } else {
        "disabled".dimmed()
    }
}

fn set(matches: &ArgMatches, sub_matches: &ArgMatches) -> Result<()> {
    let key = sub_matches
        .get_one::<String>("key")
        .context("Key argument is required")?;
    let value = sub_matches
        .get_one::<String>("value")
        .context("Value argument is required")?;

    // Validate before touching the file
    let mut probe = Config::default();
    apply_setting(&mut probe, key, value)?;

    let mut store = open_store(matches)?;
    store.update(|config| {
        // Already validated above
        let _ = apply_setting(config, key, value);
    })?;

    success(&format!("✓ {} set to {}", key, value));
    Ok(())
}

/// Apply `key = value` to a config
pub fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let alerts = &mut config.alerts;
    match key {
        "url" => config.nightscout_url = value.trim().to_string(),
        "token" => {
            config.auth_token = match value.trim() {
                "" | "-" => None,
                token => Some(token.to_string()),
            }
        }
        "timeout" => config.request_timeout_secs = parse_secs(key, value)?,
        "interval" => alerts.poll_interval_secs = parse_secs(key, value)?,
        "stale-after" => alerts.stale_after_secs = parse_secs(key, value)?,
        "urgent-low" => alerts.urgent_low.value = parse_int(key, value)?,
        "low" => alerts.low.value = parse_int(key, value)?,
        "high" => alerts.high.value = parse_int(key, value)?,
        "urgent-high" => alerts.urgent_high.value = parse_int(key, value)?,
        "rising" => alerts.rising_rate.value = parse_int(key, value)?,
        "falling" => alerts.falling_rate.value = parse_int(key, value)?,
        "low-comparison" => {
            alerts.low_comparison = match value {
                "at-or-above" => LowComparison::AtOrAbove,
                "at-or-below" => LowComparison::AtOrBelow,
                _ => bail!("low-comparison must be 'at-or-above' or 'at-or-below'"),
            }
        }
        "variability-basis" => {
            alerts.variability_basis = match value {
                "glucose" => VariabilityBasis::Glucose,
                "delta" => VariabilityBasis::Delta,
                _ => bail!("variability-basis must be 'glucose' or 'delta'"),
            }
        }
        other => bail!("Unknown setting '{}'", other),
    }
    Ok(())
}

fn parse_int(key: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| anyhow!("{} expects a whole number, got '{}'", key, value))
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    let secs = value
        .trim()
        .parse::<u64>()
        .map_err(|_| anyhow!("{} expects a number of seconds, got '{}'", key, value))?;
    if secs == 0 {
        bail!("{} must be at least 1 second", key);
    }
    Ok(secs)
}

fn toggle(matches: &ArgMatches, sub_matches: &ArgMatches, enabled: bool) -> Result<()> {
    let name = sub_matches
        .get_one::<String>("alert")
        .context("Alert argument is required")?;
    let target = Toggle::parse(name)?;

    let mut store = open_store(matches)?;
    store.update(|config| target.set(config, enabled))?;

    success(&format!(
        "✓ {} alert {}",
        name,
        if enabled { "enabled" } else { "disabled" }
    ));
    Ok(())
}

fn reset(matches: &ArgMatches, sub_matches: &ArgMatches) -> Result<()> {
    if !sub_matches.get_flag("yes") && !confirm("Reset all settings to defaults? [y/N]")? {
        dimmed("Cancelled.");
        return Ok(());
    }

    let mut store = open_store(matches)?;
    store.update(|config| *config = Config::default())?;
    success("✓ Settings reset to defaults");
    Ok(())
}
