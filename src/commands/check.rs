//! Check command handler.
//!
//! Runs a single poll cycle and reports the decision.

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use colored::{ColoredString, Colorize};
use serde_json::json;
use std::sync::Arc;

use super::load_config;
use crate::core::glucose::{
    AlertDecision, CycleOutcome, MonitorPipeline, NightscoutClient, NotificationManager,
};
use crate::platform::default_sink;
use crate::ui::{config_problems, paint, PrintMode, TerminalStatus};

/// Execute the check command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let (_, config, _) = load_config(matches)?;

    let problems = config.validate();
    if !problems.is_empty() {
        config_problems(&problems);
        bail!("cannot query the feed");
    }

    let json_output = matches.get_flag("json");
    let notify = matches.get_flag("notify");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let feed = Arc::new(NightscoutClient::new()?);
    let shared = Arc::new(parking_lot::RwLock::new(config));
    let mut pipeline =
        MonitorPipeline::new(feed, shared, Box::new(TerminalStatus::new(PrintMode::Never)));
    if notify {
        pipeline = pipeline.with_notifications(NotificationManager::new(default_sink(true)));
    }

    let outcome = runtime.block_on(pipeline.run_once());

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?);
        return match outcome {
            CycleOutcome::Skipped(reason) => bail!("feed unavailable: {}", reason),
            _ => Ok(()),
        };
    }

    match outcome {
        CycleOutcome::Evaluated(decision) => print_decision(&decision),
        CycleOutcome::NoData(reason) => {
            println!("{}", paint("No data", "fresh-data"));
            println!("{}", reason.dimmed());
        }
        CycleOutcome::Skipped(reason) => bail!("feed unavailable: {}", reason),
        CycleOutcome::Inactive => {}
    }

    Ok(())
}

/// JSON view of a cycle outcome for scripting
pub fn outcome_json(outcome: &CycleOutcome) -> serde_json::Value {
    match outcome {
        CycleOutcome::Evaluated(decision) => json!({
            "status": "evaluated",
            "decision": decision,
            "notifications": decision
                .notifications()
                .iter()
                .map(|n| json!({
                    "kind": n.kind,
                    "title": n.title,
                    "description": n.description,
                }))
                .collect::<Vec<_>>(),
        }),
        CycleOutcome::NoData(reason) => json!({ "status": "no-data", "reason": reason }),
        CycleOutcome::Skipped(reason) => json!({ "status": "skipped", "reason": reason }),
        CycleOutcome::Inactive => json!({ "status": "inactive" }),
    }
}

fn row(label: &str, value: ColoredString) {
    println!("  {} {}", format!("{:<12}", label).white(), value);
}

fn print_decision(decision: &AlertDecision) {
    println!("{}", paint(&decision.display_text, &decision.style_class));
    println!();
    row("Severity:", decision.severity.label().cyan());
    row(
        "Fresh:",
        if decision.stale {
            format!("no ({}s old)", decision.elapsed_secs).yellow()
        } else {
            format!("yes ({}s old)", decision.elapsed_secs).green()
        },
    );
    row(
        "Variability:",
        decision.variability.map(|k| k.label()).unwrap_or("-").cyan(),
    );

    let notifications = decision.notifications();
    if !notifications.is_empty() {
        println!();
        println!("{}", "Alerts:".white().bold());
        for n in notifications {
            println!("  {} {}", "•".yellow(), n.title.bold());
            println!("    {}", n.description.dimmed());
        }
    }
}
