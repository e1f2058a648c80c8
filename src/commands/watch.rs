//! Watch command handler.
//!
//! Polls the feed until Ctrl-C, printing the status line and posting
//! notifications. The settings file is watched for changes while running.

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;

use super::{load_config, Overrides};
use crate::core::glucose::{
    DisplaySink, DisplayState, MonitorPipeline, NightscoutClient, NotificationManager,
    PollScheduler,
};
use crate::core::{Config, SettingsStore, SharedConfig};
use crate::platform::default_sink;
use crate::ui::{config_problems, PrintMode, TerminalStatus};

const SETTINGS_CHECK_INTERVAL: Duration = Duration::from_secs(5);

/// Execute the watch command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let (path, config, overrides) = load_config(matches)?;

    let problems = config.validate();
    if !problems.is_empty() {
        config_problems(&problems);
        bail!("cannot start monitoring");
    }

    let desktop = !matches.get_flag("no-desktop");
    let mode = if matches.get_flag("verbose") {
        PrintMode::Always
    } else {
        PrintMode::OnChange
    };

    println!(
        "{} {} {}",
        "Watching".cyan().bold(),
        config.nightscout_url.white(),
        format!("every {}s (Ctrl-C to stop)", config.alerts.poll_interval_secs).dimmed()
    );

    let store = SettingsStore::with_config(path, config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(store, overrides, desktop, mode))
}

async fn run(
    mut store: SettingsStore,
    overrides: Overrides,
    desktop: bool,
    mode: PrintMode,
) -> Result<()> {
    let shared = store.shared();

    let mut status = TerminalStatus::new(mode);
    status.show(&DisplayState::loading());

    let feed = Arc::new(NightscoutClient::new()?);
    let pipeline = Arc::new(
        MonitorPipeline::new(feed, shared.clone(), Box::new(status))
            .with_notifications(NotificationManager::new(default_sink(desktop))),
    );

    let (stop_tx, mut stop_rx) = tokio::sync::mpsc::unbounded_channel::<()>();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .context("Failed to install Ctrl-C handler")?;

    let mut scheduler = PollScheduler::new();
    let mut period = shared.read().poll_interval();
    start_polling(&mut scheduler, period, pipeline.clone())?;

    let mut settings_check = tokio::time::interval(SETTINGS_CHECK_INTERVAL);
    // The first tick completes immediately
    settings_check.tick().await;

    loop {
        tokio::select! {
            _ = stop_rx.recv() => break,
            _ = settings_check.tick() => {
                if let Some(reloaded) = store.reload_if_changed() {
                    let config = apply_reload(reloaded, &overrides, &shared);
                    let new_period = config.poll_interval();
                    if new_period != period && !new_period.is_zero() {
                        log::info!(
                            "Poll interval changed from {}s to {}s",
                            period.as_secs(),
                            new_period.as_secs()
                        );
                        start_polling(&mut scheduler, new_period, pipeline.clone())?;
                        period = new_period;
                    }
                }

                if let Some(manager) = pipeline.notifications() {
                    manager.lock().process_dismissals();
                }
            }
        }
    }

    scheduler.stop();
    println!();
    println!("{}", "Monitoring stopped.".dimmed());
    Ok(())
}

/// Publish freshly loaded settings with the command-line overrides on top
fn apply_reload(
    mut reloaded: Config,
    overrides: &Overrides,
    shared: &SharedConfig,
) -> Config {
    overrides.apply(&mut reloaded);
    *shared.write() = reloaded.clone();
    reloaded
}

fn start_polling(
    scheduler: &mut PollScheduler,
    period: Duration,
    pipeline: Arc<MonitorPipeline>,
) -> Result<()> {
    scheduler.start(period, move |ctx| {
        let pipeline = pipeline.clone();
        async move {
            pipeline.run_tick(ctx).await;
        }
    })?;
    Ok(())
}
