//! schedcache - browse a seasonal flight timetable from the terminal.
//!
//! Periods are listed from the CMS once per run. `show` loads the chosen
//! period page by page, prints its weekly timetable, and warms the periods
//! either side of it before exiting.

mod args;
mod render;

use std::io;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::Parser;
use schedcache_core::{ApiClient, Config, FlightScope, PeriodId, ScheduleSession};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Args, Command};

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG to control the level (e.g., RUST_LOG=schedcache_core=debug).
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("Log file path has no file name: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let _log_guard = init_tracing(args.log_file.as_deref())?;
    info!("schedcache starting");

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    args.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;

    let client = ApiClient::from_config(&config).context("Failed to create API client")?;
    let mut session = ScheduleSession::open(client, &config).await;

    match args.command {
        Command::Periods => {
            render::print_periods(session.index(), Local::now().date_naive());
        }
        Command::Show { period, scope } => {
            show(&mut session, period, scope.into()).await?;
        }
    }

    info!("schedcache shutting down");
    Ok(())
}

async fn show(
    session: &mut ScheduleSession<ApiClient>,
    period: Option<String>,
    scope: FlightScope,
) -> Result<()> {
    let id = match period {
        Some(p) => PeriodId::from(p),
        None => session
            .index()
            .default_selection(Local::now().date_naive())
            .map(|p| p.id.clone())
            .ok_or_else(|| anyhow!("No flight schedules available from {}", session.source().endpoint()))?,
    };

    let schedule = session
        .select(&id)
        .await
        .with_context(|| format!("Failed to load schedule {}", id))?;

    let Some(schedule) = schedule else {
        bail!("Schedule {} not found", id);
    };

    render::print_timetable(&schedule, &scope);

    let warmed = session.settle().await;
    info!(period_id = %id, warmed, "Neighbor prefetch settled");
    render::print_neighbor_status(session.index(), session.cache(), &id);

    Ok(())
}
