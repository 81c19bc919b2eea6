//! locreg CLI
//!
//! Drives the bulk-registration workflow against the configured desktop
//! application. Interrupt with Ctrl+C (or the backend's cancel key) for a
//! graceful drain; the checkpoint file makes an interrupted run resumable.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use locreg::{
    spawn_cancel_key_observer, spawn_ctrl_c_handler, AssumeSuccess, Config, InputDriver,
    RunCoordinator, UiActuator,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

mod dry_run;

use dry_run::DryRunDriver;

#[derive(Parser, Debug)]
#[command(
    name = "locreg",
    about = "Bulk-register warehouse location codes through a driven desktop UI"
)]
struct Args {
    /// Path to a JSON config file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds to wait before driving input, giving time to focus the
    /// target window
    #[arg(long, default_value_t = 5)]
    arm_delay: u64,

    /// Log planned actions without touching any UI
    #[arg(long)]
    dry_run: bool,
}

fn init_logging() -> Result<()> {
    let log_level = std::env::var("LOG_LEVEL")
        .map(|level| match level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            _ => Level::INFO,
        })
        .unwrap_or(Level::INFO);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging()?;

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };

    if !args.dry_run {
        bail!(
            "no platform input driver is compiled into this build; \
             run with --dry-run, or wire an InputDriver backend"
        );
    }
    let driver: Arc<dyn InputDriver> = Arc::new(DryRunDriver::new(config.window_title.clone()));

    let cancel = CancellationToken::new();
    let _interrupt = spawn_ctrl_c_handler(cancel.clone());
    let _observer =
        spawn_cancel_key_observer(driver.clone(), cancel.clone(), Duration::from_millis(50));

    info!(
        "starting in {}s; bring the '{}' window to the foreground now (Ctrl+C cancels)",
        args.arm_delay, config.window_title
    );
    tokio::time::sleep(Duration::from_secs(args.arm_delay)).await;

    let actuator = UiActuator::new(
        driver,
        config.clone(),
        Arc::new(AssumeSuccess),
        cancel.clone(),
    );
    let coordinator = RunCoordinator::new(config, cancel);
    let report = coordinator.run(&actuator).await?;

    info!(
        "run {:?}: {} planned, {} registered, {} already present, {} unconfirmable",
        report.state,
        report.planned,
        report.registered,
        report.already_registered,
        report.exhausted
    );
    Ok(())
}
