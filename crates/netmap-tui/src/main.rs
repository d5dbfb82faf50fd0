//! `netmap-tui`: live terminal dashboard for a discovered network.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `netmap-core`'s [`EntityStream`](netmap_core::EntityStream). Screen 1 is
//! the topology graph; screen 2 is the device view with its live bandwidth
//! chart.
//!
//! Logs go to a file so they never corrupt the terminal. A background data
//! bridge task streams directory updates into the TUI action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use netmap_core::{ClientConfig, Controller};

use crate::app::App;

/// Directory re-read period while the dashboard is open.
const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Terminal dashboard for exploring a discovered network.
#[derive(Parser, Debug)]
#[command(name = "netmap-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short, long, env = "NETMAP_PROFILE")]
    profile: Option<String>,

    /// Backend base URL (overrides the profile)
    #[arg(short, long, env = "NETMAP_BACKEND")]
    backend: Option<String>,

    /// Log file path (defaults to netmap-tui.log in the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may log to stdout/stderr while the terminal
/// is in raw mode. Hold the guard until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("netmap_tui={log_level},netmap_core={log_level}"))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| netmap_config::data_dir().join("netmap-tui.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    let _ = std::fs::create_dir_all(&log_dir);
    let log_filename = log_file
        .file_name()
        .map_or_else(|| "netmap-tui.log".into(), std::ffi::OsStr::to_os_string);

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Client config and export directory from the config file and flags.
fn resolve(cli: &Cli) -> Result<(ClientConfig, PathBuf)> {
    let cfg = netmap_config::load_config_or_default();
    let profile = cli.profile.as_deref();

    let mut config = match cli.backend.as_deref() {
        Some(backend) => {
            let timeout = netmap_config::select_profile(&cfg, profile)?
                .and_then(|(_, p)| p.timeout)
                .unwrap_or(cfg.defaults.timeout);
            netmap_config::client_config(backend, timeout, &cfg.defaults)?
        }
        None => netmap_config::resolve_profile(&cfg, profile)?,
    };
    config.refresh_interval = REFRESH_INTERVAL;

    Ok((config, netmap_config::export_dir(&cfg, profile)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal switches to raw mode.
    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let (config, export_dir) = resolve(&cli)?;
    info!(backend = %config.backend_url, "starting netmap-tui");

    let controller = Controller::new(config)?;
    let mut app = App::new(controller, export_dir);
    app.run().await?;

    Ok(())
}
