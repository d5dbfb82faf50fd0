//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use netmap_core::{Controller, Device};

use crate::error::CliError;

/// Look up a device in the snapshot loaded at connect time.
pub fn find_device(controller: &Controller, ip: IpAddr) -> Result<Arc<Device>, CliError> {
    controller
        .directory()
        .device_by_ip(ip)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "device".into(),
            identifier: ip.to_string(),
            list_command: "devices list".into(),
        })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Defaults to "no". Without a terminal the prompt cannot be shown, so
/// `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Spinner on stderr for long-running backend calls.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
