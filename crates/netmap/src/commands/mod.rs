//! Command dispatch: bridges CLI args -> core calls -> output formatting.

pub mod actions;
pub mod bandwidth;
pub mod config_cmd;
pub mod devices;
pub mod promote;
pub mod topology;
pub mod util;

use netmap_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a backend-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(controller, args, global),
        Command::Scan => actions::scan(controller, global).await,
        Command::Export { file } => {
            let path = file.unwrap_or_else(|| crate::config::default_export_path(global, cfg));
            actions::export(controller, &path, global).await
        }
        Command::Import { file } => actions::import(controller, &file, global).await,
        Command::Enrich { ip, kind } => actions::enrich(controller, ip, kind, global).await,
        Command::SnmpVersion { ip } => actions::snmp_version(controller, ip, global).await,
        Command::Cidr => actions::cidr(controller, global).await,
        Command::Promote { ip, tag } => promote::handle(controller, ip, &tag, global).await,
        Command::Bandwidth { ip, samples } => {
            bandwidth::handle(controller, ip, samples, global).await
        }
        Command::Topology => topology::handle(controller, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "handled before connecting".into(),
        }),
    }
}
