//! Directory-wide actions: scan, export, import, enrich, and the
//! informational lookups.

use std::net::IpAddr;
use std::path::Path;

use serde_json::json;
use netmap_core::{Command as CoreCommand, CommandResult, Controller, EnrichKind};

use crate::cli::{EnrichKindArg, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::devices;

fn unexpected(result: &CommandResult) -> CliError {
    CliError::UnexpectedResponse {
        message: format!("unexpected command result: {result:?}"),
    }
}

pub async fn scan(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let bar = super::util::spinner("Scanning network...", global.quiet);
    let result = controller.execute(CoreCommand::Scan).await;
    bar.finish_and_clear();

    let count = match result? {
        CommandResult::Scanned { count } => count,
        other => return Err(unexpected(&other)),
    };

    let summary = json!({ "devices": count });
    let out = output::render_single(
        global.output,
        &summary,
        |_| format!("Scan complete: {count} devices found."),
        |_| count.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn export(controller: &Controller, path: &Path, global: &GlobalOpts) -> Result<(), CliError> {
    let bytes = match controller.execute(CoreCommand::Export).await? {
        CommandResult::Exported(bytes) => bytes,
        other => return Err(unexpected(&other)),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CliError::File {
            path: parent.display().to_string(),
            source,
        })?;
    }
    std::fs::write(path, &bytes).map_err(|source| CliError::File {
        path: path.display().to_string(),
        source,
    })?;

    output::notice(
        &format!("Exported {} bytes to {}", bytes.len(), path.display()),
        global.quiet,
    );
    Ok(())
}

pub async fn import(controller: &Controller, path: &Path, global: &GlobalOpts) -> Result<(), CliError> {
    let content = std::fs::read(path).map_err(|source| CliError::File {
        path: path.display().to_string(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "import.json".into(), |n| n.to_string_lossy().into_owned());

    let count = match controller
        .execute(CoreCommand::Import { file_name, content })
        .await?
    {
        CommandResult::Imported { count } => count,
        other => return Err(unexpected(&other)),
    };

    let summary = json!({ "imported": count });
    let out = output::render_single(
        global.output,
        &summary,
        |_| format!("Imported {count} devices."),
        |_| count.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn enrich(
    controller: &Controller,
    ip: IpAddr,
    kind: EnrichKindArg,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let kind = match kind {
        EnrichKindArg::Nmap => EnrichKind::Nmap,
        EnrichKindArg::Snmp => EnrichKind::Snmp,
        EnrichKindArg::Both => EnrichKind::Both,
    };

    let bar = super::util::spinner(&format!("Running {kind} enrichment on {ip}..."), global.quiet);
    let result = controller.execute(CoreCommand::Enrich { kind, ip }).await;
    bar.finish_and_clear();

    let device = match result? {
        CommandResult::Enriched(device) => device,
        other => return Err(unexpected(&other)),
    };

    output::notice(&format!("Enrichment ({kind}) finished for {ip}"), global.quiet);
    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        device.as_ref(),
        |d| devices::detail(d, color),
        |d| d.ip.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn snmp_version(controller: &Controller, ip: IpAddr, global: &GlobalOpts) -> Result<(), CliError> {
    let version = controller.snmp_version(ip).await?;
    let label = version.clone().unwrap_or_else(|| "Not Supported".into());

    let summary = json!({ "ip": ip, "snmp_version": version });
    let out = output::render_single(
        global.output,
        &summary,
        |_| format!("{ip}: {label}"),
        |_| label.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn cidr(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let cidr = controller.cidr().await?;

    let summary = json!({ "cidr": cidr });
    let out = output::render_single(global.output, &summary, |_| cidr.clone(), |_| cidr.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
