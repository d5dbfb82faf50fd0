//! Device command handlers.

use std::sync::Arc;

use tabled::Tabled;
use netmap_core::{Controller, Device, Port};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct DeviceRow {
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl DeviceRow {
    pub(crate) fn new(d: &Device, color: bool) -> Self {
        Self {
            ip: d.ip.to_string(),
            hostname: d.display_hostname().to_owned(),
            mac: d.mac.to_string(),
            vendor: d.vendor.clone().unwrap_or_default(),
            dtype: d.device_type.to_string(),
            status: output::status_label(d.online, color),
            tags: tag_list(d, color),
        }
    }
}

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "Proto")]
    protocol: String,
    #[tabled(rename = "State")]
    status: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Version")]
    version: String,
}

impl From<&Port> for PortRow {
    fn from(p: &Port) -> Self {
        Self {
            port: p.port,
            protocol: p.protocol.clone(),
            status: p.status.clone(),
            service: p.service.clone(),
            product: p.product.clone(),
            version: p.version.clone(),
        }
    }
}

fn tag_list(d: &Device, color: bool) -> String {
    d.tags_with_promotion()
        .map(|(tag, class)| output::tag_label(tag, class.is_some(), color))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Multi-line detail view used by `devices get`, `enrich` and `promote`.
pub(crate) fn detail(d: &Device, color: bool) -> String {
    let mut lines = vec![
        format!("IP:        {}", d.ip),
        format!("Hostname:  {}", d.display_hostname()),
        format!(
            "MAC:       {}",
            if d.mac.is_empty() { "-" } else { d.mac.as_str() }
        ),
        format!("Vendor:    {}", d.vendor.as_deref().unwrap_or("-")),
        format!("OS:        {}", d.os.as_deref().unwrap_or("-")),
        format!("Type:      {}", d.device_type),
        format!("Status:    {}", output::status_label(d.online, color)),
        format!("Uptime:    {}", d.uptime_label()),
        format!("SNMP:      {}", d.snmp_label()),
    ];
    if let Some(ref model) = d.model {
        lines.push(format!("Model:     {model}"));
    }
    if !d.tags.is_empty() {
        lines.push(format!("Tags:      {}", tag_list(d, color)));
    }
    if d.ports.is_empty() {
        lines.push("Ports:     none discovered".into());
    } else {
        let rows: Vec<PortRow> = d.ports.iter().map(PortRow::from).collect();
        lines.push(String::new());
        lines.push(output::render_table(&rows));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(controller: &Controller, args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    match args.command {
        DevicesCommand::List => {
            let snap = controller.devices();
            let out = output::render_list(
                global.output,
                &snap,
                |d: &Arc<Device>| DeviceRow::new(d, color),
                |d| d.ip.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { ip } => {
            let device = util::find_device(controller, ip)?;
            let out = output::render_single(
                global.output,
                device.as_ref(),
                |d| detail(d, color),
                |d| d.ip.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
