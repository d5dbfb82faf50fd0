//! `bandwidth <ip>`: run the sampler and stream each sample as it lands.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use netmap_core::{BandwidthSample, Controller};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

fn kbps(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.1}"))
}

fn render_sample(format: OutputFormat, sample: &BandwidthSample) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(format!(
            "{}  in {:>10} kbps  out {:>10} kbps",
            sample.timestamp.format("%H:%M:%S"),
            kbps(sample.in_kbps),
            kbps(sample.out_kbps),
        )),
        OutputFormat::Plain => Ok(format!("{},{}", kbps(sample.in_kbps), kbps(sample.out_kbps))),
        // One document per line so the stream stays parseable.
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_json(sample, true),
        OutputFormat::Yaml => Ok(format!("---\n{}", output::render_yaml(sample)?.trim_end())),
    }
}

pub async fn handle(
    controller: &Controller,
    ip: IpAddr,
    samples: u32,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let device = util::find_device(controller, ip)?;
    let sampler = controller.sampler(ip, device.mac.clone());
    let mut feed = sampler.subscribe();

    output::notice(
        &format!(
            "Sampling {ip} every {:?} (Ctrl-C to stop)",
            sampler.settings().period
        ),
        global.quiet,
    );

    let mut printed = 0u32;
    let mut last_seen: Option<DateTime<Utc>> = None;
    while printed < samples {
        let window = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            window = feed.changed() => window,
        };
        let Some(window) = window else { break };
        let Some(latest) = window.latest().copied() else {
            continue;
        };
        if last_seen == Some(latest.timestamp) {
            continue;
        }
        last_seen = Some(latest.timestamp);
        printed += 1;
        output::print_output(&render_sample(global.output, &latest)?, global.quiet);
    }

    if global.output == OutputFormat::Table && printed > 0 {
        let window = sampler.window();
        output::notice(
            &format!("{printed} samples, peak {:.1} kbps", window.peak_kbps()),
            global.quiet,
        );
    }
    Ok(())
}
