//! `promote <ip> <tag>`: tag-driven device reclassification.

use std::net::IpAddr;

use netmap_core::{Confirmation, Controller, PromotionOutcome, PromotionRequest};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::{devices, util};

pub async fn handle(
    controller: &Controller,
    ip: IpAddr,
    tag: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let device = util::find_device(controller, ip)?;
    let request = PromotionRequest::select(&device, tag)?;

    let confirmation = if util::confirm(&request.prompt(), "promote", global.yes)? {
        Confirmation::Affirmed
    } else {
        Confirmation::Declined
    };

    match controller.promote(&request, confirmation).await? {
        PromotionOutcome::Declined => Err(CliError::Cancelled {
            action: format!("Promotion of {ip} to {}", request.class()),
        }),
        PromotionOutcome::Promoted { device } => {
            output::notice(
                &format!("{ip} is now a {}", device.device_type),
                global.quiet,
            );
            let color = output::should_color(global.color);
            let out = output::render_single(
                global.output,
                &device,
                |d| devices::detail(d, color),
                |d| d.device_type.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
