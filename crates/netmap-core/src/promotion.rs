// ── Device type promotion ──
//
// Reclassifies a device from one of its discovered tags. The flow is
// strictly confirm-then-mutate: nothing is sent before an explicit
// affirmation, and the local record only changes once the backend has
// accepted the new type and the directory has been re-read.

use std::net::IpAddr;

use tracing::{info, warn};

use crate::backend::DirectoryBackend;
use crate::error::CoreError;
use crate::model::{Device, PromotableClass};
use crate::store::DeviceDirectory;

/// Operator's answer to the confirmation prompt. There is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Affirmed,
    Declined,
}

/// A selected, eligible tag awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionRequest {
    ip: IpAddr,
    tag: String,
    class: PromotableClass,
}

impl PromotionRequest {
    /// Select `tag` on `device`. Fails for tags outside the allow-list or
    /// tags the device does not carry.
    pub fn select(device: &Device, tag: &str) -> Result<Self, CoreError> {
        let ineligible = || CoreError::PromotionIneligible {
            tag: tag.to_owned(),
        };
        if !device.tags.iter().any(|t| t == tag) {
            return Err(ineligible());
        }
        let class = PromotableClass::from_tag(tag).ok_or_else(ineligible)?;
        Ok(Self {
            ip: device.ip,
            tag: tag.to_owned(),
            class,
        })
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn class(&self) -> PromotableClass {
        self.class
    }

    /// Question put to the operator.
    pub fn prompt(&self) -> String {
        format!("Change device type to {}?", self.class.backend_name())
    }
}

/// Result of running a request through the workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum PromotionOutcome {
    /// Operator declined; nothing was sent.
    Declined,
    /// Backend accepted; `device` is the re-read record.
    Promoted { device: Device },
}

/// Run the promotion workflow.
///
/// On affirmation: send the change, then re-read the directory (which
/// refreshes every view) and return the device's new record. On backend
/// failure the directory is left untouched. Once the change is accepted the
/// outcome is `Promoted` even if the re-read fails; the cached record is
/// returned with its new type and the directory catches up on the next
/// refresh.
pub async fn promote<B: DirectoryBackend>(
    backend: &B,
    directory: &DeviceDirectory,
    request: &PromotionRequest,
    confirmation: Confirmation,
) -> Result<PromotionOutcome, CoreError> {
    if confirmation == Confirmation::Declined {
        info!(ip = %request.ip, new_type = %request.class, "promotion declined");
        return Ok(PromotionOutcome::Declined);
    }

    if let Err(e) = backend.change_type(request.ip, request.class).await {
        warn!(ip = %request.ip, error = %e, "type change rejected");
        return Err(e);
    }
    info!(ip = %request.ip, new_type = %request.class, "device type changed");

    let refreshed = directory.refresh_with(backend.list_devices()).await;
    let device = directory
        .device_by_ip(request.ip)
        .ok_or(CoreError::DeviceNotFound { ip: request.ip })?;
    let mut device = Device::clone(&device);
    if let Err(e) = refreshed {
        warn!(ip = %request.ip, error = %e, "refresh after type change failed");
        device.device_type = request.class.device_type();
    }
    Ok(PromotionOutcome::Promoted { device })
}
