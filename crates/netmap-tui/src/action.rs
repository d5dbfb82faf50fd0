//! Every state change in the TUI travels as an [`Action`].

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use netmap_core::{CidrLabel, Device, EnrichKind, PromotionRequest, Snapshot};

use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Actions that wait for a y/N answer.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    Promote(PromotionRequest),
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Promote(request) => f.write_str(&request.prompt()),
        }
    }
}

/// Result of loading one device record for the detail screen.
#[derive(Debug, Clone)]
pub enum DeviceLoad {
    Loaded(Arc<Device>),
    NotFound(IpAddr),
    Failed { ip: IpAddr, message: String },
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,

    // ── Data (from the bridge) ────────────────────────────────────
    DevicesUpdated(Snapshot<Device>),
    CidrLoaded(CidrLabel),
    Connected,
    Disconnected(String),

    // ── Directory actions ─────────────────────────────────────────
    RequestRefresh,
    RequestScan,
    RequestExport,
    OpenImport,
    CloseImport,
    ImportInput(String),
    RequestImport(String),
    /// A backend call started or finished (drives the busy throbber).
    Busy(Option<String>),

    // ── Device view ───────────────────────────────────────────────
    OpenDevice(IpAddr),
    DeviceLoaded(DeviceLoad),
    RequestEnrich { ip: IpAddr, kind: EnrichKind },

    // ── Confirm dialog ────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}
