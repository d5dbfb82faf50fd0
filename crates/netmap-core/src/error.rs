// ── Core error types ──
//
// User-facing errors from netmap-core, grouped the way front ends react to
// them: transport failures, backend rejections, and payloads that do not
// match what the views need. The `From<netmap_api::Error>` impl performs
// the translation from the HTTP layer.

use std::net::IpAddr;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Transport ────────────────────────────────────────────────────
    /// Backend unreachable (connection refused, DNS, TLS).
    #[error("Cannot reach backend at {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    #[error("Controller is not connected")]
    ControllerDisconnected,

    // ── Backend ──────────────────────────────────────────────────────
    /// Non-2xx response, or a failure reported in-band.
    #[error(
        "Backend rejected the request{}: {message}",
        .status.map_or_else(String::new, |s| format!(" (HTTP {s})"))
    )]
    Backend { status: Option<u16>, message: String },

    // ── Data shape ───────────────────────────────────────────────────
    /// The response did not match the expected shape.
    #[error("Unexpected response from backend: {message}")]
    DataShape { message: String },

    /// No device with this address in the directory.
    #[error("Device not found: {ip}")]
    DeviceNotFound { ip: IpAddr },

    // ── Workflow ─────────────────────────────────────────────────────
    #[error("Tag '{tag}' is not a promotable device class (expected computer, switch or router)")]
    PromotionIneligible { tag: String },

    #[error("Promotion of {ip} to {new_type} was not confirmed")]
    PromotionDeclined { ip: IpAddr, new_type: String },

    #[error("Cannot connect {source_node} to {target_node}: {reason}")]
    InvalidConnection {
        source_node: String,
        target_node: String,
        reason: String,
    },

    // ── Local ────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    /// Transport-class failures (the backend could not be reached at all).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout)
    }

    /// Shape-class failures, including "device not found".
    pub fn is_data_shape(&self) -> bool {
        matches!(self, Self::DataShape { .. } | Self::DeviceNotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netmap_api::Error> for CoreError {
    fn from(err: netmap_api::Error) -> Self {
        match err {
            netmap_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if let Some(status) = e.status() {
                    CoreError::Backend {
                        status: Some(status.as_u16()),
                        message: e.to_string(),
                    }
                } else {
                    CoreError::Transport {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            netmap_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid backend URL: {e}"),
            },
            netmap_api::Error::ClientBuild(reason) => CoreError::Transport {
                url: String::new(),
                reason,
            },
            netmap_api::Error::Backend { status, message } => CoreError::Backend {
                status: Some(status),
                message,
            },
            netmap_api::Error::Rejected { message } => CoreError::Backend {
                status: None,
                message,
            },
            netmap_api::Error::Deserialization { message, body: _ } => {
                CoreError::DataShape { message }
            }
        }
    }
}
