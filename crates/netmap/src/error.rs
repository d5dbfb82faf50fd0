//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help
//! text and a stable exit code per failure class.

use miette::Diagnostic;
use thiserror::Error;

use netmap_config::ConfigError;
use netmap_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const BACKEND: i32 = 5;
    pub const DECLINED: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend at {url}")]
    #[diagnostic(
        code(netmap::connection_failed),
        help(
            "Check that the discovery backend is running.\n\
             Reason: {reason}\n\
             Override the address with --backend or NETMAP_BACKEND."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(netmap::timeout),
        help("Increase the timeout with --timeout, or check backend responsiveness.")
    )]
    Timeout,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(netmap::not_found),
        help("Run: netmap {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Backend error: {message}")]
    #[diagnostic(code(netmap::backend))]
    Backend { message: String },

    #[error("Unexpected response from backend: {message}")]
    #[diagnostic(
        code(netmap::data_shape),
        help("The backend answered, but not in a shape netmap understands.")
    )]
    UnexpectedResponse { message: String },

    // ── Promotion ────────────────────────────────────────────────────
    #[error("Tag '{tag}' cannot be used to promote a device")]
    #[diagnostic(
        code(netmap::ineligible),
        help("Only the tags router, switch and computer are promotable. Run: netmap devices get <ip>")
    )]
    Ineligible { tag: String },

    #[error("{action} cancelled")]
    #[diagnostic(code(netmap::cancelled))]
    Cancelled { action: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netmap::validation))]
    Validation { field: String, reason: String },

    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(netmap::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(netmap::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: netmap config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(netmap::config))]
    Config(ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error("I/O error on {path}: {source}")]
    #[diagnostic(code(netmap::io))]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(netmap::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Backend { .. } | Self::UnexpectedResponse { .. } => exit_code::BACKEND,
            Self::Ineligible { .. } | Self::Cancelled { .. } => exit_code::DECLINED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout => CliError::Timeout,

            CoreError::ControllerDisconnected => CliError::ConnectionFailed {
                url: "(disconnected)".into(),
                reason: "the backend connection was closed".into(),
            },

            CoreError::Backend { status, message } => CliError::Backend {
                message: match status {
                    Some(code) => format!("HTTP {code}: {message}"),
                    None => message,
                },
            },

            CoreError::DataShape { message } => CliError::UnexpectedResponse { message },

            CoreError::DeviceNotFound { ip } => CliError::NotFound {
                resource_type: "device".into(),
                identifier: ip.to_string(),
                list_command: "devices list".into(),
            },

            CoreError::PromotionIneligible { tag } => CliError::Ineligible { tag },

            CoreError::PromotionDeclined { ip, new_type } => CliError::Cancelled {
                action: format!("Promotion of {ip} to {new_type}"),
            },

            CoreError::InvalidConnection { reason, .. } => CliError::Validation {
                field: "edge".into(),
                reason,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "backend".into(),
                reason: message,
            },

            CoreError::Io { path, source } => CliError::File { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::IpAddr;

    use super::*;

    #[test]
    fn exit_codes_follow_failure_class() {
        let cases: Vec<(CliError, i32)> = vec![
            (
                CoreError::Transport {
                    url: "http://localhost:8000".into(),
                    reason: "refused".into(),
                }
                .into(),
                exit_code::CONNECTION,
            ),
            (
                CoreError::DeviceNotFound {
                    ip: IpAddr::from([10, 0, 0, 1]),
                }
                .into(),
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Backend {
                    status: Some(500),
                    message: "boom".into(),
                }
                .into(),
                exit_code::BACKEND,
            ),
            (
                CoreError::PromotionIneligible {
                    tag: "printer".into(),
                }
                .into(),
                exit_code::DECLINED,
            ),
            (
                CliError::Validation {
                    field: "key".into(),
                    reason: "bad".into(),
                },
                exit_code::USAGE,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(err.exit_code(), code, "{err}");
        }
    }

    #[test]
    fn backend_status_is_kept_in_message() {
        let err = CliError::from(CoreError::Backend {
            status: Some(404),
            message: "Device not found".into(),
        });
        assert_eq!(err.to_string(), "Backend error: HTTP 404: Device not found");
    }
}
