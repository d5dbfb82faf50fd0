// ── Runtime client configuration ──
//
// Describes *where* the backend lives and how the core should pace its
// polling. Never touches disk: the CLI/TUI builds a `ClientConfig` (usually
// via `netmap-config`) and hands it to the `Controller`.

use std::time::Duration;

use url::Url;

use crate::model::DEFAULT_WINDOW;

/// Backend address used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Configuration for talking to a single backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root (e.g., `http://localhost:8000`). Paths are appended under `/api`.
    pub backend_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Bandwidth sampler tick.
    pub poll_interval: Duration,
    /// Number of bandwidth samples kept per device view.
    pub sample_window: usize,
    /// Periodic directory refresh. `Duration::ZERO` = manual refresh only.
    pub refresh_interval: Duration,
}

impl ClientConfig {
    /// Defaults for everything but the backend address.
    pub fn new(backend_url: Url) -> Self {
        Self {
            backend_url,
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
            sample_window: DEFAULT_WINDOW,
            refresh_interval: Duration::ZERO,
        }
    }

    /// Parse `raw` as the backend address, using defaults elsewhere.
    pub fn from_url_str(raw: &str) -> Result<Self, crate::CoreError> {
        let url = Url::parse(raw).map_err(|e| crate::CoreError::Config {
            message: format!("invalid backend URL '{raw}': {e}"),
        })?;
        Ok(Self::new(url))
    }
}
