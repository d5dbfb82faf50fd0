//! CLI configuration: thin wrapper around `netmap_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--profile,
//! --backend, --timeout).

use std::path::PathBuf;

use netmap_core::{ClientConfig, DEFAULT_BACKEND_URL};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use netmap_config::{
    Config, ConfigError, DEFAULT_EXPORT_FILE, Profile, config_path, load_config_or_default,
    save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build a `ClientConfig` from the config file plus flag overrides.
///
/// Precedence: flag/env > profile > `[defaults]` > built-in.
pub fn resolve_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile = match netmap_config::select_profile(cfg, global.profile.as_deref()) {
        Ok(found) => found.map(|(_, p)| p),
        Err(ConfigError::UnknownProfile { name }) => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(cfg),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let backend = global
        .backend
        .as_deref()
        .or_else(|| profile.map(|p| p.backend.as_str()))
        .unwrap_or(DEFAULT_BACKEND_URL);

    let timeout = global
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout))
        .unwrap_or(cfg.defaults.timeout);

    Ok(netmap_config::client_config(backend, timeout, &cfg.defaults)?)
}

/// Where `export` writes when `--file` is not given.
pub fn default_export_path(global: &GlobalOpts, cfg: &Config) -> PathBuf {
    netmap_config::export_dir(cfg, global.profile.as_deref()).join(DEFAULT_EXPORT_FILE)
}
