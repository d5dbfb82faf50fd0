//! Shared configuration for the netmap CLI and TUI.
//!
//! TOML profiles naming a backend, global defaults for output and polling,
//! and translation to `netmap_core::ClientConfig`. The CLI layers its
//! flag overrides on top of [`resolve_profile`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netmap_core::{ClientConfig, DEFAULT_BACKEND_URL};

/// File name used when exporting without an explicit target.
pub const DEFAULT_EXPORT_FILE: &str = "network_data.json";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Bandwidth sampler tick in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Samples kept per device view.
    #[serde(default = "default_sample_window")]
    pub sample_window: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            poll_interval_ms: default_poll_interval_ms(),
            sample_window: default_sample_window(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_sample_window() -> usize {
    60
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend root URL (e.g., "http://localhost:8000").
    pub backend: String,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Where exports land when no file is given.
    pub export_dir: Option<PathBuf>,
}

impl Profile {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            timeout: None,
            export_dir: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "netmap").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Platform data directory (log files and the like).
pub fn data_dir() -> PathBuf {
    ProjectDirs::from("", "", "netmap")
        .map_or_else(dirs_fallback, |dirs| dirs.data_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netmap");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path`, layered as defaults → file → `NETMAP_*` env vars.
///
/// Nested keys use a double underscore: `NETMAP_DEFAULTS__TIMEOUT=5`.
/// A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETMAP_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// Pick the profile for `requested`, falling back to `default_profile`.
///
/// An explicitly requested profile must exist. A missing default profile
/// resolves to `None` so callers can use the built-in backend address.
pub fn select_profile<'a>(
    cfg: &'a Config,
    requested: Option<&str>,
) -> Result<Option<(&'a str, &'a Profile)>, ConfigError> {
    if let Some(name) = requested {
        return cfg
            .profiles
            .get_key_value(name)
            .map(|(k, p)| Some((k.as_str(), p)))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() });
    }

    Ok(cfg
        .default_profile
        .as_deref()
        .and_then(|name| cfg.profiles.get_key_value(name))
        .map(|(k, p)| (k.as_str(), p)))
}

/// Build a `ClientConfig` for the named (or default) profile.
pub fn resolve_profile(cfg: &Config, requested: Option<&str>) -> Result<ClientConfig, ConfigError> {
    let profile = select_profile(cfg, requested)?.map(|(_, p)| p);
    let backend = profile.map_or(DEFAULT_BACKEND_URL, |p| p.backend.as_str());
    let timeout = profile
        .and_then(|p| p.timeout)
        .unwrap_or(cfg.defaults.timeout);
    client_config(backend, timeout, &cfg.defaults)
}

/// Build a `ClientConfig` from explicit values plus the global defaults.
pub fn client_config(
    backend: &str,
    timeout_secs: u64,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let url: url::Url = backend.parse().map_err(|_| ConfigError::Validation {
        field: "backend".into(),
        reason: format!("invalid URL: {backend}"),
    })?;

    let mut config = ClientConfig::new(url);
    config.timeout = Duration::from_secs(timeout_secs);
    config.poll_interval = Duration::from_millis(defaults.poll_interval_ms.max(1));
    config.sample_window = defaults.sample_window.max(1);
    Ok(config)
}

/// Directory exports go to for this profile (current directory if unset).
pub fn export_dir(cfg: &Config, requested: Option<&str>) -> PathBuf {
    select_profile(cfg, requested)
        .ok()
        .flatten()
        .and_then(|(_, p)| p.export_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults, Defaults::default());
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
default_profile = "lab"

[defaults]
output = "json"
poll_interval_ms = 500

[profiles.lab]
backend = "http://10.0.0.2:8000"
timeout = 5
export_dir = "/tmp/exports"
"#,
        );

        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");
        assert_eq!(cfg.defaults.poll_interval_ms, 500);
        let lab = &cfg.profiles["lab"];
        assert_eq!(lab.backend, "http://10.0.0.2:8000");
        assert_eq!(lab.timeout, Some(5));
    }

    #[test]
    fn resolves_default_profile() {
        let mut cfg = Config::default();
        cfg.default_profile = Some("lab".into());
        let mut lab = Profile::new("http://10.0.0.2:8000");
        lab.timeout = Some(5);
        cfg.profiles.insert("lab".into(), lab);

        let client = resolve_profile(&cfg, None).unwrap();

        assert_eq!(client.backend_url.as_str(), "http://10.0.0.2:8000/");
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.poll_interval, Duration::from_secs(1));
        assert_eq!(client.sample_window, 60);
    }

    #[test]
    fn no_profiles_falls_back_to_localhost() {
        let client = resolve_profile(&Config::default(), None).unwrap();
        assert_eq!(client.backend_url.as_str(), "http://localhost:8000/");
        assert_eq!(client.timeout, Duration::from_secs(30));
    }

    #[test]
    fn unknown_requested_profile_is_an_error() {
        let err = resolve_profile(&Config::default(), Some("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { ref name } if name == "nope"));
    }

    #[test]
    fn invalid_backend_is_rejected() {
        let mut cfg = Config::default();
        cfg.profiles
            .insert("default".into(), Profile::new("not a url"));

        let err = resolve_profile(&cfg, None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "backend"));
    }

    #[test]
    fn export_dir_comes_from_profile() {
        let mut cfg = Config::default();
        let mut p = Profile::new(DEFAULT_BACKEND_URL);
        p.export_dir = Some(PathBuf::from("/srv/netmap"));
        cfg.profiles.insert("default".into(), p);

        assert_eq!(export_dir(&cfg, None), PathBuf::from("/srv/netmap"));
        assert_eq!(export_dir(&Config::default(), None), PathBuf::from("."));
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles
            .insert("default".into(), Profile::new("http://127.0.0.1:9000"));

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.profiles, cfg.profiles);
    }
}
