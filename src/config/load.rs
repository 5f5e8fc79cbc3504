use std::sync::LazyLock;
use std::{env, path::PathBuf};

use regex::Regex;

use super::schema::Settings;

static BASE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://.+:\d+$").expect("valid base url regex"));

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `REPRISE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("REPRISE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        validate_base_url(&self.remote.base_url)?;
        if self.remote.reconnect_backoff_ms == 0 {
            return Err("remote.reconnect_backoff_ms must be >= 1".to_string());
        }
        if !(1..=100).contains(&self.controls.volume_step) {
            return Err("controls.volume_step must be between 1 and 100".to_string());
        }
        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(format!("logging.level: unknown level {:?}", self.logging.level));
        }
        Ok(())
    }

    /// Render the settings as TOML (for `--print-config`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Check a player address has the `scheme://host:port` shape.
pub fn validate_base_url(url: &str) -> Result<(), String> {
    if BASE_URL.is_match(url) {
        Ok(())
    } else {
        Err(format!(
            "remote.base_url must look like http://192.168.1.100:23330, got {url:?}"
        ))
    }
}

/// Resolve the config path from `REPRISE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("REPRISE_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/reprise/config.toml`
/// or `~/.config/reprise/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("reprise").join("config.toml"))
}

/// Default log file under `$XDG_STATE_HOME/reprise/reprise.log`
/// or `~/.local/state/reprise/reprise.log`.
pub fn default_log_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("reprise").join("reprise.log"))
}
