use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/reprise/config.toml` or `~/.config/reprise/config.toml`
///
/// Precedence (highest wins):
/// 1) Command line (`reprise <base-url>` overrides `remote.base_url`)
/// 2) Environment variables (prefix `REPRISE__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub remote: RemoteSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub lyrics: LyricsSettings,
    pub logging: LoggingSettings,
    pub mpris: MprisSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Player API address, `scheme://host:port`.
    pub base_url: String,
    /// Fixed wait before reconnecting after the status stream drops (milliseconds).
    pub reconnect_backoff_ms: u64,
    /// Timeout for status, lyric and control requests (milliseconds).
    /// The status stream itself has no timeout.
    pub request_timeout_ms: u64,
    /// TCP connect timeout for every request (milliseconds).
    pub connect_timeout_ms: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:23330".to_string(),
            reconnect_backoff_ms: 3000,
            request_timeout_ms: 5000,
            connect_timeout_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Dim every lyric line except the active one.
    pub blur: bool,

    /// Which track fields to show in the now-playing line, and in what order.
    ///
    /// Example: ["artist", "title", "album"]
    pub now_playing_fields: Vec<TrackDisplayField>,

    /// Separator used to join `now_playing_fields`.
    pub now_playing_separator: String,

    /// Which time fields to show on the progress bar, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub time_fields: Vec<TimeField>,

    /// Separator used to join `time_fields`.
    pub time_separator: String,

    /// How long notices (failed requests, lost connection) stay visible (milliseconds).
    pub notice_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ reprise: your player, from afar ~ ".to_string(),
            blur: true,
            now_playing_fields: vec![TrackDisplayField::Title, TrackDisplayField::Artist],
            now_playing_separator: " - ".to_string(),
            time_fields: vec![TimeField::Elapsed, TimeField::Total, TimeField::Remaining],
            time_separator: " / ".to_string(),
            notice_ms: 4000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to seek when pressing `H` / `L`.
    pub seek_step_seconds: u64,
    /// Volume change when pressing `-` / `+`.
    pub volume_step: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_step_seconds: 5,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LyricsSettings {
    /// Quiet time after scrolling the lyrics before auto-scroll resumes (milliseconds).
    pub auto_scroll_resume_ms: u64,
    /// Lines shown when there are no lyrics at all.
    pub placeholder: Vec<String>,
}

impl Default for LyricsSettings {
    fn default() -> Self {
        Self {
            auto_scroll_resume_ms: 5000,
            placeholder: vec![
                "Waiting for music...".to_string(),
                "Lyrics will show up here".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Maximum level: "error", "warn", "info", "debug" or "trace".
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/reprise/reprise.log`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MprisSettings {
    /// Expose the remote player on the session bus for media keys and `playerctl`.
    pub enabled: bool,
}

impl Default for MprisSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    #[serde(alias = "singer")]
    Artist,
    Album,
}
