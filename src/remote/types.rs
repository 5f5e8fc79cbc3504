//! Remote player data types: status snapshot, control commands and the
//! events the client hands to the UI.

use crate::lyrics::LyricTrack;

/// Fields requested from the status stream, in wire naming.
pub const STREAM_FIELDS: &[&str] = &[
    "status",
    "name",
    "singer",
    "albumName",
    "duration",
    "progress",
    "playbackRate",
    "picUrl",
    "lyricLineText",
    "lyricLineAllText",
    "lyric",
    "collect",
    "volume",
    "mute",
];

/// Playback status reported by the remote player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayerStatus {
    Playing,
    Paused,
    Stopped,
    Error,
}

impl Default for PlayerStatus {
    fn default() -> Self {
        Self::Stopped
    }
}

impl PlayerStatus {
    /// Map a wire value; unknown values count as stopped.
    ///
    /// The player spells stopped as `"stoped"`; either spelling works.
    pub fn from_wire(s: &str) -> Self {
        match s.trim() {
            "playing" => Self::Playing,
            "paused" => Self::Paused,
            "error" => Self::Error,
            _ => Self::Stopped,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Stopped => "Stopped",
            Self::Error => "Error",
        }
    }
}

/// A complete snapshot of the remote player.
///
/// Built by the state accumulator after every merge; `duration == 0` means
/// the duration is not known yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerState {
    pub status: PlayerStatus,
    pub track_name: String,
    pub artist_name: String,
    pub album_name: String,
    pub cover_url: String,
    /// Seconds.
    pub duration: f64,
    /// Seconds, never above `duration` once the duration is known.
    pub progress: f64,
    pub playback_rate: f64,
    /// 0..=100.
    pub volume: u8,
    pub muted: bool,
    pub collected: bool,
    pub current_lyric_line: String,
    pub current_lyric_all_text: String,
    pub raw_lyric: Option<String>,
}

impl PlayerState {
    /// Key used to notice song changes. Not a stable id.
    pub fn track_identity(&self) -> String {
        format!("{}|{}", self.track_name, self.artist_name)
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlayerStatus::Playing
    }
}

/// Control requests the remote player accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCmd {
    Play,
    Pause,
    SkipNext,
    SkipPrev,
    Shuffle,
    Repeat,
    /// Absolute position in seconds.
    Seek(f64),
    /// 0..=100.
    Volume(u8),
    Mute(bool),
}

impl ControlCmd {
    /// Path segment of the control endpoint.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::SkipNext => "skip-next",
            Self::SkipPrev => "skip-prev",
            Self::Shuffle => "shuffle",
            Self::Repeat => "repeat",
            Self::Seek(_) => "seek",
            Self::Volume(_) => "volume",
            Self::Mute(_) => "mute",
        }
    }

    /// Query parameters of the control request.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Seek(offset) => vec![("offset", format!("{:.2}", offset.max(0.0)))],
            Self::Volume(v) => vec![("volume", (*v).min(100).to_string())],
            Self::Mute(m) => vec![("mute", m.to_string())],
            _ => Vec::new(),
        }
    }
}

/// Why a snapshot was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateCause {
    /// A full status poll.
    Bootstrap,
    /// A single stream event for the named field.
    Field(String),
}

impl UpdateCause {
    /// Whether the update may have moved status, progress or duration.
    pub fn touches_timing(&self) -> bool {
        match self {
            Self::Bootstrap => true,
            Self::Field(f) => matches!(f.as_str(), "status" | "progress" | "duration"),
        }
    }
}

/// Messages from the remote client to the UI.
#[derive(Debug, Clone)]
pub enum RemoteEvent {
    /// The status stream is open.
    Connected,
    /// The status stream dropped; a reconnect is scheduled.
    Disconnected { reason: String },
    Snapshot {
        state: PlayerState,
        cause: UpdateCause,
    },
    /// Replacement lyrics for the current song.
    Lyrics(LyricTrack),
    /// One-off user-visible message (failed bootstrap, failed control).
    Notice(String),
}
