//! Field-by-field merge of the remote player's state.
//!
//! The status stream pushes one field per event. `StateAccumulator` keeps the
//! last raw value of every field and rebuilds a full `PlayerState` after each
//! merge, so consumers never see a partial struct.

use serde_json::{Map, Value};

use super::types::{PlayerState, PlayerStatus};

/// Result of one merge.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub snapshot: PlayerState,
    /// The track identity differs from the previous merge's.
    pub song_changed: bool,
}

#[derive(Debug, Default)]
pub struct StateAccumulator {
    fields: Map<String, Value>,
    last_identity: Option<String>,
}

impl StateAccumulator {
    /// Merge a single stream event. Last write per field wins.
    pub fn apply_update(&mut self, field: &str, value: Value) -> Update {
        self.fields.insert(field.to_string(), value);
        self.finish()
    }

    /// Merge a full status poll.
    pub fn apply_bootstrap(&mut self, status: Map<String, Value>) -> Update {
        self.fields.extend(status);
        self.finish()
    }

    /// Current snapshot built from every known field.
    pub fn snapshot(&self) -> PlayerState {
        let f = &self.fields;

        let duration = number(f.get("duration")).unwrap_or(0.0).max(0.0);
        let mut progress = number(f.get("progress")).unwrap_or(0.0).max(0.0);
        if duration > 0.0 {
            progress = progress.min(duration);
        }

        PlayerState {
            status: text(f.get("status"))
                .map(|s| PlayerStatus::from_wire(&s))
                .unwrap_or_default(),
            track_name: text(f.get("name")).unwrap_or_default(),
            artist_name: text(f.get("singer")).unwrap_or_default(),
            album_name: text(f.get("albumName")).unwrap_or_default(),
            cover_url: text(f.get("picUrl")).unwrap_or_default(),
            duration,
            progress,
            playback_rate: number(f.get("playbackRate")).unwrap_or(1.0),
            volume: number(f.get("volume"))
                .map(|v| v.round().clamp(0.0, 100.0) as u8)
                .unwrap_or(100),
            muted: flag(f.get("mute")).unwrap_or(false),
            collected: flag(f.get("collect")).unwrap_or(false),
            current_lyric_line: text(f.get("lyricLineText")).unwrap_or_default(),
            current_lyric_all_text: text(f.get("lyricLineAllText")).unwrap_or_default(),
            raw_lyric: text(f.get("lyric")).filter(|s| !s.trim().is_empty()),
        }
    }

    fn finish(&mut self) -> Update {
        let snapshot = self.snapshot();
        let identity = snapshot.track_identity();
        let song_changed = self.last_identity.as_deref() != Some(identity.as_str());
        if song_changed {
            self.last_identity = Some(identity);
        }
        Update {
            snapshot,
            song_changed,
        }
    }
}

/// Decode an event payload: JSON when it parses, the raw string otherwise.
pub fn decode_payload(data: &str) -> Value {
    serde_json::from_str(data).unwrap_or_else(|_| Value::String(data.to_string()))
}

fn number(v: Option<&Value>) -> Option<f64> {
    let n: f64 = match v? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn flag(v: Option<&Value>) -> Option<bool> {
    match v? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        _ => None,
    }
}

fn text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
