use crate::config::{TimeField, TrackDisplayField};
use crate::remote::PlayerState;

/// Build the now-playing text for `state` according to the configured `fields` and separator.
///
/// Blank fields are skipped; falls back to the track name when nothing was produced.
pub fn now_playing_text(state: &PlayerState, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for f in fields {
        let value = match f {
            TrackDisplayField::Title => &state.track_name,
            TrackDisplayField::Artist => &state.artist_name,
            TrackDisplayField::Album => &state.album_name,
        };
        let value = value.trim();
        if !value.is_empty() {
            parts.push(value);
        }
    }

    if parts.is_empty() {
        state.track_name.trim().to_string()
    } else {
        parts.join(sep)
    }
}

/// Build the progress label (elapsed/total/remaining).
///
/// `duration == 0` is unknown: total and remaining are left out.
pub fn time_text(elapsed: f64, duration: f64, fields: &[TimeField], sep: &str) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for f in fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if duration > 0.0 {
                    parts.push(format_mmss(duration));
                }
            }
            TimeField::Remaining => {
                if duration > 0.0 {
                    parts.push(format!("-{}", format_mmss(duration - elapsed)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(sep))
    }
}

/// Format seconds as `MM:SS`; negative and non-finite values show as `00:00`.
pub fn format_mmss(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
