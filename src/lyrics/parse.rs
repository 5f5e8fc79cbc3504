use std::sync::LazyLock;

use regex::Regex;

use super::model::{LyricLine, LyricTrack};

/// `[mm:ss]` or `[mm:ss.fraction]`.
static TIME_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+):(\d+)(?:\.(\d+))?\]").expect("valid time tag regex"));

/// Parse timed-lyric text into a sorted `LyricTrack`.
///
/// Each time tag on a line produces one entry carrying the line's text with
/// every tag removed, so `[00:01][00:03]shared` yields two entries. Lines
/// without a tag or without text are skipped. Malformed input never fails;
/// it just contributes nothing.
pub fn parse(text: &str) -> LyricTrack {
    let mut lines = Vec::new();

    for raw in text.lines() {
        let stripped = TIME_TAG.replace_all(raw, "");
        let body = stripped.trim();
        if body.is_empty() {
            continue;
        }

        for caps in TIME_TAG.captures_iter(raw) {
            let Some(ms) = tag_millis(
                &caps[1],
                &caps[2],
                caps.get(3).map(|m| m.as_str()),
            ) else {
                continue;
            };
            lines.push(LyricLine {
                timestamp: ms as f64 / 1000.0,
                text: body.to_string(),
            });
        }
    }

    LyricTrack::new(lines)
}

/// Convert tag components to milliseconds; `None` on overflow.
fn tag_millis(min: &str, sec: &str, fraction: Option<&str>) -> Option<u64> {
    let min: u64 = min.parse().ok()?;
    let sec: u64 = sec.parse().ok()?;
    let ms = match fraction {
        Some(f) => fraction_millis(f)?,
        None => 0,
    };
    min.checked_mul(60)?
        .checked_add(sec)?
        .checked_mul(1000)?
        .checked_add(ms)
}

/// `.5` is 500ms and `.05` is 50ms; digits past millisecond precision are dropped,
/// so `.1234` is 123ms rather than 1234ms.
fn fraction_millis(fraction: &str) -> Option<u64> {
    let mut digits: String = fraction.chars().take(3).collect();
    while digits.len() < 3 {
        digits.push('0');
    }
    digits.parse().ok()
}
