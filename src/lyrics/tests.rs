use super::*;
use std::time::{Duration, Instant};

fn track(lines: &[(f64, &str)]) -> LyricTrack {
    LyricTrack::new(
        lines
            .iter()
            .map(|&(timestamp, text)| LyricLine {
                timestamp,
                text: text.to_string(),
            })
            .collect(),
    )
}

#[test]
fn parse_pads_short_fractions_to_milliseconds() {
    let t = parse("[01:02.5]hello");
    assert_eq!(t.len(), 1);
    assert_eq!(t.lines()[0].timestamp, 62.5);
    assert_eq!(t.lines()[0].text, "hello");

    let t = parse("[00:00.05]a\n[00:00.123456]b");
    assert_eq!(t.lines()[0].timestamp, 0.05);
    assert_eq!(t.lines()[1].timestamp, 0.123);
}

#[test]
fn parse_truncates_long_fractions_to_milliseconds() {
    let t = parse("[00:01.1234]four digits");
    assert_eq!(t.lines()[0].timestamp, 1.123);
}

#[test]
fn parse_emits_one_entry_per_tag_with_shared_text() {
    let t = parse("[00:01][00:03]shared");
    assert_eq!(
        t.lines(),
        &[
            LyricLine {
                timestamp: 1.0,
                text: "shared".into()
            },
            LyricLine {
                timestamp: 3.0,
                text: "shared".into()
            },
        ]
    );
}

#[test]
fn parse_drops_lines_without_text_or_tags() {
    assert!(parse("[00:01]   \n[00:02][00:03]\t").is_empty());
    assert!(parse("[ar:Someone]\n[ti:Song]\nplain words").is_empty());
    assert!(parse("").is_empty());
}

#[test]
fn parse_sorts_stably_by_timestamp() {
    let t = parse("[00:05]late\n[00:01]first\n[00:05]late too\r\n[00:03]middle");
    let texts: Vec<&str> = t.lines().iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "middle", "late", "late too"]);

    let stamps: Vec<f64> = t.lines().iter().map(|l| l.timestamp).collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn parse_fails_soft_on_garbage() {
    let t = parse("[99999999999999999999999:00]overflow\n[xx:yy]bad\n]][[\n[00:02]ok");
    assert_eq!(t.len(), 1);
    assert_eq!(t.lines()[0].text, "ok");
}

#[test]
fn active_index_is_last_line_not_after_progress() {
    let t = track(&[(0.0, "a"), (5.0, "b"), (10.0, "c")]);
    assert_eq!(t.active_index(7.0), Some(1));
    assert_eq!(t.active_index(0.0), Some(0));
    assert_eq!(t.active_index(10.0), Some(2));
    assert_eq!(t.active_index(999.0), Some(2));
    assert_eq!(t.active_index(-1.0), None);

    let late = track(&[(3.0, "x")]);
    assert_eq!(late.active_index(2.9), None);
    assert_eq!(LyricTrack::default().active_index(5.0), None);
}

#[test]
fn active_index_matches_linear_scan_with_duplicates() {
    let t = track(&[(1.0, "a"), (2.0, "b"), (2.0, "c"), (4.0, "d")]);
    for step in 0..12 {
        let progress = step as f64 * 0.5;
        let mut linear = None;
        for (i, l) in t.lines().iter().enumerate() {
            if progress >= l.timestamp {
                linear = Some(i);
            } else {
                break;
            }
        }
        assert_eq!(t.active_index(progress), linear, "progress {progress}");
    }
}

#[test]
fn lyric_source_falls_back_to_current_line_then_placeholder() {
    let empty = LyricTrack::default();
    assert_eq!(lyric_source(&empty, Some("now")), LyricSource::CurrentLine("now"));
    assert_eq!(lyric_source(&empty, Some("  ")), LyricSource::Placeholder);
    assert_eq!(lyric_source(&empty, None), LyricSource::Placeholder);

    let t = track(&[(0.0, "a")]);
    assert!(matches!(lyric_source(&t, Some("now")), LyricSource::Track(_)));
}

#[test]
fn highlighter_eases_towards_active_line() {
    let t = track(&[(0.0, "a"), (1.0, "b"), (2.0, "c"), (3.0, "d"), (4.0, "e")]);
    let mut h = LyricHighlighter::new(Duration::from_secs(5));
    let now = Instant::now();

    h.update(&t, 4.0, now);
    assert_eq!(h.active(), Some(4));
    // First frame moves part of the way, not straight to the target.
    assert!(h.offset() < 4);

    for _ in 0..30 {
        h.update(&t, 4.0, now);
    }
    assert_eq!(h.offset(), 4);
}

#[test]
fn user_scroll_suppresses_auto_scroll_until_quiet_window_passes() {
    let t = track(&[(0.0, "a"), (1.0, "b"), (2.0, "c"), (3.0, "d")]);
    let mut h = LyricHighlighter::new(Duration::from_secs(5));
    let start = Instant::now();

    h.scroll_by(3, t.len(), start);
    assert_eq!(h.offset(), 3);
    assert!(!h.auto_scroll_enabled(start));

    // Active line is 0 but the view stays where the user put it.
    h.update(&t, 0.5, start + Duration::from_secs(4));
    assert_eq!(h.active(), Some(0));
    assert_eq!(h.offset(), 3);

    // A second interaction restarts the window instead of accumulating.
    h.interact(start + Duration::from_secs(4));
    h.update(&t, 0.5, start + Duration::from_secs(6));
    assert_eq!(h.offset(), 3);

    let resumed = start + Duration::from_secs(9);
    assert!(h.auto_scroll_enabled(resumed));
    for _ in 0..30 {
        h.update(&t, 0.5, resumed);
    }
    assert_eq!(h.offset(), 0);
}

#[test]
fn scroll_by_clamps_to_track_bounds() {
    let mut h = LyricHighlighter::new(Duration::from_secs(5));
    let now = Instant::now();
    h.scroll_by(-4, 3, now);
    assert_eq!(h.offset(), 0);
    h.scroll_by(10, 3, now);
    assert_eq!(h.offset(), 2);
}

#[test]
fn line_at_row_accounts_for_padding() {
    let h = LyricHighlighter::new(Duration::from_secs(5));
    // Viewport of 10 rows: 5 padding rows, so line 0 sits on row 5.
    assert_eq!(h.line_at_row(5, 10, 3), Some(0));
    assert_eq!(h.line_at_row(7, 10, 3), Some(2));
    assert_eq!(h.line_at_row(4, 10, 3), None);
    assert_eq!(h.line_at_row(8, 10, 3), None);
}

#[test]
fn suppression_poll_reports_resume_once() {
    let mut s = ScrollSuppression::new(Duration::from_millis(100));
    let now = Instant::now();
    s.interact(now);
    assert!(s.is_suppressed(now));
    assert!(!s.poll(now + Duration::from_millis(50)));
    assert!(s.poll(now + Duration::from_millis(100)));
    assert!(!s.poll(now + Duration::from_millis(200)));
    assert!(!s.is_suppressed(now + Duration::from_millis(200)));
}
