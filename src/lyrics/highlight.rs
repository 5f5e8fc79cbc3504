//! Active-line tracking and auto-scroll for the lyric pane.
//!
//! The pane renders `viewport / 2` blank rows above and below the lyrics, so
//! scrolling to offset `i` puts line `i` on the middle row. That keeps the
//! centering rule the same for the first and last lines.

use std::time::{Duration, Instant};

use super::model::LyricTrack;

/// Fraction of the remaining distance covered per frame while easing.
const SCROLL_EASE: f64 = 0.35;

/// What the lyric pane should show.
#[derive(Debug, PartialEq)]
pub enum LyricSource<'a> {
    /// Parsed, timed lyrics.
    Track(&'a LyricTrack),
    /// No parsed lyrics; the server's current line, verbatim.
    CurrentLine(&'a str),
    /// Nothing to show yet.
    Placeholder,
}

/// Pick the lyric source: parsed track, then the pushed current line, then a placeholder.
pub fn lyric_source<'a>(track: &'a LyricTrack, current_line: Option<&'a str>) -> LyricSource<'a> {
    if !track.is_empty() {
        return LyricSource::Track(track);
    }
    match current_line.filter(|l| !l.trim().is_empty()) {
        Some(line) => LyricSource::CurrentLine(line),
        None => LyricSource::Placeholder,
    }
}

/// Blank rows rendered above (and below) the lyrics for a viewport height.
pub fn padding_rows(viewport: u16) -> u16 {
    viewport / 2
}

/// Debounced suppression window: every interaction pushes the resume time out.
#[derive(Debug, Clone)]
pub struct ScrollSuppression {
    quiet: Duration,
    resume_at: Option<Instant>,
}

impl ScrollSuppression {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            resume_at: None,
        }
    }

    /// Record a user interaction; replaces any pending resume deadline.
    pub fn interact(&mut self, now: Instant) {
        self.resume_at = Some(now + self.quiet);
    }

    pub fn is_suppressed(&self, now: Instant) -> bool {
        matches!(self.resume_at, Some(at) if now < at)
    }

    /// Drop an expired deadline. Returns `true` when auto-scroll just resumed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.resume_at {
            Some(at) if now >= at => {
                self.resume_at = None;
                true
            }
            _ => false,
        }
    }
}

/// Tracks the active lyric line and the pane's (eased) scroll offset.
#[derive(Debug, Clone)]
pub struct LyricHighlighter {
    active: Option<usize>,
    suppression: ScrollSuppression,
    offset: f64,
    target: f64,
}

impl LyricHighlighter {
    pub fn new(resume_after: Duration) -> Self {
        Self {
            active: None,
            suppression: ScrollSuppression::new(resume_after),
            offset: 0.0,
            target: 0.0,
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Scroll offset to render, in lines.
    pub fn offset(&self) -> u16 {
        self.offset.max(0.0).round() as u16
    }

    pub fn auto_scroll_enabled(&self, now: Instant) -> bool {
        !self.suppression.is_suppressed(now)
    }

    /// Forget the previous track's position.
    pub fn reset(&mut self) {
        self.active = None;
        self.offset = 0.0;
        self.target = 0.0;
    }

    /// Recompute the active line for `progress` and advance the scroll by one frame.
    pub fn update(&mut self, track: &LyricTrack, progress: f64, now: Instant) {
        self.active = track.active_index(progress);
        self.suppression.poll(now);

        if !self.suppression.is_suppressed(now) {
            if let Some(i) = self.active {
                self.target = i as f64;
            }
        }
        self.step();
    }

    /// User scrolled the pane by `lines`; suppresses auto-scroll and moves immediately.
    pub fn scroll_by(&mut self, lines: i32, track_len: usize, now: Instant) {
        self.suppression.interact(now);
        let max = track_len.saturating_sub(1) as f64;
        self.target = (self.offset.round() + f64::from(lines)).clamp(0.0, max);
        self.offset = self.target;
    }

    /// Any other direct interaction with the pane (a click).
    pub fn interact(&mut self, now: Instant) {
        self.suppression.interact(now);
    }

    /// Lyric index rendered on `row` of a pane `viewport` rows tall.
    pub fn line_at_row(&self, row: u16, viewport: u16, track_len: usize) -> Option<usize> {
        let idx = (i64::from(self.offset()) + i64::from(row)) - i64::from(padding_rows(viewport));
        usize::try_from(idx).ok().filter(|&i| i < track_len)
    }

    fn step(&mut self) {
        let distance = self.target - self.offset;
        if distance.abs() < 0.5 {
            self.offset = self.target;
        } else {
            self.offset += distance * SCROLL_EASE;
        }
    }
}
