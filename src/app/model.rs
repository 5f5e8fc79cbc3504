//! Application model: `App` and `Connection`.
//!
//! The `App` struct holds the latest remote snapshot, the lyrics, the local
//! progress prediction and the in-progress gestures used by the UI and runtime.

use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::lyrics::{LyricHighlighter, LyricTrack, parse};
use crate::progress::ProgressPredictor;
use crate::remote::{ControlCmd, PlayerState, PlayerStatus, RemoteEvent, UpdateCause};

use super::gesture::{self, DragGesture};

/// State of the status stream as seen by the UI.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Connection {
    #[default]
    Connecting,
    Connected,
    Disconnected(String),
}

impl Connection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
            Self::Disconnected(_) => "Reconnecting",
        }
    }
}

#[derive(Clone, Debug)]
struct Notice {
    text: String,
    expires_at: Instant,
}

/// The main application model.
pub struct App {
    pub player: Option<PlayerState>,
    pub lyrics: LyricTrack,
    pub predictor: ProgressPredictor,
    pub highlighter: LyricHighlighter,
    pub connection: Connection,
    pub seek_drag: DragGesture<f64>,
    pub volume_drag: DragGesture<u8>,
    pub blur: bool,

    notice: Option<Notice>,
    notice_for: Duration,
    seek_step: f64,
    volume_step: u8,
    lyric_viewport: u16,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        Self {
            player: None,
            lyrics: LyricTrack::default(),
            predictor: ProgressPredictor::default(),
            highlighter: LyricHighlighter::new(Duration::from_millis(
                settings.lyrics.auto_scroll_resume_ms,
            )),
            connection: Connection::Connecting,
            seek_drag: DragGesture::default(),
            volume_drag: DragGesture::default(),
            blur: settings.ui.blur,

            notice: None,
            notice_for: Duration::from_millis(settings.ui.notice_ms),
            seek_step: settings.controls.seek_step_seconds as f64,
            volume_step: settings.controls.volume_step,
            lyric_viewport: 0,
        }
    }

    /// Apply one message from the remote client.
    pub fn apply_event(&mut self, event: RemoteEvent, now: Instant) {
        match event {
            RemoteEvent::Connected => self.connection = Connection::Connected,
            RemoteEvent::Disconnected { reason } => {
                // Failed reconnects repeat every backoff; only the first loss is news.
                if self.connection == Connection::Connected {
                    self.set_notice(format!("Connection lost: {reason}"), now);
                }
                self.connection = Connection::Disconnected(reason);
            }
            RemoteEvent::Snapshot { state, cause } => {
                let song_changed = self
                    .player
                    .as_ref()
                    .is_none_or(|p| p.track_identity() != state.track_identity());
                if song_changed {
                    // A full poll carries the new song's lyrics; a single field event
                    // still holds the previous song's, so wait for the fetch then.
                    self.lyrics = match &cause {
                        UpdateCause::Bootstrap => {
                            state.raw_lyric.as_deref().map(parse).unwrap_or_default()
                        }
                        UpdateCause::Field(_) => LyricTrack::default(),
                    };
                    self.highlighter.reset();
                    self.seek_drag.cancel();
                }
                if song_changed || cause.touches_timing() {
                    self.predictor
                        .sync(state.progress, state.duration, state.is_playing(), now);
                }
                self.player = Some(state);
            }
            RemoteEvent::Lyrics(track) => {
                self.lyrics = track;
                self.highlighter.reset();
            }
            RemoteEvent::Notice(text) => self.set_notice(text, now),
        }
    }

    /// Advance the predictor and the lyric highlighter by one frame.
    pub fn tick(&mut self, now: Instant, lyric_viewport: u16) {
        self.lyric_viewport = lyric_viewport;
        self.predictor.poll(now);
        if self.notice.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.notice = None;
        }
        let progress = self.displayed_progress();
        self.highlighter.update(&self.lyrics, progress, now);
    }

    pub fn set_notice(&mut self, text: String, now: Instant) {
        self.notice = Some(Notice {
            text,
            expires_at: now + self.notice_for,
        });
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.text.as_str())
    }

    pub fn status(&self) -> PlayerStatus {
        self.player.as_ref().map(|p| p.status).unwrap_or_default()
    }

    /// Progress to render: a seek preview wins over the prediction.
    pub fn displayed_progress(&self) -> f64 {
        self.seek_drag
            .preview()
            .unwrap_or_else(|| self.predictor.displayed())
    }

    pub fn duration(&self) -> f64 {
        self.predictor.duration()
    }

    /// Volume to render: a drag preview wins over the snapshot.
    pub fn displayed_volume(&self) -> u8 {
        self.volume_drag
            .preview()
            .or_else(|| self.player.as_ref().map(|p| p.volume))
            .unwrap_or(0)
    }

    pub fn muted(&self) -> bool {
        self.player.as_ref().is_some_and(|p| p.muted)
    }

    /// Height of the lyric pane as of the last frame.
    pub fn lyric_viewport(&self) -> u16 {
        self.lyric_viewport
    }

    pub fn toggle_blur(&mut self) {
        self.blur = !self.blur;
    }

    pub fn play_toggle(&self) -> ControlCmd {
        if self.status() == PlayerStatus::Playing {
            ControlCmd::Pause
        } else {
            ControlCmd::Play
        }
    }

    /// Seek one step from the displayed progress, clamped to the track.
    pub fn seek_step(&self, forward: bool) -> Option<ControlCmd> {
        self.player.as_ref()?;
        let delta = if forward { self.seek_step } else { -self.seek_step };
        let mut target = (self.displayed_progress() + delta).max(0.0);
        if self.duration() > 0.0 {
            target = target.min(self.duration());
        }
        Some(ControlCmd::Seek(target))
    }

    pub fn volume_step(&self, up: bool) -> Option<ControlCmd> {
        self.player.as_ref()?;
        let current = self.displayed_volume();
        let next = if up {
            current.saturating_add(self.volume_step).min(100)
        } else {
            current.saturating_sub(self.volume_step)
        };
        Some(ControlCmd::Volume(next))
    }

    pub fn mute_toggle(&self) -> Option<ControlCmd> {
        self.player.as_ref().map(|p| ControlCmd::Mute(!p.muted))
    }

    /// Start dragging the progress bar. Needs a known duration.
    pub fn begin_seek_drag(&mut self, fraction: f64) -> bool {
        let duration = self.duration();
        if duration <= 0.0 {
            return false;
        }
        self.seek_drag.begin(gesture::seek_position(duration, fraction));
        true
    }

    pub fn update_seek_drag(&mut self, fraction: f64) {
        self.seek_drag
            .update(gesture::seek_position(self.duration(), fraction));
    }

    /// Finish a seek drag; the prediction jumps to the target right away.
    pub fn release_seek_drag(&mut self, now: Instant) -> Option<ControlCmd> {
        let target = self.seek_drag.release()?;
        let playing = self.status() == PlayerStatus::Playing;
        self.predictor.sync(target, self.duration(), playing, now);
        Some(ControlCmd::Seek(target))
    }

    pub fn begin_volume_drag(&mut self, fraction: f64) -> bool {
        if self.player.is_none() {
            return false;
        }
        self.volume_drag.begin(gesture::volume_level(fraction));
        true
    }

    pub fn update_volume_drag(&mut self, fraction: f64) {
        self.volume_drag.update(gesture::volume_level(fraction));
    }

    pub fn release_volume_drag(&mut self) -> Option<ControlCmd> {
        self.volume_drag.release().map(ControlCmd::Volume)
    }

    /// Drop any half-finished drag without sending anything.
    pub fn cancel_drags(&mut self) {
        self.seek_drag.cancel();
        self.volume_drag.cancel();
    }

    pub fn scroll_lyrics(&mut self, lines: i32, now: Instant) {
        self.highlighter.scroll_by(lines, self.lyrics.len(), now);
    }

    /// Seek to the lyric line rendered on `row` of the lyric pane.
    pub fn seek_to_lyric_row(&mut self, row: u16, now: Instant) -> Option<ControlCmd> {
        self.highlighter.interact(now);
        let index = self
            .highlighter
            .line_at_row(row, self.lyric_viewport, self.lyrics.len())?;
        let line = self.lyrics.get(index)?;
        Some(ControlCmd::Seek(line.timestamp))
    }
}
