//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`, and the
//! layout used for mouse hit-testing.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Instant};

use crate::app::{self, App, Connection};
use crate::config::Settings;
use crate::lyrics::{LyricSource, lyric_source, padding_rows};
use crate::remote::PlayerStatus;

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next song".to_string());
    // H/L and -/+ are filled dynamically from config.
    map.insert("m".to_string(), "mute".to_string());
    map.insert("s".to_string(), "shuffle".to_string());
    map.insert("r".to_string(), "repeat".to_string());
    map.insert("j/k".to_string(), "scroll lyrics".to_string());
    map.insert("b".to_string(), "blur".to_string());
    map.insert("R".to_string(), "refresh".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating the configured steps.
fn controls_text(seek_step: u64, volume_step: u8) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "space/p", "h/l", "H/L", "-/+", "m", "s", "r", "j/k", "b", "R", "q",
    ];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!("[H/L] seek -/+{}s", seek_step)),
            "-/+" => Some(format!("[-/+] volume -/+{}", volume_step)),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Screen regions, shared by drawing and mouse handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub now_playing: Rect,
    /// Progress bar block; `progress_bar` is its clickable inside.
    pub progress: Rect,
    pub progress_bar: Rect,
    pub volume: Rect,
    pub volume_bar: Rect,
    pub lyrics: Rect,
    /// Rows the lyric lines are drawn in.
    pub lyrics_view: Rect,
    pub footer: Rect,
}

impl Areas {
    pub fn hit_progress(&self, column: u16, row: u16) -> bool {
        self.progress_bar.contains(Position::new(column, row))
    }

    pub fn hit_volume(&self, column: u16, row: u16) -> bool {
        self.volume_bar.contains(Position::new(column, row))
    }

    /// Row inside the lyric view, if the point is on it.
    pub fn lyric_row(&self, column: u16, row: u16) -> Option<u16> {
        self.lyrics_view
            .contains(Position::new(column, row))
            .then(|| row - self.lyrics_view.y)
    }
}

/// Split the terminal into the UI regions.
pub fn areas(rect: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(rect);

    let bars = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(chunks[2]);

    let bordered = Block::default().borders(Borders::ALL);
    Areas {
        header: chunks[0],
        now_playing: chunks[1],
        progress: bars[0],
        progress_bar: bordered.inner(bars[0]),
        volume: bars[1],
        volume_bar: bordered.inner(bars[1]),
        lyrics: chunks[3],
        lyrics_view: bordered.inner(chunks[3]),
        footer: chunks[4],
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Build the lines of the lyric pane, padding included.
fn lyric_lines<'a>(app: &'a App, settings: &'a Settings, viewport: u16) -> Vec<Line<'a>> {
    let pad = usize::from(padding_rows(viewport));
    let mut lines: Vec<Line> = vec![Line::from(""); pad];

    let current_line = app.player.as_ref().map(|p| p.current_lyric_line.as_str());
    match lyric_source(&app.lyrics, current_line) {
        LyricSource::Track(track) => {
            let active = app.highlighter.active();
            for (i, line) in track.lines().iter().enumerate() {
                let style = if Some(i) == active {
                    Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else if app.blur {
                    Style::default().add_modifier(Modifier::DIM)
                } else {
                    Style::default()
                };
                lines.push(Line::styled(line.text.as_str(), style));
            }
        }
        LyricSource::CurrentLine(text) => {
            lines.push(Line::styled(text, Style::default().add_modifier(Modifier::BOLD)));
            // The full line may carry a translation under the lyric.
            if let Some(player) = &app.player {
                let all = player.current_lyric_all_text.trim();
                if !all.is_empty() && all != text.trim() {
                    for extra in all.lines().filter(|l| l.trim() != text.trim()) {
                        lines.push(Line::styled(extra, Style::default().add_modifier(Modifier::DIM)));
                    }
                }
            }
        }
        LyricSource::Placeholder => {
            for text in &settings.lyrics.placeholder {
                lines.push(Line::styled(
                    text.as_str(),
                    Style::default().add_modifier(Modifier::DIM),
                ));
            }
        }
    }

    lines.extend(std::iter::repeat_n(Line::from(""), pad));
    lines
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, layout: &Areas, settings: &Settings) {
    let ui_settings = &settings.ui;

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" reprise ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, layout.header);

    // Now playing box
    let (song, mut details) = match &app.player {
        Some(player) => {
            let song = app::now_playing_text(
                player,
                &ui_settings.now_playing_fields,
                &ui_settings.now_playing_separator,
            );
            let mut parts: Vec<String> = vec![player.status.label().to_string()];
            if player.playback_rate > 0.0 && (player.playback_rate - 1.0).abs() > f64::EPSILON {
                parts.push(format!("{:.2}x", player.playback_rate));
            }
            if !player.album_name.trim().is_empty() {
                parts.push(format!("Album: {}", player.album_name.trim()));
            }
            if player.collected {
                parts.push("♥".to_string());
            }
            (song, parts)
        }
        None => ("Nothing playing".to_string(), Vec::new()),
    };
    match &app.connection {
        Connection::Disconnected(reason) => {
            details.push(format!("{} ({reason})", app.connection.label()))
        }
        other => details.push(other.label().to_string()),
    }

    let status_par = Paragraph::new(vec![
        Line::from(song).bold(),
        Line::from(details.join(" • ")),
    ])
    .block(
        Block::bordered()
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            })
            .title(" now playing "),
    );
    frame.render_widget(status_par, layout.now_playing);

    // Progress bar
    let progress = app.displayed_progress();
    let duration = app.duration();
    let ratio = if duration > 0.0 {
        (progress / duration).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let label = app::time_text(
        progress,
        duration,
        &ui_settings.time_fields,
        &ui_settings.time_separator,
    )
    .unwrap_or_default();
    let progress_title = if app.seek_drag.is_active() {
        " seek (release to apply) "
    } else {
        " progress "
    };
    let gauge_style = if app.predictor.is_ticking() || app.seek_drag.is_active() {
        Style::default()
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    let gauge = Gauge::default()
        .block(Block::bordered().title(progress_title))
        .gauge_style(gauge_style)
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, layout.progress);

    // Volume bar
    let volume = app.displayed_volume();
    let volume_label = if app.muted() {
        format!("{volume}% (muted)")
    } else {
        format!("{volume}%")
    };
    let volume_gauge = Gauge::default()
        .block(Block::bordered().title(" volume "))
        .ratio(f64::from(volume.min(100)) / 100.0)
        .label(volume_label);
    frame.render_widget(volume_gauge, layout.volume);

    // Lyrics
    let viewport = layout.lyrics_view.height;
    let lyrics_title = match app.status() {
        PlayerStatus::Error => " lyrics (player error) ",
        _ if app.highlighter.auto_scroll_enabled(Instant::now()) => " lyrics ",
        _ => " lyrics (auto-scroll paused) ",
    };
    let lyrics = Paragraph::new(lyric_lines(app, settings, viewport))
        .alignment(Alignment::Center)
        .scroll((app.highlighter.offset(), 0))
        .block(Block::default().borders(Borders::ALL).title(lyrics_title));
    frame.render_widget(lyrics, layout.lyrics);

    // Notice popup over the lyrics
    if let Some(text) = app.notice() {
        let width = u16::try_from(text.chars().count() + 4).unwrap_or(u16::MAX);
        let popup_area = centered_rect_sized(width, 3, layout.lyrics);
        frame.render_widget(Clear, popup_area);
        let notice = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" notice "))
            .wrap(Wrap { trim: true });
        frame.render_widget(notice, popup_area);
    }

    let footer_text = controls_text(
        settings.controls.seek_step_seconds,
        settings.controls.volume_step,
    );
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, layout.footer);
}
