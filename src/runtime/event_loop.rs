use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::{App, gesture};
use crate::config;
use crate::mpris::{MediaKey, MprisHandle};
use crate::remote::{ControlCmd, RemoteClient, RemoteEvent};
use crate::runtime::mpris_sync::{media_key_command, update_mpris};
use crate::ui::{self, Areas};

/// Which bar a mouse drag started on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DragTarget {
    Seek,
    Volume,
}

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Layout of the last drawn frame, used for mouse hit-testing.
    pub layout: Areas,
    drag: Option<DragTarget>,
}

/// Main terminal event loop: applies remote events, draws, and turns input
/// into control requests. Returns `Ok(())` when shutdown is requested.
#[allow(clippy::too_many_arguments)]
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    client: &RemoteClient,
    mpris: &MprisHandle,
    events: &mpsc::Receiver<RemoteEvent>,
    media_keys: &mpsc::Receiver<MediaKey>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let now = Instant::now();

        let mut player_changed = false;
        while let Ok(event) = events.try_recv() {
            player_changed |= matches!(event, RemoteEvent::Snapshot { .. });
            app.apply_event(event, now);
        }
        // Keep MPRIS in sync with whatever the remote player did on its own.
        if player_changed {
            update_mpris(mpris, app);
        }

        terminal.draw(|f| {
            state.layout = ui::areas(f.area());
            app.tick(now, state.layout.lyrics_view.height);
            ui::draw(f, app, &state.layout, settings);
        })?;

        while let Ok(key) = media_keys.try_recv() {
            match media_key_command(&key, app) {
                Some(cmd) => send(client, cmd),
                None => return Ok(()),
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(key, app, client, state) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, app, client, state),
                _ => {}
            }
        }
    }

    Ok(())
}

fn send(client: &RemoteClient, cmd: ControlCmd) {
    debug!(action = cmd.action(), "control request");
    if client.send(cmd).is_err() {
        warn!("remote session is gone; control request dropped");
    }
}

fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    client: &RemoteClient,
    state: &mut EventLoopState,
) -> bool {
    let now = Instant::now();
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Esc => {
            state.drag = None;
            app.cancel_drags();
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => send(client, app.play_toggle()),
        KeyCode::Char('l') => send(client, ControlCmd::SkipNext),
        KeyCode::Char('h') => send(client, ControlCmd::SkipPrev),
        KeyCode::Char('L') => {
            if let Some(cmd) = app.seek_step(true) {
                send(client, cmd);
            }
        }
        KeyCode::Char('H') => {
            if let Some(cmd) = app.seek_step(false) {
                send(client, cmd);
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            if let Some(cmd) = app.volume_step(true) {
                send(client, cmd);
            }
        }
        KeyCode::Char('-') => {
            if let Some(cmd) = app.volume_step(false) {
                send(client, cmd);
            }
        }
        KeyCode::Char('m') => {
            if let Some(cmd) = app.mute_toggle() {
                send(client, cmd);
            }
        }
        KeyCode::Char('s') => send(client, ControlCmd::Shuffle),
        KeyCode::Char('r') => send(client, ControlCmd::Repeat),
        KeyCode::Char('R') => {
            if client.refresh().is_err() {
                warn!("remote session is gone; refresh dropped");
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.scroll_lyrics(1, now),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_lyrics(-1, now),
        KeyCode::Char('b') => app.toggle_blur(),
        _ => {}
    }

    false
}

fn handle_mouse_event(
    mouse: MouseEvent,
    app: &mut App,
    client: &RemoteClient,
    state: &mut EventLoopState,
) {
    let now = Instant::now();
    let (column, row) = (mouse.column, mouse.row);
    let layout = state.layout;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if layout.hit_progress(column, row) {
                let bar = layout.progress_bar;
                if app.begin_seek_drag(gesture::fraction_at(column, bar.x, bar.width)) {
                    state.drag = Some(DragTarget::Seek);
                }
            } else if layout.hit_volume(column, row) {
                let bar = layout.volume_bar;
                if app.begin_volume_drag(gesture::fraction_at(column, bar.x, bar.width)) {
                    state.drag = Some(DragTarget::Volume);
                }
            } else if let Some(lyric_row) = layout.lyric_row(column, row) {
                if let Some(cmd) = app.seek_to_lyric_row(lyric_row, now) {
                    send(client, cmd);
                }
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => match state.drag {
            Some(DragTarget::Seek) => {
                let bar = layout.progress_bar;
                app.update_seek_drag(gesture::fraction_at(column, bar.x, bar.width));
            }
            Some(DragTarget::Volume) => {
                let bar = layout.volume_bar;
                app.update_volume_drag(gesture::fraction_at(column, bar.x, bar.width));
            }
            None => {}
        },
        MouseEventKind::Up(MouseButton::Left) => {
            let cmd = match state.drag.take() {
                Some(DragTarget::Seek) => app.release_seek_drag(now),
                Some(DragTarget::Volume) => app.release_volume_drag(),
                None => None,
            };
            if let Some(cmd) = cmd {
                send(client, cmd);
            }
        }
        MouseEventKind::ScrollDown if layout.lyric_row(column, row).is_some() => {
            app.scroll_lyrics(1, now);
        }
        MouseEventKind::ScrollUp if layout.lyric_row(column, row).is_some() => {
            app.scroll_lyrics(-1, now);
        }
        _ => {}
    }
}
