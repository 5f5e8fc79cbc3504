//! The remote state session: bootstrap poll, status stream, reconnect loop.
//!
//! One session runs for the lifetime of the UI. It owns the state
//! accumulator, turns every stream event into a full snapshot for the UI,
//! fetches lyrics whenever the song changes and forwards control requests.
//! A dropped stream is closed, then retried after a fixed backoff, forever.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::lyrics::{self, LyricTrack};

use super::api::PlayerApi;
use super::sse::SseEvent;
use super::state::{StateAccumulator, Update, decode_payload};
use super::types::{ControlCmd, RemoteEvent, STREAM_FIELDS, UpdateCause};

/// Requests from the UI to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCmd {
    Control(ControlCmd),
    /// Re-poll the full status and re-fetch lyrics without touching the stream.
    Refresh,
}

enum Flow {
    Reconnect,
    Shutdown,
}

pub struct Session<A: PlayerApi> {
    api: Arc<A>,
    events: Sender<RemoteEvent>,
    backoff: Duration,
    state: StateAccumulator,
    /// Bumped whenever lyrics are superseded; a fetch only reports if its
    /// generation is still current when it completes.
    lyric_generation: Arc<AtomicU64>,
    /// Set after a failed poll so repeated failures only notify once.
    bootstrap_failed: bool,
}

impl<A: PlayerApi> Session<A> {
    pub fn new(api: Arc<A>, events: Sender<RemoteEvent>, backoff: Duration) -> Self {
        Self {
            api,
            events,
            backoff,
            state: StateAccumulator::default(),
            lyric_generation: Arc::new(AtomicU64::new(0)),
            bootstrap_failed: false,
        }
    }

    /// Run until `commands` is closed.
    pub async fn run(mut self, mut commands: UnboundedReceiver<SessionCmd>) {
        loop {
            self.bootstrap().await;

            match self.api.subscribe().await {
                Ok(mut stream) => {
                    info!("status stream connected");
                    self.emit(RemoteEvent::Connected);

                    let reason = loop {
                        tokio::select! {
                            ev = stream.next() => match ev {
                                Some(Ok(ev)) => self.on_stream_event(ev),
                                Some(Err(e)) => break e.to_string(),
                                None => break "stream closed by server".to_string(),
                            },
                            cmd = commands.recv() => match cmd {
                                Some(cmd) => self.on_command(cmd).await,
                                None => return,
                            },
                        }
                    };

                    // The old connection is gone before a new one is attempted.
                    drop(stream);
                    warn!(%reason, "status stream lost");
                    self.emit(RemoteEvent::Disconnected { reason });
                }
                Err(e) => {
                    warn!(error = %e, "failed to open status stream");
                    self.emit(RemoteEvent::Disconnected {
                        reason: e.to_string(),
                    });
                }
            }

            match self.wait_backoff(&mut commands).await {
                Flow::Reconnect => debug!(backoff = ?self.backoff, "reconnecting"),
                Flow::Shutdown => return,
            }
        }
    }

    async fn bootstrap(&mut self) {
        match self.api.fetch_status().await {
            Ok(status) => {
                self.bootstrap_failed = false;
                let update = self.state.apply_bootstrap(status);
                self.publish(update, UpdateCause::Bootstrap);
            }
            Err(e) => {
                warn!(error = %e, "status poll failed");
                if !self.bootstrap_failed {
                    self.bootstrap_failed = true;
                    self.emit(RemoteEvent::Notice(format!("Cannot reach player: {e}")));
                }
            }
        }
    }

    fn on_stream_event(&mut self, ev: SseEvent) {
        let SseEvent { event, data } = ev;
        if !STREAM_FIELDS.contains(&event.as_str()) {
            debug!(%event, "ignoring unrequested stream event");
            return;
        }

        let value = decode_payload(&data);
        if event == "lyric" {
            if let Some(text) = value.as_str().filter(|t| !t.trim().is_empty()) {
                // Pushed lyrics win over a fetch that is still in flight.
                self.lyric_generation.fetch_add(1, Ordering::SeqCst);
                self.emit(RemoteEvent::Lyrics(lyrics::parse(text)));
            }
        }

        let update = self.state.apply_update(&event, value);
        self.publish(update, UpdateCause::Field(event));
    }

    async fn on_command(&mut self, cmd: SessionCmd) {
        match cmd {
            SessionCmd::Control(cmd) => self.dispatch(cmd),
            SessionCmd::Refresh => {
                let generation = self.lyric_generation.load(Ordering::SeqCst);
                self.bootstrap().await;
                // A song change already started a fetch; otherwise retry the current song's.
                if self.lyric_generation.load(Ordering::SeqCst) == generation {
                    self.fetch_lyrics();
                }
            }
        }
    }

    async fn wait_backoff(&mut self, commands: &mut UnboundedReceiver<SessionCmd>) -> Flow {
        let sleep = tokio::time::sleep(self.backoff);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return Flow::Reconnect,
                cmd = commands.recv() => match cmd {
                    Some(cmd) => self.on_command(cmd).await,
                    None => return Flow::Shutdown,
                },
            }
        }
    }

    fn publish(&mut self, update: Update, cause: UpdateCause) {
        if update.song_changed {
            debug!(identity = %update.snapshot.track_identity(), "song changed");
            self.fetch_lyrics();
        }
        self.emit(RemoteEvent::Snapshot {
            state: update.snapshot,
            cause,
        });
    }

    /// Fetch the full lyrics out of band, superseding any fetch still running.
    fn fetch_lyrics(&mut self) {
        let generation = Arc::clone(&self.lyric_generation);
        let mine = generation.fetch_add(1, Ordering::SeqCst) + 1;
        let api = Arc::clone(&self.api);
        let events = self.events.clone();

        tokio::spawn(async move {
            let track = match api.fetch_lyric().await {
                Ok(text) => lyrics::parse(&text),
                Err(e) => {
                    debug!(error = %e, "lyric fetch failed");
                    LyricTrack::default()
                }
            };
            if generation.load(Ordering::SeqCst) != mine {
                debug!("discarding superseded lyrics");
                return;
            }
            info!(lines = track.len(), "lyrics loaded");
            let _ = events.send(RemoteEvent::Lyrics(track));
        });
    }

    /// Send a control request on its own task; failures become a notice, never a retry.
    fn dispatch(&self, cmd: ControlCmd) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            debug!(action = cmd.action(), "sending control request");
            if let Err(e) = api.control(&cmd).await {
                warn!(action = cmd.action(), error = %e, "control request failed");
                let _ = events.send(RemoteEvent::Notice(format!(
                    "{} failed: {e}",
                    cmd.action()
                )));
            }
        });
    }

    fn emit(&self, event: RemoteEvent) {
        // The UI may already be gone during shutdown.
        let _ = self.events.send(event);
    }
}
