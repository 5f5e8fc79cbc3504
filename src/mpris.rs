//! MPRIS bridge: lets media keys and `playerctl` drive the remote player.
//!
//! Calls on the bus become `MediaKey`s for the event loop; properties mirror
//! the latest snapshot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::remote::{PlayerState, PlayerStatus};

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.reprise";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaKey {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    status: PlayerStatus,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    /// Mirror a remote snapshot.
    pub fn set_player(&self, player: &PlayerState) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        s.status = player.status;
        s.title = non_empty(&player.track_name);
        s.artist = non_empty(&player.artist_name).into_iter().collect();
        s.album = non_empty(&player.album_name);
        s.art_url = non_empty(&player.cover_url);
        s.length_micros = (player.duration > 0.0).then(|| (player.duration * 1_000_000.0) as i64);
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

struct RootIface {
    tx: Sender<MediaKey>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(MediaKey::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "reprise"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<MediaKey>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(MediaKey::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(MediaKey::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(MediaKey::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(MediaKey::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(MediaKey::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(MediaKey::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.status {
            PlayerStatus::Playing => "Playing",
            PlayerStatus::Paused => "Paused",
            PlayerStatus::Stopped | PlayerStatus::Error => "Stopped",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Value<'_>| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };

        if let Ok(path) = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/current") {
            put("mpris:trackid", Value::from(path));
        }
        put(
            "xesam:title",
            Value::from(s.title.clone().unwrap_or_default()),
        );
        if !s.artist.is_empty() {
            put("xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(album) = &s.album {
            put("xesam:album", Value::from(album.clone()));
        }
        if let Some(url) = &s.art_url {
            put("mpris:artUrl", Value::from(url.clone()));
        }
        if let Some(len) = s.length_micros {
            put("mpris:length", Value::from(len));
        }
        map
    }
}

/// Publish the bridge on the session bus. With `enabled == false` the handle
/// only records state.
pub fn spawn_mpris(tx: Sender<MediaKey>, enabled: bool) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    if !enabled {
        return MprisHandle { state };
    }

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "MPRIS: failed to connect to session bus");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!(error = %e, "MPRIS: failed to acquire name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!(error = %e, "MPRIS: failed to register root iface");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!(error = %e, "MPRIS: failed to register player iface");
                return;
            }
            info!(bus = BUS_NAME, "MPRIS bridge registered");

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}

#[cfg(test)]
mod tests;
