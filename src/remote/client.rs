use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedSender, error::SendError};
use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::config::RemoteSettings;

use super::api::HttpApi;
use super::error::RemoteError;
use super::session::{Session, SessionCmd};
use super::types::{ControlCmd, RemoteEvent};

/// Handle to the remote session thread.
///
/// The session runs on its own thread with a single-threaded `tokio`
/// runtime. Snapshots, lyrics and notices come back over `events`.
pub struct RemoteClient {
    tx: UnboundedSender<SessionCmd>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RemoteClient {
    pub fn spawn(
        settings: &RemoteSettings,
        events: Sender<RemoteEvent>,
    ) -> Result<Self, RemoteError> {
        let api = Arc::new(HttpApi::new(settings)?);
        let backoff = Duration::from_millis(settings.reconnect_backoff_ms);

        let (tx, rx) = mpsc::unbounded_channel::<SessionCmd>();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let join = thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!(error = %e, "failed to start remote runtime");
                    let _ = events.send(RemoteEvent::Notice(format!(
                        "Cannot start network runtime: {e}"
                    )));
                    return;
                }
            };

            runtime.block_on(async move {
                tokio::select! {
                    _ = Session::new(api, events, backoff).run(rx) => {}
                    _ = shutdown_rx => debug!("remote session shutting down"),
                }
            });
        });

        Ok(Self {
            tx,
            shutdown: Mutex::new(Some(shutdown_tx)),
            join: Mutex::new(Some(join)),
        })
    }

    pub fn send(&self, cmd: ControlCmd) -> Result<(), SendError<SessionCmd>> {
        self.tx.send(SessionCmd::Control(cmd))
    }

    /// Re-poll the full player status.
    pub fn refresh(&self) -> Result<(), SendError<SessionCmd>> {
        self.tx.send(SessionCmd::Refresh)
    }

    /// Stop the session and wait for its thread. In-flight requests are dropped.
    pub fn shutdown(&self) {
        if let Ok(mut s) = self.shutdown.lock() {
            if let Some(tx) = s.take() {
                let _ = tx.send(());
            }
        }

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
