//! Transport for the remote player's HTTP + SSE API.
//!
//! `PlayerApi` is the seam the session loop talks through; `HttpApi` is the
//! real `reqwest` implementation.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures_util::{Stream, StreamExt, stream};
use reqwest::{Client, Response, Url, header};
use serde_json::{Map, Value};

use crate::config::RemoteSettings;

use super::error::RemoteError;
use super::sse::{SseDecoder, SseEvent};
use super::types::{ControlCmd, STREAM_FIELDS};

/// An open status stream. Dropping it closes the connection.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<SseEvent, RemoteError>> + Send>>;

pub trait PlayerApi: Send + Sync + 'static {
    /// `GET /status`: every field at once.
    fn fetch_status(&self)
    -> impl Future<Output = Result<Map<String, Value>, RemoteError>> + Send;

    /// `GET /lyric`: the full timed-lyric text of the current song.
    fn fetch_lyric(&self) -> impl Future<Output = Result<String, RemoteError>> + Send;

    /// Open the per-field status stream for `STREAM_FIELDS`.
    fn subscribe(&self) -> impl Future<Output = Result<EventStream, RemoteError>> + Send;

    /// `POST /{action}?{params}`.
    fn control(&self, cmd: &ControlCmd) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

pub struct HttpApi {
    client: Client,
    base: Url,
    request_timeout: Duration,
}

impl HttpApi {
    pub fn new(settings: &RemoteSettings) -> Result<Self, RemoteError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|e| RemoteError::InvalidUrl(format!("{}: {e}", settings.base_url)))?;

        // No overall timeout on the client: the status stream stays open indefinitely.
        let client = Client::builder()
            .user_agent(concat!("reprise/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_millis(settings.connect_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base,
            request_timeout: Duration::from_millis(settings.request_timeout_ms),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base
            .join(path)
            .map_err(|e| RemoteError::InvalidUrl(format!("{path}: {e}")))
    }
}

fn check(what: &str, resp: Response) -> Result<Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(RemoteError::Status {
            what: what.to_string(),
            status: status.as_u16(),
        })
    }
}

impl PlayerApi for HttpApi {
    async fn fetch_status(&self) -> Result<Map<String, Value>, RemoteError> {
        let url = self.endpoint("status")?;
        let resp = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await?;
        let body = check("status", resp)?.text().await?;

        match serde_json::from_str::<Value>(&body)? {
            Value::Object(map) => Ok(map),
            _ => Err(RemoteError::NotAnObject),
        }
    }

    async fn fetch_lyric(&self) -> Result<String, RemoteError> {
        let url = self.endpoint("lyric")?;
        let resp = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await?;
        Ok(check("lyric", resp)?.text().await?)
    }

    async fn subscribe(&self) -> Result<EventStream, RemoteError> {
        let mut url = self.endpoint("subscribe-player-status")?;
        // Field names are plain ASCII; keep the commas unescaped.
        url.set_query(Some(&format!("filter={}", STREAM_FIELDS.join(","))));

        let resp = self
            .client
            .get(url)
            .header(header::ACCEPT, "text/event-stream")
            .send()
            .await?;
        let bytes = Box::pin(check("subscribe", resp)?.bytes_stream());

        let events = stream::unfold(
            (bytes, SseDecoder::default(), VecDeque::new()),
            |(mut bytes, mut decoder, mut pending)| async move {
                loop {
                    if let Some(ev) = pending.pop_front() {
                        return Some((Ok(ev), (bytes, decoder, pending)));
                    }
                    match bytes.next().await {
                        Some(Ok(chunk)) => pending.extend(decoder.feed(&chunk)),
                        Some(Err(e)) => {
                            return Some((Err(RemoteError::from(e)), (bytes, decoder, pending)));
                        }
                        None => return None,
                    }
                }
            },
        );
        Ok(Box::pin(events))
    }

    async fn control(&self, cmd: &ControlCmd) -> Result<(), RemoteError> {
        let mut url = self.endpoint(cmd.action())?;
        let params = cmd.params();
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &params {
                pairs.append_pair(k, v);
            }
        }

        let resp = self
            .client
            .post(url)
            .timeout(self.request_timeout)
            .send()
            .await?;
        check(cmd.action(), resp)?;
        Ok(())
    }
}
