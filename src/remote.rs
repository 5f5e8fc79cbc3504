//! Client for the remote player's HTTP + SSE API.
//!
//! `RemoteClient` owns a background session that keeps one coherent
//! `PlayerState` in sync with the player and reports it to the UI as
//! `RemoteEvent`s; control requests travel the other way.

mod api;
mod client;
mod error;
mod session;
mod sse;
mod state;
mod types;

pub use client::RemoteClient;
pub use error::RemoteError;
pub use types::*;
