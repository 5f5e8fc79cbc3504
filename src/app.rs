//! Application module: the model behind the TUI and the gesture helpers.
//!
//! The `App` model lives in `app::model`; it mirrors the remote player and
//! turns key presses and drags into `ControlCmd`s.

mod display;
pub mod gesture;
mod model;

pub use display::*;
pub use model::*;
