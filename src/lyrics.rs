//! Timed lyrics.
//!
//! `parse` turns a timed-lyric text blob into a sorted `LyricTrack`; the
//! highlighter maps the displayed playback position onto the active line and
//! drives the lyric pane's auto-scroll.

mod highlight;
mod model;
mod parse;

pub use highlight::*;
pub use model::*;
pub use parse::parse;

#[cfg(test)]
mod tests;
