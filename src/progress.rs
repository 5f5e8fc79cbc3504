//! Local playback-position prediction between server pushes.
//!
//! The remote player only pushes `progress` occasionally. `ProgressPredictor`
//! advances a *displayed* position by one second per second while playing,
//! clamped at the track duration. The authoritative `PlayerState` is never
//! touched; every authoritative update restarts prediction from fresh values.

use std::time::{Duration, Instant};

/// Tick period of the predictor.
pub const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ProgressPredictor {
    displayed: f64,
    duration: f64,
    /// Deadline of the next tick; `None` when not ticking.
    next_tick: Option<Instant>,
}

impl Default for ProgressPredictor {
    fn default() -> Self {
        Self {
            displayed: 0.0,
            duration: 0.0,
            next_tick: None,
        }
    }
}

impl ProgressPredictor {
    /// Restart prediction from authoritative values, cancelling any running ticker.
    ///
    /// Ticking only starts when `playing` and the duration is known (`> 0`).
    pub fn sync(&mut self, progress: f64, duration: f64, playing: bool, now: Instant) {
        self.duration = sanitize(duration);
        self.displayed = sanitize(progress);
        if self.duration > 0.0 {
            self.displayed = self.displayed.min(self.duration);
        }

        self.next_tick = if playing && self.duration > 0.0 && self.displayed < self.duration {
            Some(now + TICK)
        } else {
            None
        };
    }

    /// Advance by one tick: +1s, clamped at duration. Reaching the clamp stops ticking.
    pub fn tick(&mut self) {
        if self.next_tick.is_none() {
            return;
        }
        self.displayed = (self.displayed + 1.0).min(self.duration);
        if self.displayed >= self.duration {
            self.next_tick = None;
        }
    }

    /// Fire every tick due at `now`. Returns `true` if the displayed value changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(deadline) = self.next_tick {
            if now < deadline {
                break;
            }
            self.tick();
            if let Some(next) = self.next_tick.as_mut() {
                *next = deadline + TICK;
            }
            changed = true;
        }
        changed
    }

    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_ticking(&self) -> bool {
        self.next_tick.is_some()
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests;
