//! Drag gestures on the progress and volume bars.
//!
//! While a drag is in progress only the preview moves; the single control
//! request goes out on release.

/// A press-drag-release interaction carrying a preview value.
#[derive(Debug, Clone, Copy)]
pub struct DragGesture<T> {
    preview: Option<T>,
}

impl<T> Default for DragGesture<T> {
    fn default() -> Self {
        Self { preview: None }
    }
}

impl<T: Copy> DragGesture<T> {
    pub fn begin(&mut self, value: T) {
        self.preview = Some(value);
    }

    /// Move the preview. Ignored when no drag is active.
    pub fn update(&mut self, value: T) {
        if self.preview.is_some() {
            self.preview = Some(value);
        }
    }

    /// Finish the drag, yielding the final value exactly once.
    pub fn release(&mut self) -> Option<T> {
        self.preview.take()
    }

    pub fn cancel(&mut self) {
        self.preview = None;
    }

    pub fn preview(&self) -> Option<T> {
        self.preview
    }

    pub fn is_active(&self) -> bool {
        self.preview.is_some()
    }
}

/// Horizontal position of `column` inside a bar starting at `x`, as a fraction in [0, 1].
pub fn fraction_at(column: u16, x: u16, width: u16) -> f64 {
    let span = f64::from(width.saturating_sub(1).max(1));
    (f64::from(column.saturating_sub(x)) / span).clamp(0.0, 1.0)
}

/// Seek target for a bar fraction.
pub fn seek_position(duration: f64, fraction: f64) -> f64 {
    duration.max(0.0) * fraction.clamp(0.0, 1.0)
}

/// Volume level for a bar fraction.
pub fn volume_level(fraction: f64) -> u8 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}
