/// One timed lyric line.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Start time in seconds.
    pub timestamp: f64,
    pub text: String,
}

/// A parsed set of lyric lines, sorted ascending by timestamp.
///
/// Lines sharing a timestamp keep the order they were encountered in. A track
/// is replaced wholesale on every song change, never edited in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricTrack {
    lines: Vec<LyricLine>,
}

impl LyricTrack {
    /// Build a track from lines, stably sorting them by timestamp.
    pub fn new(mut lines: Vec<LyricLine>) -> Self {
        lines.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Self { lines }
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn get(&self, index: usize) -> Option<&LyricLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the last line whose timestamp is `<= progress`.
    ///
    /// Returns `None` before the first line (or for an empty track).
    pub fn active_index(&self, progress: f64) -> Option<usize> {
        let after = self.lines.partition_point(|l| l.timestamp <= progress);
        after.checked_sub(1)
    }
}
