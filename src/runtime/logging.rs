use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing::Level;

use crate::config::{self, LoggingSettings};

/// Send `tracing` output to the log file; the terminal belongs to the UI.
///
/// Logging is best effort: when the file cannot be opened the app runs without it.
pub fn init(settings: &LoggingSettings) {
    let Some(path) = settings.file.clone().or_else(config::default_log_path) else {
        return;
    };

    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("reprise: cannot create log directory {}: {e}", dir.display());
            return;
        }
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("reprise: cannot open log file {}: {e}", path.display());
            return;
        }
    };

    let level = settings.level.parse::<Level>().unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init();
}
