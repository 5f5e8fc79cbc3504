use super::load::{default_config_path, default_log_path, resolve_config_path, validate_base_url};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_reprise_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("REPRISE_CONFIG_PATH", "/tmp/reprise-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/reprise-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("reprise")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("reprise")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_falls_back_to_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/reprise/reprise.log")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[remote]
base_url = "http://192.168.1.100:23330"
reconnect_backoff_ms = 1500

[controls]
seek_step_seconds = 9
volume_step = 10

[ui]
blur = false
header_text = "hello"
now_playing_fields = ["singer", "title"]
now_playing_separator = " • "
time_fields = ["elapsed", "remaining"]
time_separator = " | "

[lyrics]
auto_scroll_resume_ms = 2000
placeholder = ["nothing yet"]

[logging]
level = "debug"
file = "/tmp/reprise.log"

[mpris]
enabled = false
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("REPRISE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("REPRISE__REMOTE__BASE_URL");

    let s = Settings::load().unwrap();
    assert_eq!(s.remote.base_url, "http://192.168.1.100:23330");
    assert_eq!(s.remote.reconnect_backoff_ms, 1500);
    assert_eq!(s.remote.request_timeout_ms, 5000);
    assert_eq!(s.controls.seek_step_seconds, 9);
    assert_eq!(s.controls.volume_step, 10);
    assert!(!s.ui.blur);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(
        s.ui.now_playing_fields,
        vec![TrackDisplayField::Artist, TrackDisplayField::Title]
    );
    assert_eq!(s.ui.now_playing_separator, " • ");
    assert_eq!(s.ui.time_fields, vec![TimeField::Elapsed, TimeField::Remaining]);
    assert_eq!(s.ui.time_separator, " | ");
    assert_eq!(s.lyrics.auto_scroll_resume_ms, 2000);
    assert_eq!(s.lyrics.placeholder, vec!["nothing yet".to_string()]);
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file.as_deref(),
        Some(std::path::Path::new("/tmp/reprise.log"))
    );
    assert!(!s.mpris.enabled);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[remote]
reconnect_backoff_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("REPRISE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("REPRISE__REMOTE__RECONNECT_BACKOFF_MS", "4000");

    let s = Settings::load().unwrap();
    assert_eq!(s.remote.reconnect_backoff_ms, 4000);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "REPRISE_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );

    let s = Settings::load().unwrap();
    assert_eq!(s.remote.base_url, "http://127.0.0.1:23330");
    assert_eq!(s.remote.reconnect_backoff_ms, 3000);
    assert!(s.ui.blur);
    assert!(s.validate().is_ok());
}

#[test]
fn base_url_needs_scheme_host_and_port() {
    assert!(validate_base_url("http://192.168.1.100:23330").is_ok());
    assert!(validate_base_url("https://player.local:443").is_ok());
    assert!(validate_base_url("192.168.1.100:23330").is_err());
    assert!(validate_base_url("http://192.168.1.100").is_err());
    assert!(validate_base_url("ftp://host:21").is_err());
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.controls.volume_step = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = 101;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.remote.reconnect_backoff_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.logging.level = "loud".to_string();
    assert!(s.validate().is_err());
}

#[test]
fn printed_config_reloads_to_the_same_values() {
    let mut s = Settings::default();
    s.remote.base_url = "http://10.0.0.2:23330".to_string();
    s.ui.time_fields = vec![TimeField::Remaining];

    let text = s.to_toml().unwrap();
    let back: Settings = toml::from_str(&text).unwrap();
    assert_eq!(back.remote.base_url, "http://10.0.0.2:23330");
    assert_eq!(back.ui.time_fields, vec![TimeField::Remaining]);
    assert!(back.logging.file.is_none());
}
