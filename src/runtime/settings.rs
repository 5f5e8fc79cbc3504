use crate::config;

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("reprise: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("reprise: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}

/// Apply command line arguments on top of the loaded settings.
///
/// Returns `Ok(true)` when the effective config should be printed instead of
/// starting the UI.
pub fn apply_args<I>(settings: &mut config::Settings, args: I) -> Result<bool, String>
where
    I: IntoIterator<Item = String>,
{
    let mut print_config = false;
    for arg in args {
        match arg.as_str() {
            "--print-config" => print_config = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            url => {
                config::validate_base_url(url)?;
                settings.remote.base_url = url.to_string();
            }
        }
    }
    Ok(print_config)
}
