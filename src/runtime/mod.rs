use std::env;
use std::sync::mpsc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::mpris::MediaKey;
use crate::remote::{RemoteClient, RemoteEvent};

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = settings::load_settings();
    let print_config = settings::apply_args(&mut settings, env::args().skip(1))?;
    if print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    logging::init(&settings.logging);
    info!(base_url = %settings.remote.base_url, "starting reprise");

    let (event_tx, event_rx) = mpsc::channel::<RemoteEvent>();
    let client = RemoteClient::spawn(&settings.remote, event_tx)?;

    let (media_tx, media_rx) = mpsc::channel::<MediaKey>();
    let mpris = crate::mpris::spawn_mpris(media_tx, settings.mpris.enabled);

    let mut app = App::new(&settings);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &client,
            &mpris,
            &event_rx,
            &media_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    client.shutdown();
    info!("stopped");

    run_result
}
