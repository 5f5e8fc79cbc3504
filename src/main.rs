mod app;
mod config;
mod lyrics;
mod mpris;
mod progress;
mod remote;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
