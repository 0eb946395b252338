use anyhow::Result;
use forum_core::Config;
use tracing::info;

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[tokio::main]
async fn main() -> Result<()> {
    let log_path = logging::init();
    info!(version = env!("CARGO_PKG_VERSION"), log = ?log_path, "starting hacker-forum");

    let (config, config_path) = Config::load();
    let store = config.store_client()?;
    info!(endpoint = %store.endpoint(), "using message store");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let mut app = App::new(config, config_path, store, events.sender());
    app.start_load();

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    info!("exiting");
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}
