// TUI module for the interactive page studio
mod app;
mod events;
mod layout;
mod rendering;
mod timestamps;

use std::io;
use std::sync::Arc;

use anyhow::Result;
pub use app::App;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::gateway::{AiGateway, GatewayConfig, HttpGateway};
use crate::preview::PreviewManager;
use crate::store::HistoryStore;
use crate::utils::{get_data_dir, get_previews_dir};

/// Run the interactive studio.
///
/// A misconfigured gateway does not abort the session: the studio starts
/// with a banner and history browsing still works.
pub fn run_interactive(config: GatewayConfig) -> Result<()> {
    let data_dir = get_data_dir()?;
    let store = HistoryStore::load_or_default(&data_dir);
    let previews = PreviewManager::new(get_previews_dir()?);

    let (gateway, gateway_error): (Option<Arc<dyn AiGateway>>, Option<String>) =
        match HttpGateway::from_config(config) {
            Ok(gateway) => (Some(Arc::new(gateway)), None),
            Err(e) => (None, Some(format!("{}", e))),
        };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(gateway, gateway_error, store, previews);

    // Run event loop
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
