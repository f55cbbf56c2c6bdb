mod app;
mod theme;
mod ui;

pub use app::App;

use std::io::stdout;
use std::panic;
use std::sync::Arc;

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use crate::api::ApiClient;

/// Drop guard that restores terminal state when dropped.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
    }
}

pub async fn run(client: ApiClient) -> Result<()> {
    info!(api_url = client.base_url(), "starting tui");

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    // Install panic hook that restores terminal before printing the panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Arc::new(client));
    let result = app.run(&mut terminal).await;

    // Restore the original panic hook before returning
    let _ = panic::take_hook();

    result
}
