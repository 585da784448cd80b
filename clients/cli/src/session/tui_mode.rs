//! TUI mode execution

use super::SessionData;
use crate::cli_messages::print_success;
use crate::print_cmd_info;
use crate::ui::{self, UIConfig};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{error::Error, io};

/// Runs the shell in the terminal until the user quits.
///
/// The terminal is restored before the result of the UI loop is returned.
pub async fn run_tui_mode(data: SessionData, with_background: bool) -> Result<(), Box<dyn Error>> {
    let profile = &data.session.profile;
    print_cmd_info!("Iniciando sesión", "{} ({})", profile.username, profile.rol);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = ui::App::new(
        data.session,
        data.event_receiver,
        UIConfig::new(with_background),
    );

    let result = ui::run(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;

    print_success("Sesión cerrada", "");
    Ok(())
}
