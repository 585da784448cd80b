//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::events::Event as ActivityEvent;
use crate::session::Session;
use crate::ui::dashboard::{DashboardAction, DashboardState, SessionInfo, render_dashboard};
use crate::ui::splash::render_splash;
use crossterm::event::{self, Event, KeyCode};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
}

impl UIConfig {
    pub fn new(with_background_color: bool) -> Self {
        Self {
            with_background_color,
        }
    }
}

/// The different screens in the application.
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Shell with the mounted module.
    Dashboard(Box<DashboardState>),
}

/// Application state
pub struct App {
    /// Signed-in session the dashboard is built from.
    session: Session,

    /// The current screen being displayed in the application.
    current_screen: Screen,

    /// Receives activity entries from module screens.
    event_receiver: mpsc::Receiver<ActivityEvent>,

    ui_config: UIConfig,
}

impl App {
    pub fn new(
        session: Session,
        event_receiver: mpsc::Receiver<ActivityEvent>,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            session,
            current_screen: Screen::Splash,
            event_receiver,
            ui_config,
        }
    }

    /// Leaves the splash and mounts the role's default module.
    fn enter_dashboard(&mut self) {
        let state = DashboardState::new(
            self.session.backend.clone(),
            self.session.ctx.clone(),
            SessionInfo::from_profile(&self.session.profile),
            self.session.events.clone(),
            self.ui_config.clone(),
        );
        self.current_screen = Screen::Dashboard(Box::new(state));
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();
    let splash_duration = Duration::from_secs(2);

    loop {
        while let Ok(event) = app.event_receiver.try_recv() {
            if let Screen::Dashboard(state) = &mut app.current_screen {
                state.add_event(event);
            }
        }

        if let Screen::Dashboard(state) = &mut app.current_screen {
            state.update(Instant::now());
        }
        let username = app.session.profile.username.clone();
        terminal.draw(|f| render(f, &app.current_screen, &username))?;

        if let Screen::Splash = app.current_screen {
            if splash_start.elapsed() >= splash_duration {
                app.enter_dashboard();
                continue;
            }
        }

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                match &mut app.current_screen {
                    Screen::Splash => {
                        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                            return Ok(());
                        }
                        // Any other key skips the splash screen
                        app.enter_dashboard();
                    }
                    Screen::Dashboard(state) => {
                        if state.handle_key(key, Instant::now()) == DashboardAction::Quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, screen: &Screen, username: &str) {
    match screen {
        Screen::Splash => render_splash(f, username),
        Screen::Dashboard(state) => render_dashboard(f, state),
    }
}
