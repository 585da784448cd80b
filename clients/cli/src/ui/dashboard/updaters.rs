//! Dashboard state update logic
//!
//! Per-frame updates and keyboard routing between the shell and the
//! mounted module.

use super::state::DashboardState;
use crate::ui::screen::KeyOutcome;

use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    Continue,
    Quit,
}

impl DashboardState {
    /// Update the dashboard state with new tick and finished requests.
    pub fn update(&mut self, now: Instant) {
        self.tick += 1;

        while let Some(event) = self.pending_events.pop_front() {
            self.add_to_activity_log(event);
        }

        self.screen.tick(now);
    }

    /// Keys go to the module first. While it owns the keyboard (modal,
    /// confirmation, search box) nothing reaches the shell.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> DashboardAction {
        let capturing = self.screen.captures_input();
        if self.screen.handle_key(key, now) == KeyOutcome::Handled || capturing {
            return DashboardAction::Continue;
        }

        let switched = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return DashboardAction::Quit,
            KeyCode::Tab => {
                self.shell.cursor_down();
                self.shell.activate()
            }
            KeyCode::BackTab => {
                self.shell.cursor_up();
                self.shell.activate()
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                match self.shell.entries().get(index).copied() {
                    Some(key) => self.shell.select(key),
                    None => None,
                }
            }
            _ => None,
        };
        if let Some(key) = switched {
            self.remount(key);
        }
        DashboardAction::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackend;
    use crate::environment::Environment;
    use crate::events::EventSender;
    use crate::resources::ModuleKey;
    use crate::resources::test_support::admin;
    use crate::ui::app::UIConfig;
    use crate::ui::dashboard::state::SessionInfo;
    use crate::ui::screen::test_keys::{ch, key};
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn dashboard() -> DashboardState {
        let mut backend = MockBackend::new();
        backend
            .expect_environment()
            .return_const(Environment::Local);
        backend.expect_get().returning(|_, _| Ok(json!([])));
        let (tx, _rx) = mpsc::channel(16);
        DashboardState::new(
            Arc::new(backend),
            admin(),
            SessionInfo {
                username: "admin".to_string(),
                rol: "ADMINISTRADOR".to_string(),
                detail: None,
            },
            EventSender::new(tx),
            UIConfig::new(false),
        )
    }

    #[tokio::test]
    async fn tab_and_digits_switch_modules() {
        let mut state = dashboard();
        assert_eq!(state.screen.key(), ModuleKey::Usuarios);

        state.handle_key(key(KeyCode::Tab), Instant::now());
        assert_eq!(state.screen.key(), ModuleKey::Clientes);

        state.handle_key(ch('4'), Instant::now());
        assert_eq!(state.screen.key(), ModuleKey::Asignaciones);

        state.handle_key(ch('9'), Instant::now());
        assert_eq!(state.screen.key(), ModuleKey::Asignaciones);
    }

    #[tokio::test]
    async fn quit_keys_wait_for_open_modal() {
        let mut state = dashboard();
        state.handle_key(ch('n'), Instant::now());
        assert_eq!(
            state.handle_key(ch('q'), Instant::now()),
            DashboardAction::Continue
        );
        state.handle_key(key(KeyCode::Esc), Instant::now());
        assert_eq!(
            state.handle_key(ch('q'), Instant::now()),
            DashboardAction::Quit
        );
    }
}
