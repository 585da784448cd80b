//! Dashboard state management
//!
//! Holds the shell, the mounted module screen and the activity log.

use crate::api::Backend;
use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::environment::Environment;
use crate::events::{Event, EventSender, EventType};
use crate::models::SessionProfile;
use crate::resources::{ModuleKey, ViewContext};
use crate::ui::app::UIConfig;
use crate::ui::screen::{ModuleScreen, mount};
use crate::ui::shell::Shell;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

/// Signed-in user as the header shows it.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub username: String,
    pub rol: String,
    /// Regime or firm of the signed-in client/accountant, when there is one.
    pub detail: Option<String>,
}

impl SessionInfo {
    pub fn from_profile(profile: &SessionProfile) -> Self {
        let detail = match (&profile.cliente, &profile.contador) {
            (Some(cliente), _) => Some(match cliente.regimen {
                Some(regimen) => format!("{} · {}", cliente.razon_social, regimen),
                None => cliente.razon_social.clone(),
            }),
            (None, Some(contador)) => Some(contador.nombre_completo()),
            (None, None) => None,
        };
        Self {
            username: profile.username.clone(),
            rol: profile.rol.to_string(),
            detail,
        }
    }
}

pub struct DashboardState {
    /// The backend the session talks to.
    pub environment: Environment,
    pub session: SessionInfo,
    pub start_time: Instant,
    pub shell: Shell,
    /// The module currently mounted in the main area.
    pub screen: Box<dyn ModuleScreen>,
    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<Event>,
    /// Activity logs for display
    pub activity_logs: VecDeque<Event>,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,

    backend: Arc<dyn Backend>,
    ctx: ViewContext,
    events: EventSender,
}

impl DashboardState {
    /// Creates the dashboard with the role's default module mounted.
    pub fn new(
        backend: Arc<dyn Backend>,
        ctx: ViewContext,
        session: SessionInfo,
        events: EventSender,
        ui_config: UIConfig,
    ) -> Self {
        let shell = Shell::new(&ctx);
        let screen = mount(shell.selected(), backend.clone(), ctx.clone(), events.clone());
        Self {
            environment: backend.environment().clone(),
            session,
            start_time: Instant::now(),
            shell,
            screen,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            with_background_color: ui_config.with_background_color,
            tick: 0,
            backend,
            ctx,
            events,
        }
    }

    /// Replaces the mounted screen. Requests still running for the old one
    /// are dropped with it.
    pub fn remount(&mut self, key: ModuleKey) {
        self.screen = mount(key, self.backend.clone(), self.ctx.clone(), self.events.clone());
        self.add_to_activity_log(Event::session(
            format!("Módulo {}", key.title()),
            EventType::Info,
        ));
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: Event) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: Event) {
        self.pending_events.push_back(event);
    }
}
