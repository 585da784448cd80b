//! Session setup and initialization

use crate::api::auth;
use crate::api::error::ApiError;
use crate::api::{ApiClient, Backend};
use crate::config::Config;
use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::events::{Event, EventSender};
use crate::models::SessionProfile;
use crate::resources::ViewContext;
use chrono::{Local, NaiveDate};
use std::error::Error;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Authenticated backend plus who is signed in.
#[derive(Clone)]
pub struct Session {
    pub backend: Arc<dyn Backend>,
    pub profile: SessionProfile,
    pub ctx: ViewContext,
    /// Activity handle module screens report through.
    pub events: EventSender,
}

/// Session data for both TUI and headless modes
pub struct SessionData {
    pub session: Session,
    /// Receives activity entries for the dashboard log panel.
    pub event_receiver: mpsc::Receiver<Event>,
}

/// Builds a session from the stored login.
///
/// Role and regime always come from `GET /auth/me`, so a change made by an
/// administrator since login applies on the next start.
pub async fn setup_session(config: Config) -> Result<SessionData, Box<dyn Error>> {
    let client = ApiClient::with_token(config.environment.clone(), config.token.clone())
        .map_err(|e| e.user_message())?;
    let data = setup_with_backend(Arc::new(client), config.profile, Local::now().date_naive())
        .await
        .map_err(|e| e.user_message())?;
    Ok(data)
}

/// The profile stored at login is only used when the backend cannot be
/// reached; a rejected token is still an error.
pub(crate) async fn setup_with_backend(
    backend: Arc<dyn Backend>,
    stored: Option<SessionProfile>,
    today: NaiveDate,
) -> Result<SessionData, ApiError> {
    let profile = match (auth::me(backend.as_ref()).await, stored) {
        (Ok(profile), _) => profile,
        (Err(ApiError::Reqwest(e)), Some(stored)) => {
            log::warn!("Backend unreachable, using the profile stored at login: {}", e);
            stored
        }
        (Err(e), _) => return Err(e),
    };
    let ctx = ViewContext::from_profile(&profile, today);
    let (sender, event_receiver) = mpsc::channel(EVENT_QUEUE_SIZE);
    Ok(SessionData {
        session: Session {
            backend,
            profile,
            ctx,
            events: EventSender::new(sender),
        },
        event_receiver,
    })
}
