//! Event System
//!
//! Activity entries produced by module screens and the session, shown in the
//! dashboard log panel.

use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;
use tokio::sync::mpsc;

/// Where an activity entry came from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Source {
    /// Sign-in, sign-out and shell navigation.
    Session,
    /// A mounted module, by sidebar key.
    Module(&'static str),
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Session => write!(f, "sesion"),
            Source::Module(key) => write!(f, "{}", key),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn session(msg: String, event_type: EventType) -> Self {
        Self::new(Source::Session, msg, event_type, LogLevel::Info)
    }

    pub fn module_with_level(
        key: &'static str,
        msg: String,
        event_type: EventType,
        log_level: LogLevel,
    ) -> Self {
        Self::new(Source::Module(key), msg, event_type, log_level)
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.event_type, self.timestamp, self.source, self.msg
        )
    }
}

/// Cloneable handle screens use to report activity.
///
/// Sending never blocks the caller: a full queue drops the entry.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub fn send(&self, event: Event) {
        if event.log_level >= LogLevel::Warn {
            log::warn!("{}", event.msg);
        } else {
            log::debug!("{}", event.msg);
        }
        let _ = self.sender.try_send(event);
    }

    pub fn module(
        &self,
        key: &'static str,
        msg: impl Into<String>,
        event_type: EventType,
        level: LogLevel,
    ) {
        self.send(Event::module_with_level(key, msg.into(), event_type, level));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_and_success_always_display() {
        let event = Event::module_with_level(
            "ingresos",
            "Registro guardado".to_string(),
            EventType::Success,
            LogLevel::Debug,
        );
        assert!(event.should_display());
        assert!(Event::session("Sesión iniciada".to_string(), EventType::Info).should_display());
    }

    #[test]
    fn display_names_source() {
        let event = Event::module_with_level(
            "alertas",
            "Lista actualizada".to_string(),
            EventType::Refresh,
            LogLevel::Info,
        );
        assert!(event.to_string().ends_with("alertas: Lista actualizada"));
    }

    #[tokio::test]
    async fn sender_forwards_events() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        sender.module("egresos", "Lista actualizada", EventType::Refresh, LogLevel::Info);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.source, Source::Module("egresos"));
    }
}
