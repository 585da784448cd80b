//! Monthly tax summary of the signed-in client, with the PDF download.

use super::{KeyOutcome, ModuleScreen, ScreenView};
use crate::api::Backend;
use crate::api::error::ApiError;
use crate::error_classifier::ErrorClassifier;
use crate::events::{EventSender, EventType};
use crate::logging::LogLevel;
use crate::models::ResumenTributario;
use crate::resources::reportes::{ReportService, default_report_path, save_pdf};
use crate::resources::{ModuleKey, ViewContext, files};
use crate::ui::metrics::resumen_cards;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(Debug)]
enum ReportMessage {
    Resumen {
        seq: u64,
        result: Result<ResumenTributario, ApiError>,
    },
    Pdf(Result<PathBuf, String>),
}

pub struct ReportScreen {
    service: ReportService,
    ctx: ViewContext,
    events: EventSender,
    classifier: ErrorClassifier,
    anio: i32,
    mes: u32,
    resumen: Option<ResumenTributario>,
    loading: bool,
    downloading: bool,
    banner: Option<String>,
    seq: u64,
    tx: mpsc::UnboundedSender<ReportMessage>,
    rx: mpsc::UnboundedReceiver<ReportMessage>,
}

impl ReportScreen {
    pub fn new(backend: Arc<dyn Backend>, ctx: ViewContext, events: EventSender) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut screen = Self {
            service: ReportService::new(backend),
            anio: ctx.anio(),
            mes: ctx.mes(),
            ctx,
            events,
            classifier: ErrorClassifier::new(),
            resumen: None,
            loading: false,
            downloading: false,
            banner: None,
            seq: 0,
            tx,
            rx,
        };
        screen.load();
        screen
    }

    fn key_name() -> &'static str {
        ModuleKey::Reportes.into()
    }

    fn cliente_id(&mut self) -> Option<i64> {
        if self.ctx.cliente_id.is_none() {
            self.banner = Some("La cuenta no tiene un cliente asociado".to_string());
        }
        self.ctx.cliente_id
    }

    fn load(&mut self) {
        let Some(cliente_id) = self.cliente_id() else {
            return;
        };
        self.seq += 1;
        self.loading = true;
        let seq = self.seq;
        let (anio, mes) = (self.anio, self.mes);
        let service = self.service.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = service.resumen(cliente_id, anio, mes).await;
            let _ = tx.send(ReportMessage::Resumen { seq, result });
        });
    }

    /// Moves the period by one month, wrapping the year.
    fn shift_month(&mut self, forward: bool) {
        (self.anio, self.mes) = match (forward, self.mes) {
            (true, 12) => (self.anio + 1, 1),
            (true, m) => (self.anio, m + 1),
            (false, 1) => (self.anio - 1, 12),
            (false, m) => (self.anio, m - 1),
        };
        self.load();
    }

    fn download(&mut self) {
        if self.downloading {
            return;
        }
        let Some(cliente_id) = self.cliente_id() else {
            return;
        };
        self.downloading = true;
        let (anio, mes) = (self.anio, self.mes);
        let service = self.service.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = async {
                let bytes = service
                    .pdf(cliente_id, anio, mes)
                    .await
                    .map_err(|e| e.user_message())?;
                let path = default_report_path(anio, mes).map_err(|e| e.to_string())?;
                save_pdf(&path, &bytes).await.map_err(|e| e.to_string())?;
                Ok::<_, String>(path)
            }
            .await;
            let _ = tx.send(ReportMessage::Pdf(result));
        });
    }

    fn apply(&mut self, message: ReportMessage) {
        match message {
            ReportMessage::Resumen { seq, .. } if seq != self.seq => {}
            ReportMessage::Resumen { result, .. } => {
                self.loading = false;
                match result {
                    Ok(resumen) => {
                        self.banner = None;
                        self.resumen = Some(resumen);
                    }
                    Err(err) => {
                        self.events.module(
                            Self::key_name(),
                            format!("No se pudo cargar el resumen: {}", err.user_message()),
                            EventType::Error,
                            self.classifier.classify_request_error(&err),
                        );
                        self.resumen = None;
                        self.banner = Some(err.user_message());
                    }
                }
            }
            ReportMessage::Pdf(result) => {
                self.downloading = false;
                match result {
                    Ok(path) => {
                        self.events.module(
                            Self::key_name(),
                            format!("Reporte guardado en {}", path.display()),
                            EventType::Success,
                            LogLevel::Info,
                        );
                        if let Err(e) = files::open_document(&path.to_string_lossy()) {
                            self.banner = Some(format!("No se pudo abrir el PDF: {}", e));
                        }
                    }
                    Err(message) => {
                        self.events.module(
                            Self::key_name(),
                            format!("No se pudo descargar el PDF: {}", message),
                            EventType::Error,
                            LogLevel::Warn,
                        );
                        self.banner = Some(message);
                    }
                }
            }
        }
    }
}

impl ModuleScreen for ReportScreen {
    fn key(&self) -> ModuleKey {
        ModuleKey::Reportes
    }

    fn tick(&mut self, _now: Instant) {
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, _now: Instant) -> KeyOutcome {
        match key.code {
            KeyCode::Left => self.shift_month(false),
            KeyCode::Right => self.shift_month(true),
            KeyCode::Char('r') => self.load(),
            KeyCode::Char('g') => self.download(),
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    fn view(&self) -> ScreenView {
        let mut subtitle = format!("Periodo {:04}-{:02}", self.anio, self.mes);
        if self.loading {
            subtitle.push_str(" · cargando");
        }
        if self.downloading {
            subtitle.push_str(" · descargando PDF");
        }
        ScreenView {
            title: ModuleKey::Reportes.title(),
            subtitle: Some(subtitle),
            cards: self.resumen.as_ref().map(resumen_cards).unwrap_or_default(),
            banner: self.banner.clone(),
            hints: vec![
                ("←/→".into(), "mes"),
                ("g".into(), "descargar PDF"),
                ("r".into(), "recargar"),
            ],
            ..Default::default()
        }
    }

    fn captures_input(&self) -> bool {
        false
    }
}
