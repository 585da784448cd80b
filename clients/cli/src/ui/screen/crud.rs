//! Generic list + detail modal screen, one instance per mounted module.

use super::{KeyOutcome, ModalView, ModuleScreen, ScreenView, TableView};
use crate::api::error::ApiError;
use crate::api::{Backend, PatchBody};
use crate::error_classifier::ErrorClassifier;
use crate::events::{EventSender, EventType};
use crate::logging::LogLevel;
use crate::models::MetricasMensuales;
use crate::resources::{CrudService, ModuleKey, Resource, ViewContext, echoed_id, files};
use crate::ui::form::{DetailModal, FormMode, FormValues};
use crate::ui::metrics::{MetricCard, movimiento_cards, status_cards};
use crate::ui::module::ModuleState;
use crate::ui::table::ListTable;
use crossterm::event::{KeyCode, KeyEvent};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Key of the receipt field in forms that accept one.
const RECEIPT_FIELD: &str = "comprobante";

/// Results of requests this screen started.
#[derive(Debug)]
enum CrudMessage<T> {
    Listed {
        seq: u64,
        result: Result<Vec<T>, ApiError>,
    },
    Metrics {
        trigger: u64,
        result: Result<Option<MetricasMensuales>, ApiError>,
    },
    /// `modal` is the form that was submitted. `Ok(Some(_))` carries a
    /// receipt problem; the record itself was saved.
    Saved {
        modal: u64,
        result: Result<Option<String>, ApiError>,
    },
    Deleted(Result<(), ApiError>),
    StatusChanged(Result<(), ApiError>),
}

pub struct CrudScreen<R: Resource> {
    service: CrudService<R>,
    ctx: ViewContext,
    events: EventSender,
    classifier: ErrorClassifier,
    table: ListTable<R::Entity>,
    module: ModuleState,
    metrics: Option<MetricasMensuales>,
    modal: Option<DetailModal>,
    /// Id and label of the row awaiting delete confirmation.
    confirm_delete: Option<(i64, String)>,
    banner: Option<String>,
    list_seq: u64,
    /// Bumped on every modal open, so a save only closes its own form.
    modal_seq: u64,
    tx: mpsc::UnboundedSender<CrudMessage<R::Entity>>,
    rx: mpsc::UnboundedReceiver<CrudMessage<R::Entity>>,
}

impl<R: Resource> CrudScreen<R> {
    /// Creates the screen and starts the first load. Needs a tokio runtime.
    pub fn new(backend: Arc<dyn Backend>, ctx: ViewContext, events: EventSender) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut screen = Self {
            service: CrudService::new(backend),
            ctx,
            events,
            classifier: ErrorClassifier::new(),
            table: ListTable::new().with_tabs(R::status_tabs()),
            module: ModuleState::default(),
            metrics: None,
            modal: None,
            confirm_delete: None,
            banner: None,
            list_seq: 0,
            modal_seq: 0,
            tx,
            rx,
        };
        screen.refresh(true);
        screen
    }

    fn key_name() -> &'static str {
        R::KEY.into()
    }

    /// Starts a list fetch, and a metrics fetch after it when asked.
    ///
    /// Each list fetch gets a new sequence number; a response that is not
    /// the latest is dropped when it arrives.
    fn refresh(&mut self, with_metrics: bool) {
        self.list_seq += 1;
        self.table.loading = true;
        let seq = self.list_seq;
        let trigger = self.module.refresh_trigger();
        let service = self.service.clone();
        let ctx = self.ctx.clone();
        let search = self.table.applied_search().to_string();
        let order = self.table.order;
        let tx = self.tx.clone();
        let fetch_metrics = with_metrics && R::metrics_path(&ctx).is_some();
        tokio::spawn(async move {
            let result = service.search(&search, order, &ctx).await;
            if tx.send(CrudMessage::Listed { seq, result }).is_err() {
                return;
            }
            if fetch_metrics {
                let result = service.metrics(&ctx).await;
                let _ = tx.send(CrudMessage::Metrics { trigger, result });
            }
        });
    }

    /// After any successful mutation: new trigger, full reload.
    fn mutated(&mut self, msg: String) {
        self.module.bump();
        self.banner = None;
        self.events
            .module(Self::key_name(), msg, EventType::Success, LogLevel::Info);
        self.refresh(true);
    }

    fn report_error(&mut self, context: &str, err: &ApiError) {
        let level = self.classifier.classify_request_error(err);
        let message = err.user_message();
        self.events.module(
            Self::key_name(),
            format!("{}: {}", context, message),
            EventType::Error,
            level,
        );
        self.banner = Some(message);
    }

    fn apply(&mut self, message: CrudMessage<R::Entity>) {
        match message {
            CrudMessage::Listed { seq, .. } if seq != self.list_seq => {}
            CrudMessage::Listed { result, .. } => match result {
                Ok(rows) => {
                    self.events.module(
                        Self::key_name(),
                        format!("{} registros", rows.len()),
                        EventType::Refresh,
                        LogLevel::Debug,
                    );
                    self.table.set_rows::<R>(rows, &self.ctx);
                }
                Err(err) => {
                    self.table.loading = false;
                    self.report_error("No se pudo cargar la lista", &err);
                }
            },
            CrudMessage::Metrics { trigger, .. } if !self.module.is_current(trigger) => {}
            CrudMessage::Metrics { result, .. } => match result {
                Ok(metrics) => self.metrics = metrics,
                Err(err) => self.report_error("No se pudieron cargar las métricas", &err),
            },
            CrudMessage::Saved { modal, result } => {
                self.apply_saved(modal == self.modal_seq, result)
            }
            CrudMessage::Deleted(result) => match result {
                Ok(()) => self.mutated(format!("{} eliminado", capitalise(R::NOUN))),
                Err(err) => self.report_error("No se pudo eliminar", &err),
            },
            CrudMessage::StatusChanged(result) => match result {
                Ok(()) => self.mutated("Estado actualizado".to_string()),
                Err(err) => self.report_error("No se pudo cambiar el estado", &err),
            },
        }
    }

    /// A save from a form that was closed or replaced still reloads the list,
    /// but leaves whatever form is open now alone.
    fn apply_saved(&mut self, own_form: bool, result: Result<Option<String>, ApiError>) {
        match result {
            Ok(receipt_problem) => {
                if own_form {
                    self.modal = None;
                }
                self.mutated(format!("{} guardado", capitalise(R::NOUN)));
                if let Some(problem) = receipt_problem {
                    self.banner = Some(problem);
                }
            }
            Err(err) => {
                let message = err.user_message();
                self.events.module(
                    Self::key_name(),
                    format!("No se pudo guardar: {}", message),
                    EventType::Error,
                    self.classifier.classify_request_error(&err),
                );
                match self.modal.as_mut().filter(|_| own_form) {
                    Some(modal) => modal.fail(message),
                    None => self.banner = Some(message),
                }
            }
        }
    }

    fn open_modal(&mut self, modal: DetailModal) {
        self.modal_seq += 1;
        self.modal = Some(modal);
    }

    fn open_create(&mut self) {
        if !R::permissions(&self.ctx).create {
            return;
        }
        self.open_modal(DetailModal::new(
            format!("Registrar {}", R::NOUN),
            FormMode::Create,
            R::fields(&self.ctx),
            R::defaults(&self.ctx),
        ));
    }

    fn open_edit(&mut self) {
        if !R::permissions(&self.ctx).edit {
            return;
        }
        let Some(row) = self.table.selected_row() else {
            return;
        };
        let modal = DetailModal::new(
            format!("Editar {}", R::NOUN),
            FormMode::Edit(R::id(&row.entity)),
            R::fields(&self.ctx),
            R::values(&row.entity),
        );
        self.open_modal(modal);
    }

    fn ask_delete(&mut self) {
        if !R::permissions(&self.ctx).delete {
            return;
        }
        if let Some(row) = self.table.selected_row() {
            let label = row.cells.first().cloned().unwrap_or_default();
            self.confirm_delete = Some((R::id(&row.entity), label));
        }
    }

    fn delete(&mut self, id: i64) {
        let service = self.service.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = service.delete(id).await;
            let _ = tx.send(CrudMessage::Deleted(result));
        });
    }

    /// Validates, then POSTs or PUTs. Nothing is sent while the form has errors.
    fn submit(&mut self) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        if modal.submitting {
            return;
        }
        let Ok((mode, values)) = modal.begin_submit() else {
            return;
        };
        let body = match R::draft(&values, &self.ctx) {
            Ok(body) => body,
            Err(err) => {
                modal.fail(err.to_string());
                return;
            }
        };
        let receipt = receipt_path(&values).filter(|_| R::accepts_receipt(&self.ctx));
        let modal_seq = self.modal_seq;
        let service = self.service.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = save(service, mode, body, receipt).await;
            let _ = tx.send(CrudMessage::Saved {
                modal: modal_seq,
                result,
            });
        });
    }

    fn run_status_action(&mut self, action: char) {
        let Some(row) = self.table.selected_row() else {
            return;
        };
        let Some((path, body)) = R::status_request(action, &row.entity, &self.ctx) else {
            self.banner = Some("El registro ya no admite esa acción".to_string());
            return;
        };
        self.spawn_status(path, body);
    }

    fn spawn_status(&mut self, path: String, body: PatchBody) {
        let service = self.service.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = service.change_status(&path, body).await;
            let _ = tx.send(CrudMessage::StatusChanged(result));
        });
    }

    fn open_document(&mut self) {
        let Some(row) = self.table.selected_row() else {
            return;
        };
        let Some(url) = R::document_url(&row.entity).map(str::to_string) else {
            self.banner = Some("El registro no tiene documento adjunto".to_string());
            return;
        };
        match files::open_document(&url) {
            Ok(()) => self.events.module(
                Self::key_name(),
                format!("Abriendo {}", url),
                EventType::Info,
                LogLevel::Info,
            ),
            Err(e) => self.banner = Some(format!("No se pudo abrir el documento: {}", e)),
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.modal = None;
                return;
            }
            KeyCode::Enter => {
                self.submit();
                return;
            }
            _ => {}
        }
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => modal.next_field(),
            KeyCode::BackTab | KeyCode::Up => modal.prev_field(),
            KeyCode::Left => modal.cycle_choice(false),
            KeyCode::Right => modal.cycle_choice(true),
            KeyCode::Backspace => modal.backspace(),
            KeyCode::Char(c) => modal.input_char(c),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                if self.table.clear_search() {
                    self.refresh(false);
                }
            }
            KeyCode::Enter => self.table.searching = false,
            KeyCode::Backspace => self.table.backspace_search(now),
            KeyCode::Char(c) => self.table.type_search(c, now),
            _ => {}
        }
    }

    fn table_view(&self) -> TableView {
        TableView {
            columns: R::columns(&self.ctx),
            rows: self
                .table
                .page_rows()
                .into_iter()
                .map(|row| row.cells.clone())
                .collect(),
            selected: self.table.selected_index(),
            page: self.table.page(),
            page_count: self.table.page_count(),
            total: self.table.filtered_len(),
            search: self.table.search_input.clone(),
            searching: self.table.searching,
            tabs: self.table.tabs().to_vec(),
            active_tab: self.table.active_tab(),
            order: self.table.order,
            loading: self.table.loading,
        }
    }

    fn cards(&self) -> Vec<MetricCard> {
        if let Some(metrics) = &self.metrics {
            return movimiento_cards(metrics, &self.ctx);
        }
        let tabs = self.table.tabs();
        if tabs.is_empty() {
            return Vec::new();
        }
        status_cards(tabs, self.table.rows().iter().map(|row| row.status))
    }

    fn hints(&self) -> Vec<(String, &'static str)> {
        if self.modal.is_some() {
            return vec![
                ("Tab".into(), "campo"),
                ("←/→".into(), "opción"),
                ("Enter".into(), "guardar"),
                ("Esc".into(), "cerrar"),
            ];
        }
        if self.confirm_delete.is_some() {
            return vec![("y".into(), "eliminar"), ("n".into(), "cancelar")];
        }
        if self.table.searching {
            return vec![("Enter".into(), "listo"), ("Esc".into(), "limpiar")];
        }
        let permissions = R::permissions(&self.ctx);
        let mut hints = vec![
            ("↑/↓".into(), "fila"),
            ("←/→".into(), "página"),
            ("/".into(), "buscar"),
            ("s".into(), "orden"),
        ];
        if !self.table.tabs().is_empty() {
            hints.push(("t".into(), "filtro"));
        }
        if permissions.create {
            hints.push(("n".into(), "nuevo"));
        }
        if permissions.edit {
            hints.push(("e".into(), "editar"));
        }
        if permissions.delete {
            hints.push(("d".into(), "eliminar"));
        }
        hints.push(("o".into(), "documento"));
        for action in R::status_actions(&self.ctx) {
            hints.push((action.key.to_string(), action.label));
        }
        hints.push(("r".into(), "recargar"));
        hints
    }
}

impl<R: Resource> ModuleScreen for CrudScreen<R> {
    fn key(&self) -> ModuleKey {
        R::KEY
    }

    fn tick(&mut self, now: Instant) {
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message);
        }
        if self.table.poll_search(now) {
            self.refresh(false);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> KeyOutcome {
        if self.modal.is_some() {
            self.handle_modal_key(key);
            return KeyOutcome::Handled;
        }
        if let Some((id, _)) = self.confirm_delete {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.confirm_delete = None;
                    self.delete(id);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_delete = None;
                }
                _ => {}
            }
            return KeyOutcome::Handled;
        }
        if self.table.searching {
            self.handle_search_key(key, now);
            return KeyOutcome::Handled;
        }
        match key.code {
            KeyCode::Up => self.table.select_prev(),
            KeyCode::Down => self.table.select_next(),
            KeyCode::Left => self.table.prev_page(),
            KeyCode::Right => self.table.next_page(),
            KeyCode::Char('/') => self.table.searching = true,
            KeyCode::Char('n') => self.open_create(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit(),
            KeyCode::Char('d') => self.ask_delete(),
            KeyCode::Char('o') => self.open_document(),
            KeyCode::Char('t') => self.table.next_tab(),
            KeyCode::Char('s') => {
                self.table.order = self.table.order.toggled();
                self.refresh(false);
            }
            KeyCode::Char('r') => {
                self.banner = None;
                self.refresh(true);
            }
            KeyCode::Char(c) if R::status_actions(&self.ctx).iter().any(|a| a.key == c) => {
                self.run_status_action(c)
            }
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    fn view(&self) -> ScreenView {
        ScreenView {
            title: R::KEY.title(),
            subtitle: None,
            cards: self.cards(),
            table: Some(self.table_view()),
            modal: self.modal.as_ref().map(ModalView::from),
            confirm: self
                .confirm_delete
                .as_ref()
                .map(|(_, label)| format!("¿Eliminar {} \"{}\"? (y/n)", R::NOUN, label)),
            banner: self.banner.clone(),
            hints: self.hints(),
        }
    }

    fn captures_input(&self) -> bool {
        self.modal.is_some() || self.confirm_delete.is_some() || self.table.searching
    }
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn receipt_path(values: &FormValues) -> Option<PathBuf> {
    values.opt_text(RECEIPT_FIELD).map(PathBuf::from)
}

/// Creates or updates the record, then attaches the receipt if one was picked.
async fn save<R: Resource>(
    service: CrudService<R>,
    mode: FormMode,
    body: Value,
    receipt: Option<PathBuf>,
) -> Result<Option<String>, ApiError> {
    let id = match mode {
        FormMode::Create => echoed_id(&service.create(body).await?),
        FormMode::Edit(id) => {
            service.update(id, body).await?;
            Some(id)
        }
    };
    let Some(path) = receipt else {
        return Ok(None);
    };
    let Some(id) = id else {
        return Ok(Some(
            "Guardado, pero el servidor no devolvió el id para adjuntar el comprobante"
                .to_string(),
        ));
    };
    let (name, bytes) = match files::read_local(&path).await {
        Ok(file) => file,
        Err(e) => {
            return Ok(Some(format!(
                "Guardado, pero no se pudo leer {}: {}",
                path.display(),
                e
            )));
        }
    };
    match service.attach_receipt(id, &name, bytes).await {
        Ok(_) => Ok(None),
        Err(err) => Ok(Some(format!(
            "Guardado, pero el comprobante no se adjuntó: {}",
            err.user_message()
        ))),
    }
}
