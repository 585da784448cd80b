//! Mounted module screens and the render model they hand to the dashboard.

mod crud;
mod report;

pub use crud::CrudScreen;
pub use report::ReportScreen;

use crate::api::Backend;
use crate::events::EventSender;
use crate::resources::{
    Alertas, Asignaciones, Clientes, Contadores, Declaraciones, Egresos, Ingresos, MisClientes,
    ModuleKey, Obligaciones, PagosContador, SortOrder, Usuarios, ViewContext,
};
use crate::ui::form::{DetailModal, FieldKind, FormMode, Requirement};
use crate::ui::metrics::MetricCard;
use crossterm::event::KeyEvent;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    /// Not a key this screen uses; the shell may act on it.
    Ignored,
}

/// A module mounted in the shell's main area.
///
/// Dropping a screen drops the receiving end of its response channel, so
/// requests still in flight for it are discarded when they finish.
pub trait ModuleScreen: Send {
    fn key(&self) -> ModuleKey;

    /// Applies finished requests and fires due searches.
    fn tick(&mut self, now: Instant);

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> KeyOutcome;

    fn view(&self) -> ScreenView;

    /// A modal, confirmation or the search box owns the keyboard.
    fn captures_input(&self) -> bool;
}

/// Everything the dashboard draws for the mounted module.
#[derive(Debug, Clone, Default)]
pub struct ScreenView {
    pub title: &'static str,
    pub subtitle: Option<String>,
    pub cards: Vec<MetricCard>,
    pub table: Option<TableView>,
    pub modal: Option<ModalView>,
    pub confirm: Option<String>,
    /// Inline error of the last failed request.
    pub banner: Option<String>,
    pub hints: Vec<(String, &'static str)>,
}

#[derive(Debug, Clone)]
pub struct TableView {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub selected: Option<usize>,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    pub search: String,
    pub searching: bool,
    pub tabs: Vec<&'static str>,
    pub active_tab: usize,
    pub order: SortOrder,
    pub loading: bool,
}

#[derive(Debug, Clone)]
pub struct ModalView {
    pub title: String,
    pub fields: Vec<FieldView>,
    pub error: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone)]
pub struct FieldView {
    pub label: String,
    pub value: String,
    pub focused: bool,
    pub editable: bool,
}

impl From<&DetailModal> for ModalView {
    fn from(modal: &DetailModal) -> Self {
        let fields = modal
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let raw = modal.value(field.key);
                let value = match field.kind {
                    FieldKind::Secret => "*".repeat(raw.chars().count()),
                    FieldKind::Choice(_) if raw.is_empty() => "< seleccione >".to_string(),
                    FieldKind::Choice(_) => format!("< {} >", raw),
                    _ => raw.to_string(),
                };
                let marker = match field.requirement {
                    Requirement::Always => " *",
                    Requirement::OnCreate if modal.mode == FormMode::Create => " *",
                    _ => "",
                };
                FieldView {
                    label: format!("{}{}", field.label, marker),
                    value,
                    focused: i == modal.focus,
                    editable: field.is_editable(),
                }
            })
            .collect();
        Self {
            title: modal.title.clone(),
            fields,
            error: modal.error.clone(),
            submitting: modal.submitting,
        }
    }
}

/// Builds the screen for a sidebar entry.
pub fn mount(
    key: ModuleKey,
    backend: Arc<dyn Backend>,
    ctx: ViewContext,
    events: EventSender,
) -> Box<dyn ModuleScreen> {
    match key {
        ModuleKey::Usuarios => Box::new(CrudScreen::<Usuarios>::new(backend, ctx, events)),
        ModuleKey::Clientes => Box::new(CrudScreen::<Clientes>::new(backend, ctx, events)),
        ModuleKey::MisClientes => Box::new(CrudScreen::<MisClientes>::new(backend, ctx, events)),
        ModuleKey::Contadores => Box::new(CrudScreen::<Contadores>::new(backend, ctx, events)),
        ModuleKey::Asignaciones => Box::new(CrudScreen::<Asignaciones>::new(backend, ctx, events)),
        ModuleKey::Ingresos => Box::new(CrudScreen::<Ingresos>::new(backend, ctx, events)),
        ModuleKey::Egresos => Box::new(CrudScreen::<Egresos>::new(backend, ctx, events)),
        ModuleKey::Declaraciones => {
            Box::new(CrudScreen::<Declaraciones>::new(backend, ctx, events))
        }
        ModuleKey::Obligaciones => Box::new(CrudScreen::<Obligaciones>::new(backend, ctx, events)),
        ModuleKey::Pagos => Box::new(CrudScreen::<PagosContador>::new(backend, ctx, events)),
        ModuleKey::Alertas => Box::new(CrudScreen::<Alertas>::new(backend, ctx, events)),
        ModuleKey::Reportes => Box::new(ReportScreen::new(backend, ctx, events)),
    }
}

#[cfg(test)]
pub(crate) mod test_keys {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ch(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }
}
