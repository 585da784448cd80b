//! Role-based shell: which modules the sidebar offers and which one is mounted.

use crate::models::Rol;
use crate::resources::{ModuleKey, ViewContext};

/// Module mounted right after sign-in.
pub fn default_module(rol: Rol) -> ModuleKey {
    match rol {
        Rol::Administrador => ModuleKey::Usuarios,
        Rol::Contador => ModuleKey::MisClientes,
        Rol::Cliente => ModuleKey::Ingresos,
    }
}

pub fn sidebar_entries(ctx: &ViewContext) -> Vec<ModuleKey> {
    use ModuleKey::*;
    match ctx.rol {
        Rol::Administrador => vec![Usuarios, Clientes, Contadores, Asignaciones, Pagos, Alertas],
        Rol::Contador => vec![MisClientes, Declaraciones, Obligaciones, Alertas, Pagos],
        Rol::Cliente => {
            let mut entries = vec![Ingresos, Egresos, Declaraciones, Obligaciones, Alertas];
            if !ctx.is_flat_tax() {
                entries.push(Reportes);
            }
            entries
        }
    }
}

/// Sidebar cursor and the mounted module. No history: a restart goes back to
/// the role default.
#[derive(Debug, Clone)]
pub struct Shell {
    entries: Vec<ModuleKey>,
    cursor: usize,
    selected: ModuleKey,
}

impl Shell {
    pub fn new(ctx: &ViewContext) -> Self {
        let entries = sidebar_entries(ctx);
        let selected = default_module(ctx.rol);
        let cursor = entries.iter().position(|k| *k == selected).unwrap_or(0);
        Self {
            entries,
            cursor,
            selected,
        }
    }

    pub fn entries(&self) -> &[ModuleKey] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> ModuleKey {
        self.selected
    }

    pub fn cursor_down(&mut self) {
        if !self.entries.is_empty() {
            self.cursor = (self.cursor + 1) % self.entries.len();
        }
    }

    pub fn cursor_up(&mut self) {
        if !self.entries.is_empty() {
            self.cursor = (self.cursor + self.entries.len() - 1) % self.entries.len();
        }
    }

    /// Mounts the entry under the cursor. Returns the new key when it differs
    /// from the one already mounted.
    pub fn activate(&mut self) -> Option<ModuleKey> {
        let key = *self.entries.get(self.cursor)?;
        if key == self.selected {
            return None;
        }
        self.selected = key;
        Some(key)
    }

    /// Direct selection, e.g. from a number key. Ignores keys the role lacks.
    pub fn select(&mut self, key: ModuleKey) -> Option<ModuleKey> {
        let index = self.entries.iter().position(|k| *k == key)?;
        self.cursor = index;
        self.activate()
    }
}
