//! Headless commands: print a module's list or a report without the TUI.

use super::Session;
use crate::api::Backend;
use crate::api::error::ApiError;
use crate::models::ResumenTributario;
use crate::resources::reportes::{ReportService, default_report_path, save_pdf};
use crate::resources::{
    Alertas, Asignaciones, Clientes, Contadores, CrudService, Declaraciones, Egresos, Ingresos,
    MisClientes, ModuleKey, Obligaciones, PagosContador, Resource, SortOrder, Usuarios, ViewContext,
};
use crate::ui::shell::sidebar_entries;
use crate::ui::table::ListTable;
use comfy_table::{Attribute, Cell, Color, Table};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

/// One page of a module's list, ready to print.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

impl Listing {
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_header(
            self.columns
                .iter()
                .map(|c| Cell::new(c).add_attribute(Attribute::Bold)),
        );
        for row in &self.rows {
            table.add_row(row.iter().map(Cell::new));
        }
        table
    }

    pub fn footer(&self) -> String {
        format!(
            "{} registros · página {}/{}",
            self.total, self.page, self.page_count
        )
    }
}

async fn list_page<R: Resource>(
    backend: Arc<dyn Backend>,
    ctx: &ViewContext,
    search: &str,
    page: usize,
) -> Result<Listing, ApiError> {
    let rows = CrudService::<R>::new(backend)
        .search(search, SortOrder::Desc, ctx)
        .await?;
    let mut table = ListTable::new().with_search(search);
    table.set_rows::<R>(rows, ctx);
    table.go_to_page(page);
    Ok(Listing {
        columns: R::columns(ctx),
        rows: table
            .page_rows()
            .into_iter()
            .map(|row| row.cells.clone())
            .collect(),
        page: table.page(),
        page_count: table.page_count(),
        total: table.filtered_len(),
    })
}

/// Fetches one page of a module the signed-in role can open.
pub async fn list_module(
    session: &Session,
    key: ModuleKey,
    search: &str,
    page: usize,
) -> Result<Listing, Box<dyn Error>> {
    if !sidebar_entries(&session.ctx).contains(&key) {
        return Err(format!(
            "El módulo {} no está disponible para {}",
            key, session.ctx.rol
        )
        .into());
    }
    let backend = session.backend.clone();
    let ctx = &session.ctx;
    let listing = match key {
        ModuleKey::Usuarios => list_page::<Usuarios>(backend, ctx, search, page).await?,
        ModuleKey::Clientes => list_page::<Clientes>(backend, ctx, search, page).await?,
        ModuleKey::MisClientes => list_page::<MisClientes>(backend, ctx, search, page).await?,
        ModuleKey::Contadores => list_page::<Contadores>(backend, ctx, search, page).await?,
        ModuleKey::Asignaciones => list_page::<Asignaciones>(backend, ctx, search, page).await?,
        ModuleKey::Ingresos => list_page::<Ingresos>(backend, ctx, search, page).await?,
        ModuleKey::Egresos => list_page::<Egresos>(backend, ctx, search, page).await?,
        ModuleKey::Declaraciones => list_page::<Declaraciones>(backend, ctx, search, page).await?,
        ModuleKey::Obligaciones => list_page::<Obligaciones>(backend, ctx, search, page).await?,
        ModuleKey::Pagos => list_page::<PagosContador>(backend, ctx, search, page).await?,
        ModuleKey::Alertas => list_page::<Alertas>(backend, ctx, search, page).await?,
        ModuleKey::Reportes => return Err("Use `contadesk report` para los reportes".into()),
    };
    Ok(listing)
}

/// Fetches the summary and writes the PDF of one period.
pub async fn download_report(
    session: &Session,
    anio: i32,
    mes: u32,
    output: Option<PathBuf>,
) -> Result<(ResumenTributario, PathBuf), Box<dyn Error>> {
    if session.ctx.is_flat_tax() {
        return Err("Los clientes del NRUS no tienen reporte tributario".into());
    }
    let cliente_id = session
        .ctx
        .cliente_id
        .ok_or("La cuenta no tiene un cliente asociado")?;
    let service = ReportService::new(session.backend.clone());
    let resumen = service.resumen(cliente_id, anio, mes).await?;
    let bytes = service.pdf(cliente_id, anio, mes).await?;
    let path = match output {
        Some(path) => path,
        None => default_report_path(anio, mes)?,
    };
    save_pdf(&path, &bytes).await?;
    log::info!("Reporte escrito en {}", path.display());
    Ok((resumen, path))
}

pub fn resumen_table(resumen: &ResumenTributario) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(format!("Periodo {:04}-{:02}", resumen.anio, resumen.mes))
            .add_attribute(Attribute::Bold),
        Cell::new("Monto").add_attribute(Attribute::Bold),
    ]);
    let rows = [
        ("Ingresos", resumen.total_ingresos),
        ("Egresos", resumen.total_egresos),
        ("IGV ventas", resumen.igv_ventas),
        ("IGV compras", resumen.igv_compras),
        ("Renta estimada", resumen.renta_estimada),
    ];
    for (label, amount) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(format!("S/ {:.2}", amount))]);
    }
    table.add_row(vec![
        Cell::new("IGV por pagar").add_attribute(Attribute::Bold),
        Cell::new(format!("S/ {:.2}", resumen.igv_por_pagar))
            .add_attribute(Attribute::Bold)
            .fg(Color::Yellow),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackend;
    use crate::events::EventSender;
    use crate::models::{RegimenTributario, SessionProfile};
    use crate::resources::test_support::{admin, cliente};
    use serde_json::{Value, json};
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    fn session(backend: MockBackend, ctx: ViewContext) -> Session {
        let (tx, _rx) = mpsc::channel(4);
        Session {
            backend: Arc::new(backend),
            profile: SessionProfile {
                usuario_id: 1,
                username: "test".to_string(),
                rol: ctx.rol,
                cliente: None,
                contador: None,
            },
            ctx,
            events: EventSender::new(tx),
        }
    }

    fn usuarios(n: i64) -> Value {
        Value::Array(
            (1..=n)
                .map(|id| {
                    json!({ "id": id, "username": format!("user{:02}", id), "rol": "CLIENTE" })
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn last_page_holds_the_remainder() {
        let mut backend = MockBackend::new();
        backend.expect_get().returning(|_, _| Ok(usuarios(12)));
        let session = session(backend, admin());

        let listing = list_module(&session, ModuleKey::Usuarios, "", 3).await.unwrap();
        assert_eq!(listing.rows.len(), 2);
        assert_eq!(listing.footer(), "12 registros · página 3/3");

        let rendered = listing.to_table().to_string();
        assert!(rendered.contains("user11"));
        assert!(!rendered.contains("user01"));
    }

    #[tokio::test]
    async fn page_past_the_end_is_clamped() {
        let mut backend = MockBackend::new();
        backend.expect_get().returning(|_, _| Ok(usuarios(3)));
        let session = session(backend, admin());
        let listing = list_module(&session, ModuleKey::Usuarios, "", 9).await.unwrap();
        assert_eq!(listing.page, 1);
        assert_eq!(listing.rows.len(), 3);
    }

    #[tokio::test]
    async fn modules_outside_the_role_are_refused() {
        let mut backend = MockBackend::new();
        backend.expect_get().never();
        let session = session(backend, cliente(RegimenTributario::Rg));
        assert!(list_module(&session, ModuleKey::Usuarios, "", 1).await.is_err());
    }

    #[tokio::test]
    async fn report_is_written_to_the_requested_path() {
        let mut backend = MockBackend::new();
        backend
            .expect_get()
            .returning(|_, _| Ok(json!({ "anio": 2024, "mes": 4, "igvPorPagar": 54.0 })));
        backend
            .expect_download()
            .withf(|path, _| path == "reportes/pdf")
            .returning(|_, _| Ok(b"%PDF-1.4".to_vec()));
        let session = session(backend, cliente(RegimenTributario::Rer));
        let dir = tempdir().unwrap();
        let output = dir.path().join("abril.pdf");

        let (resumen, path) = download_report(&session, 2024, 4, Some(output.clone()))
            .await
            .unwrap();
        assert_eq!(path, output);
        assert_eq!(std::fs::read(&output).unwrap(), b"%PDF-1.4");
        assert!(resumen_table(&resumen).to_string().contains("S/ 54.00"));
    }

    #[tokio::test]
    async fn flat_tax_clients_have_no_report() {
        let backend = MockBackend::new();
        let session = session(backend, cliente(RegimenTributario::Nrus));
        assert!(download_report(&session, 2024, 4, None).await.is_err());
    }
}
