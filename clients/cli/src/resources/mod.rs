//! Per-entity CRUD services and the table/form description of each module.
//!
//! Every list module talks to its backend collection the same way:
//! `GET /{path}/search`, `POST /{path}`, `PUT /{path}/{id}`, `DELETE /{path}/{id}`.
//! A [`Resource`] only describes what differs between them.

use crate::api::error::ApiError;
use crate::api::{Backend, PatchBody, Query};
use crate::models::{MetricasMensuales, RegimenTributario, Rol, SessionProfile};
use crate::ui::form::{FieldSpec, FormError, FormValues};
use chrono::{Datelike, NaiveDate};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

mod asignaciones;
mod directorio;
pub mod files;
mod movimientos;
pub mod reportes;
mod seguimiento;

pub use asignaciones::Asignaciones;
pub use directorio::{Clientes, Contadores, MisClientes, Usuarios};
pub use movimientos::{Egresos, Ingresos};
pub use seguimiento::{Alertas, Declaraciones, Obligaciones, PagosContador};

/// Sidebar entries, in their wire/CLI spelling.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ModuleKey {
    Usuarios,
    Clientes,
    MisClientes,
    Contadores,
    Asignaciones,
    Ingresos,
    Egresos,
    Declaraciones,
    Obligaciones,
    Pagos,
    Alertas,
    Reportes,
}

impl ModuleKey {
    pub fn title(self) -> &'static str {
        match self {
            ModuleKey::Usuarios => "Usuarios",
            ModuleKey::Clientes => "Clientes",
            ModuleKey::MisClientes => "Mis clientes",
            ModuleKey::Contadores => "Contadores",
            ModuleKey::Asignaciones => "Asignaciones",
            ModuleKey::Ingresos => "Ingresos",
            ModuleKey::Egresos => "Egresos",
            ModuleKey::Declaraciones => "Declaraciones",
            ModuleKey::Obligaciones => "Obligaciones",
            ModuleKey::Pagos => "Pagos",
            ModuleKey::Alertas => "Alertas",
            ModuleKey::Reportes => "Reportes",
        }
    }
}

/// What the signed-in user is looking at: who they are and which period.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewContext {
    pub rol: Rol,
    pub regimen: Option<RegimenTributario>,
    pub cliente_id: Option<i64>,
    pub contador_id: Option<i64>,
    pub today: NaiveDate,
}

impl ViewContext {
    pub fn from_profile(profile: &SessionProfile, today: NaiveDate) -> Self {
        Self {
            rol: profile.rol,
            regimen: profile.regimen(),
            cliente_id: profile.cliente.as_ref().map(|c| c.id),
            contador_id: profile.contador.as_ref().map(|c| c.id),
            today,
        }
    }

    /// Flat-tax clients never see IGV treatment or amounts.
    pub fn is_flat_tax(&self) -> bool {
        self.regimen.is_some_and(RegimenTributario::is_flat_tax)
    }

    pub fn anio(&self) -> i32 {
        self.today.year()
    }

    pub fn mes(&self) -> u32 {
        self.today.month()
    }

    /// `clienteId`, `anio`, `mes` for the signed-in client's current month.
    pub fn period_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(id) = self.cliente_id {
            query.push(("clienteId".to_string(), id.to_string()));
        }
        query.push(("anio".to_string(), self.anio().to_string()));
        query.push(("mes".to_string(), self.mes().to_string()));
        query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
}

impl Permissions {
    pub const FULL: Permissions = Permissions {
        create: true,
        edit: true,
        delete: true,
    };

    pub const READ_ONLY: Permissions = Permissions {
        create: false,
        edit: false,
        delete: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Who orders the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// The backend sorts by this field via `sortBy`/`sortOrder`.
    Server(&'static str),
    /// The collection comes back unordered; rows are sorted locally by
    /// [`Resource::sort_date`], ties kept in server order.
    ClientByDate,
}

/// A per-row state change bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusAction {
    pub key: char,
    pub label: &'static str,
}

/// Table and form description of one backend collection.
pub trait Resource: Send + Sync + 'static {
    type Entity: DeserializeOwned + Clone + Send + Sync + 'static;

    const KEY: ModuleKey;
    const PATH: &'static str;
    /// Singular noun used in modal titles.
    const NOUN: &'static str;

    fn id(entity: &Self::Entity) -> i64;

    fn columns(ctx: &ViewContext) -> Vec<&'static str>;

    /// Display cells, one per column.
    fn row(entity: &Self::Entity, ctx: &ViewContext) -> Vec<String>;

    fn fields(ctx: &ViewContext) -> Vec<FieldSpec>;

    /// Values of a fresh create form.
    fn defaults(ctx: &ViewContext) -> FormValues;

    /// Values of an edit form, pre-populated from the record.
    fn values(entity: &Self::Entity) -> FormValues;

    /// Request body for create and update. Never carries an `id`.
    fn draft(values: &FormValues, ctx: &ViewContext) -> Result<Value, FormError>;

    fn permissions(ctx: &ViewContext) -> Permissions {
        let _ = ctx;
        Permissions::FULL
    }

    /// Query string of the search request.
    fn filters(search: &str, ctx: &ViewContext) -> Query {
        let _ = ctx;
        search_query(search)
    }

    fn sort_mode() -> SortMode;

    fn sort_date(entity: &Self::Entity) -> Option<NaiveDate> {
        let _ = entity;
        None
    }

    /// Status shown in the tab filter, if the collection has one.
    fn status(entity: &Self::Entity) -> Option<&'static str> {
        let _ = entity;
        None
    }

    fn status_tabs() -> Vec<&'static str> {
        Vec::new()
    }

    /// Uploaded receipt or document of the row.
    fn document_url(entity: &Self::Entity) -> Option<&str> {
        let _ = entity;
        None
    }

    /// Whether a receipt can be attached with `PATCH /{path}/{id}/comprobante`.
    fn accepts_receipt(ctx: &ViewContext) -> bool {
        let _ = ctx;
        false
    }

    fn status_actions(ctx: &ViewContext) -> Vec<StatusAction> {
        let _ = ctx;
        Vec::new()
    }

    /// The PATCH an action issues for this row, or `None` when the row is
    /// already past it.
    fn status_request(
        action: char,
        entity: &Self::Entity,
        ctx: &ViewContext,
    ) -> Option<(String, PatchBody)> {
        let _ = (action, entity, ctx);
        None
    }

    /// Monthly metrics endpoint for the module header.
    fn metrics_path(ctx: &ViewContext) -> Option<&'static str> {
        let _ = ctx;
        None
    }
}

/// `q=<search>` when there is anything to search for.
pub(crate) fn search_query(search: &str) -> Query {
    let search = search.trim();
    if search.is_empty() {
        return Query::new();
    }
    vec![("q".to_string(), search.to_string())]
}

pub(crate) fn push_param(query: &mut Query, key: &str, value: Option<i64>) {
    if let Some(value) = value {
        query.push((key.to_string(), value.to_string()));
    }
}

/// Display text of an amount, always with two decimals.
pub(crate) fn money(amount: rust_decimal::Decimal) -> String {
    format!("S/ {:.2}", amount)
}

pub(crate) fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub(crate) fn to_body<T: serde::Serialize>(draft: &T) -> Result<Value, FormError> {
    serde_json::to_value(draft).map_err(|e| FormError::Encode(e.to_string()))
}

/// Stable date sort; rows without a date go last.
pub fn sort_by_date<T>(rows: &mut [T], date: impl Fn(&T) -> Option<NaiveDate>, order: SortOrder) {
    rows.sort_by(|a, b| match (date(a), date(b)) {
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(&b),
            SortOrder::Desc => b.cmp(&a),
        },
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Requests against one collection.
pub struct CrudService<R: Resource> {
    backend: Arc<dyn Backend>,
    _resource: PhantomData<R>,
}

impl<R: Resource> Clone for CrudService<R> {
    fn clone(&self) -> Self {
        Self::new(self.backend.clone())
    }
}

impl<R: Resource> CrudService<R> {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            _resource: PhantomData,
        }
    }

    /// Full collection for the current search, ordered.
    pub async fn search(
        &self,
        search: &str,
        order: SortOrder,
        ctx: &ViewContext,
    ) -> Result<Vec<R::Entity>, ApiError> {
        let mut query = R::filters(search, ctx);
        if let SortMode::Server(field) = R::sort_mode() {
            query.push(("sortBy".to_string(), field.to_string()));
            query.push(("sortOrder".to_string(), order.as_param().to_string()));
        }
        let value = self
            .backend
            .get(&format!("{}/search", R::PATH), &query)
            .await?;
        let mut rows: Vec<R::Entity> = match value {
            Value::Null => Vec::new(),
            value => serde_json::from_value(value)?,
        };
        if R::sort_mode() == SortMode::ClientByDate {
            sort_by_date(&mut rows, R::sort_date, order);
        }
        Ok(rows)
    }

    /// Returns the created record as the backend echoes it.
    pub async fn create(&self, body: Value) -> Result<Value, ApiError> {
        self.backend.post(R::PATH, body).await
    }

    pub async fn update(&self, id: i64, body: Value) -> Result<Value, ApiError> {
        self.backend.put(&format!("{}/{}", R::PATH, id), body).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.backend.delete(&format!("{}/{}", R::PATH, id)).await
    }

    pub async fn change_status(&self, path: &str, body: PatchBody) -> Result<(), ApiError> {
        self.backend.patch(path, body).await
    }

    /// Uploads the receipt and links its URL to the record.
    pub async fn attach_receipt(
        &self,
        id: i64,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        let url = files::upload(self.backend.as_ref(), file_name, bytes).await?;
        self.backend
            .patch(
                &format!("{}/{}/comprobante", R::PATH, id),
                PatchBody::Text(url.clone()),
            )
            .await?;
        Ok(url)
    }

    pub async fn metrics(&self, ctx: &ViewContext) -> Result<Option<MetricasMensuales>, ApiError> {
        let Some(path) = R::metrics_path(ctx) else {
            return Ok(None);
        };
        let value = self.backend.get(path, &ctx.period_query()).await?;
        match value {
            Value::Null => Ok(Some(MetricasMensuales::default())),
            value => Ok(Some(serde_json::from_value(value)?)),
        }
    }
}

/// Id of a record echoed back by a create or update.
pub fn echoed_id(value: &Value) -> Option<i64> {
    value.get("id").and_then(Value::as_i64)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::api::MockBackend;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn module_keys_use_kebab_case() {
        assert_eq!(ModuleKey::MisClientes.to_string(), "mis-clientes");
        assert_eq!(ModuleKey::from_str("pagos").unwrap(), ModuleKey::Pagos);
        assert!(ModuleKey::from_str("facturas").is_err());
    }

    #[test]
    fn period_query_uses_current_month() {
        let ctx = cliente(RegimenTributario::Rer);
        assert_eq!(
            ctx.period_query(),
            vec![
                ("clienteId".to_string(), "3".to_string()),
                ("anio".to_string(), "2024".to_string()),
                ("mes".to_string(), "5".to_string()),
            ]
        );
        assert!(!ctx.is_flat_tax());
        assert!(cliente(RegimenTributario::Nrus).is_flat_tax());
    }

    #[test]
    fn date_sort_is_stable() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day);
        let mut rows = vec![(1, d(3)), (2, d(10)), (3, None), (4, d(3)), (5, d(10))];
        sort_by_date(&mut rows, |r| r.1, SortOrder::Desc);
        let ids: Vec<i32> = rows.iter().map(|r| r.0).collect();
        assert_eq!(ids, vec![2, 5, 1, 4, 3]);

        sort_by_date(&mut rows, |r| r.1, SortOrder::Asc);
        let ids: Vec<i32> = rows.iter().map(|r| r.0).collect();
        assert_eq!(ids, vec![1, 4, 2, 5, 3]);
    }

    #[tokio::test]
    async fn search_sends_server_sort_params() {
        let mut backend = MockBackend::new();
        backend
            .expect_get()
            .withf(|path, query| {
                path == "usuarios/search"
                    && query
                        == [
                            ("q".to_string(), "ana".to_string()),
                            ("sortBy".to_string(), "username".to_string()),
                            ("sortOrder".to_string(), "asc".to_string()),
                        ]
            })
            .times(1)
            .returning(|_, _| {
                Ok(json!([
                    { "id": 1, "username": "ana", "rol": "CONTADOR" }
                ]))
            });

        let service = CrudService::<Usuarios>::new(Arc::new(backend));
        let rows = service.search(" ana ", SortOrder::Asc, &admin()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].activo);
    }

    #[tokio::test]
    async fn empty_search_body_is_no_rows() {
        let mut backend = MockBackend::new();
        backend.expect_get().returning(|_, _| Ok(Value::Null));
        let service = CrudService::<Contadores>::new(Arc::new(backend));
        let rows = service.search("", SortOrder::Desc, &admin()).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn receipt_is_uploaded_then_linked_as_text() {
        let mut backend = MockBackend::new();
        backend
            .expect_upload()
            .withf(|path, name, bytes| {
                path == "archivos/upload" && name == "boleta.pdf" && bytes == b"%PDF"
            })
            .times(1)
            .returning(|_, _, _| Ok("https://files.example/boleta.pdf".to_string()));
        backend
            .expect_patch()
            .withf(|path, body| {
                path == "egresos/11/comprobante"
                    && *body == PatchBody::Text("https://files.example/boleta.pdf".to_string())
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = CrudService::<Egresos>::new(Arc::new(backend));
        let url = service
            .attach_receipt(11, "boleta.pdf", b"%PDF".to_vec())
            .await
            .unwrap();
        assert_eq!(url, "https://files.example/boleta.pdf");
    }

    #[tokio::test]
    async fn metrics_query_current_period() {
        let mut backend = MockBackend::new();
        backend
            .expect_get()
            .withf(|path, query| {
                path == "ingresos/metricas"
                    && query.iter().any(|(k, v)| k == "clienteId" && v == "3")
            })
            .times(1)
            .returning(|_, _| Ok(json!({ "totalMesActual": 250.0, "totalMesAnterior": 200.0 })));

        let service = CrudService::<Ingresos>::new(Arc::new(backend));
        let metrics = service
            .metrics(&cliente(RegimenTributario::Rg))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(metrics.total_mes_actual, rust_decimal::Decimal::from(250));
    }

    #[tokio::test]
    async fn modules_without_metrics_make_no_request() {
        let backend = MockBackend::new();
        let service = CrudService::<Usuarios>::new(Arc::new(backend));
        assert!(service.metrics(&admin()).await.unwrap().is_none());
    }

    #[test]
    fn echoed_id_reads_created_record() {
        assert_eq!(echoed_id(&json!({ "id": 42, "ruc": "1" })), Some(42));
        assert_eq!(echoed_id(&Value::Null), None);
    }
}
