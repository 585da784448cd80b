use super::{
    ModuleKey, Permissions, Resource, SortMode, StatusAction, ViewContext, date_cell, money,
    push_param, search_query, to_body,
};
use crate::api::{PatchBody, Query};
use crate::models::{
    Alerta, AlertaDraft, Declaracion, DeclaracionDraft, EstadoAlerta, EstadoDeclaracion,
    EstadoObligacion, EstadoPago, IdRef, Obligacion, ObligacionDraft, PagoContador,
    PagoContadorDraft, Rol, cliente_label, contador_label, wire_names,
};
use crate::ui::form::{FieldSpec, FormError, FormValues};
use serde_json::{Value, json};

/// `clienteId` for clients, `contadorId` for accountants, nothing for admins.
fn role_filters(search: &str, ctx: &ViewContext) -> Query {
    let mut query = search_query(search);
    match ctx.rol {
        Rol::Cliente => push_param(&mut query, "clienteId", ctx.cliente_id),
        Rol::Contador => push_param(&mut query, "contadorId", ctx.contador_id),
        Rol::Administrador => {}
    }
    query
}

fn ref_id<T>(value: &Option<T>, id: impl Fn(&T) -> i64) -> String {
    value.as_ref().map(|v| id(v).to_string()).unwrap_or_default()
}

fn format_date(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub struct Declaraciones;

impl Resource for Declaraciones {
    type Entity = Declaracion;

    const KEY: ModuleKey = ModuleKey::Declaraciones;
    const PATH: &'static str = "declaraciones";
    const NOUN: &'static str = "declaración";

    fn id(entity: &Declaracion) -> i64 {
        entity.id
    }

    fn columns(ctx: &ViewContext) -> Vec<&'static str> {
        let mut columns = vec!["Periodo", "Fecha límite", "Monto", "Estado"];
        if ctx.rol != Rol::Cliente {
            columns.insert(0, "Cliente");
        }
        columns
    }

    fn row(entity: &Declaracion, ctx: &ViewContext) -> Vec<String> {
        let mut cells = vec![
            entity.periodo(),
            date_cell(Some(entity.fecha_limite)),
            entity
                .monto_declarado
                .map(money)
                .unwrap_or_else(|| "-".to_string()),
            entity.estado.to_string(),
        ];
        if ctx.rol != Rol::Cliente {
            cells.insert(0, cliente_label(&entity.cliente));
        }
        cells
    }

    fn fields(_ctx: &ViewContext) -> Vec<FieldSpec> {
        vec![
            FieldSpec::digits("clienteId", "Id de cliente")
                .required()
                .max_len(10),
            FieldSpec::digits("anio", "Año").required().exact_len(4),
            FieldSpec::digits("mes", "Mes")
                .required()
                .max_len(2)
                .range(1, 12),
            FieldSpec::date("fechaLimite", "Fecha límite").required(),
            FieldSpec::choice("estado", "Estado", wire_names::<EstadoDeclaracion>).required(),
            FieldSpec::decimal("montoDeclarado", "Monto declarado"),
            FieldSpec::text("observaciones", "Observaciones").max_len(255),
        ]
    }

    fn defaults(ctx: &ViewContext) -> FormValues {
        FormValues::new()
            .with("anio", ctx.anio().to_string())
            .with("mes", ctx.mes().to_string())
            .with("estado", EstadoDeclaracion::Pendiente.to_string())
    }

    fn values(entity: &Declaracion) -> FormValues {
        FormValues::new()
            .with("clienteId", ref_id(&entity.cliente, |c| c.id))
            .with("anio", entity.anio.to_string())
            .with("mes", entity.mes.to_string())
            .with("fechaLimite", format_date(entity.fecha_limite))
            .with("estado", entity.estado.to_string())
            .with(
                "montoDeclarado",
                entity
                    .monto_declarado
                    .map(|m| m.to_string())
                    .unwrap_or_default(),
            )
            .with("observaciones", entity.observaciones.clone().unwrap_or_default())
    }

    fn draft(values: &FormValues, ctx: &ViewContext) -> Result<Value, FormError> {
        to_body(&DeclaracionDraft {
            cliente: IdRef::new(values.number("clienteId", "Id de cliente")?),
            contador: ctx.contador_id.map(IdRef::new),
            anio: values.number("anio", "Año")? as i32,
            mes: values.number("mes", "Mes")? as u32,
            fecha_limite: values.date("fechaLimite", "Fecha límite")?,
            estado: values.choice("estado", "Estado")?,
            monto_declarado: values.opt_amount("montoDeclarado", "Monto declarado")?,
            observaciones: values.opt_text("observaciones"),
        })
    }

    fn permissions(ctx: &ViewContext) -> Permissions {
        if ctx.rol == Rol::Contador {
            Permissions::FULL
        } else {
            Permissions::READ_ONLY
        }
    }

    fn filters(search: &str, ctx: &ViewContext) -> Query {
        role_filters(search, ctx)
    }

    fn sort_mode() -> SortMode {
        SortMode::Server("fechaLimite")
    }

    fn status(entity: &Declaracion) -> Option<&'static str> {
        Some(entity.estado.into())
    }

    fn status_tabs() -> Vec<&'static str> {
        wire_names::<EstadoDeclaracion>()
    }

    fn status_actions(ctx: &ViewContext) -> Vec<StatusAction> {
        if ctx.rol != Rol::Contador {
            return Vec::new();
        }
        vec![StatusAction {
            key: 'p',
            label: "Marcar declarada",
        }]
    }

    fn status_request(
        action: char,
        entity: &Declaracion,
        _ctx: &ViewContext,
    ) -> Option<(String, PatchBody)> {
        if action != 'p' || entity.estado == EstadoDeclaracion::Declarada {
            return None;
        }
        Some((
            format!("declaraciones/{}/estado", entity.id),
            PatchBody::Json(json!({ "estado": EstadoDeclaracion::Declarada })),
        ))
    }
}

/// Payable deadlines. The backend returns them unordered, so they are sorted
/// here by due date.
pub struct Obligaciones;

impl Resource for Obligaciones {
    type Entity = Obligacion;

    const KEY: ModuleKey = ModuleKey::Obligaciones;
    const PATH: &'static str = "obligaciones";
    const NOUN: &'static str = "obligación";

    fn id(entity: &Obligacion) -> i64 {
        entity.id
    }

    fn columns(ctx: &ViewContext) -> Vec<&'static str> {
        let mut columns = vec![
            "Concepto",
            "Periodo",
            "Vencimiento",
            "Monto",
            "Estado",
            "Pagado el",
        ];
        if ctx.rol != Rol::Cliente {
            columns.insert(0, "Cliente");
        }
        columns
    }

    fn row(entity: &Obligacion, ctx: &ViewContext) -> Vec<String> {
        let mut cells = vec![
            entity.concepto.clone(),
            entity.periodo.clone(),
            date_cell(Some(entity.fecha_vencimiento)),
            money(entity.monto),
            entity.estado.to_string(),
            date_cell(entity.fecha_pago),
        ];
        if ctx.rol != Rol::Cliente {
            cells.insert(0, cliente_label(&entity.cliente));
        }
        cells
    }

    fn fields(_ctx: &ViewContext) -> Vec<FieldSpec> {
        vec![
            FieldSpec::digits("clienteId", "Id de cliente")
                .required()
                .max_len(10),
            FieldSpec::text("concepto", "Concepto").required().max_len(100),
            FieldSpec::text("periodo", "Periodo (AAAA-MM)")
                .required()
                .exact_len(7),
            FieldSpec::date("fechaVencimiento", "Vencimiento").required(),
            FieldSpec::decimal("monto", "Monto").required(),
            FieldSpec::choice("estado", "Estado", wire_names::<EstadoObligacion>).required(),
        ]
    }

    fn defaults(ctx: &ViewContext) -> FormValues {
        FormValues::new()
            .with("periodo", ctx.today.format("%Y-%m").to_string())
            .with("estado", EstadoObligacion::Pendiente.to_string())
    }

    fn values(entity: &Obligacion) -> FormValues {
        FormValues::new()
            .with("clienteId", ref_id(&entity.cliente, |c| c.id))
            .with("concepto", entity.concepto.clone())
            .with("periodo", entity.periodo.clone())
            .with("fechaVencimiento", format_date(entity.fecha_vencimiento))
            .with("monto", entity.monto.to_string())
            .with("estado", entity.estado.to_string())
    }

    fn draft(values: &FormValues, _ctx: &ViewContext) -> Result<Value, FormError> {
        to_body(&ObligacionDraft {
            cliente: IdRef::new(values.number("clienteId", "Id de cliente")?),
            concepto: values.text("concepto"),
            periodo: values.text("periodo"),
            fecha_vencimiento: values.date("fechaVencimiento", "Vencimiento")?,
            monto: values.amount("monto", "Monto")?,
            estado: values.choice("estado", "Estado")?,
        })
    }

    fn permissions(ctx: &ViewContext) -> Permissions {
        if ctx.rol == Rol::Contador {
            Permissions::FULL
        } else {
            Permissions::READ_ONLY
        }
    }

    fn filters(search: &str, ctx: &ViewContext) -> Query {
        role_filters(search, ctx)
    }

    fn sort_mode() -> SortMode {
        SortMode::ClientByDate
    }

    fn sort_date(entity: &Obligacion) -> Option<chrono::NaiveDate> {
        Some(entity.fecha_vencimiento)
    }

    fn status(entity: &Obligacion) -> Option<&'static str> {
        Some(entity.estado.into())
    }

    fn status_tabs() -> Vec<&'static str> {
        wire_names::<EstadoObligacion>()
    }

    fn status_actions(ctx: &ViewContext) -> Vec<StatusAction> {
        if ctx.rol != Rol::Cliente {
            return Vec::new();
        }
        vec![StatusAction {
            key: 'p',
            label: "Registrar pago",
        }]
    }

    /// Paying sends `PAGADA` with today's date; whether it was late is the
    /// backend's call.
    fn status_request(
        action: char,
        entity: &Obligacion,
        ctx: &ViewContext,
    ) -> Option<(String, PatchBody)> {
        let payable = matches!(
            entity.estado,
            EstadoObligacion::Pendiente | EstadoObligacion::Vencida
        );
        if action != 'p' || !payable {
            return None;
        }
        Some((
            format!("obligaciones/{}/estado", entity.id),
            PatchBody::Json(json!({
                "estado": EstadoObligacion::Pagada,
                "fechaPago": format_date(ctx.today),
            })),
        ))
    }
}

/// Fees clients pay their accountants.
pub struct PagosContador;

impl Resource for PagosContador {
    type Entity = PagoContador;

    const KEY: ModuleKey = ModuleKey::Pagos;
    const PATH: &'static str = "pagos-contador";
    const NOUN: &'static str = "pago";

    fn id(entity: &PagoContador) -> i64 {
        entity.id
    }

    fn columns(ctx: &ViewContext) -> Vec<&'static str> {
        let mut columns = vec!["Cliente", "Periodo", "Monto", "Fecha", "Método", "Estado"];
        if ctx.rol == Rol::Administrador {
            columns.insert(1, "Contador");
        }
        columns
    }

    fn row(entity: &PagoContador, ctx: &ViewContext) -> Vec<String> {
        let mut cells = vec![
            cliente_label(&entity.cliente),
            entity.periodo.clone(),
            money(entity.monto),
            date_cell(Some(entity.fecha_pago)),
            entity.metodo_pago.clone().unwrap_or_else(|| "-".to_string()),
            entity.estado.to_string(),
        ];
        if ctx.rol == Rol::Administrador {
            cells.insert(1, contador_label(&entity.contador));
        }
        cells
    }

    fn fields(_ctx: &ViewContext) -> Vec<FieldSpec> {
        vec![
            FieldSpec::digits("clienteId", "Id de cliente")
                .required()
                .max_len(10),
            FieldSpec::digits("contadorId", "Id de contador")
                .required()
                .max_len(10),
            FieldSpec::text("periodo", "Periodo (AAAA-MM)")
                .required()
                .exact_len(7),
            FieldSpec::decimal("monto", "Monto").required(),
            FieldSpec::date("fechaPago", "Fecha de pago").required(),
            FieldSpec::text("metodoPago", "Método de pago").max_len(50),
            FieldSpec::choice("estado", "Estado", wire_names::<EstadoPago>).required(),
            FieldSpec::file("comprobante", "Comprobante (archivo)"),
        ]
    }

    fn defaults(ctx: &ViewContext) -> FormValues {
        FormValues::new()
            .with("periodo", ctx.today.format("%Y-%m").to_string())
            .with("fechaPago", format_date(ctx.today))
            .with("estado", EstadoPago::Pagado.to_string())
    }

    fn values(entity: &PagoContador) -> FormValues {
        FormValues::new()
            .with("clienteId", ref_id(&entity.cliente, |c| c.id))
            .with("contadorId", ref_id(&entity.contador, |c| c.id))
            .with("periodo", entity.periodo.clone())
            .with("monto", entity.monto.to_string())
            .with("fechaPago", format_date(entity.fecha_pago))
            .with("metodoPago", entity.metodo_pago.clone().unwrap_or_default())
            .with("estado", entity.estado.to_string())
    }

    fn draft(values: &FormValues, _ctx: &ViewContext) -> Result<Value, FormError> {
        to_body(&PagoContadorDraft {
            cliente: IdRef::new(values.number("clienteId", "Id de cliente")?),
            contador: IdRef::new(values.number("contadorId", "Id de contador")?),
            periodo: values.text("periodo"),
            monto: values.amount("monto", "Monto")?,
            fecha_pago: values.date("fechaPago", "Fecha de pago")?,
            metodo_pago: values.opt_text("metodoPago"),
            estado: values.choice("estado", "Estado")?,
        })
    }

    fn permissions(ctx: &ViewContext) -> Permissions {
        if ctx.rol == Rol::Administrador {
            Permissions::FULL
        } else {
            Permissions::READ_ONLY
        }
    }

    fn filters(search: &str, ctx: &ViewContext) -> Query {
        role_filters(search, ctx)
    }

    fn sort_mode() -> SortMode {
        SortMode::Server("fechaPago")
    }

    fn status(entity: &PagoContador) -> Option<&'static str> {
        Some(entity.estado.into())
    }

    fn status_tabs() -> Vec<&'static str> {
        wire_names::<EstadoPago>()
    }

    fn document_url(entity: &PagoContador) -> Option<&str> {
        entity.comprobante_url.as_deref()
    }

    fn accepts_receipt(ctx: &ViewContext) -> bool {
        ctx.rol == Rol::Administrador
    }
}

/// Alerts about deadlines and pending work. Sorted here, newest first.
pub struct Alertas;

impl Resource for Alertas {
    type Entity = Alerta;

    const KEY: ModuleKey = ModuleKey::Alertas;
    const PATH: &'static str = "alertas";
    const NOUN: &'static str = "alerta";

    fn id(entity: &Alerta) -> i64 {
        entity.id
    }

    fn columns(_ctx: &ViewContext) -> Vec<&'static str> {
        vec!["Fecha", "Tipo", "Mensaje", "Vence", "Estado"]
    }

    fn row(entity: &Alerta, _ctx: &ViewContext) -> Vec<String> {
        vec![
            date_cell(Some(entity.fecha_creacion)),
            entity.tipo.clone(),
            entity.mensaje.clone(),
            date_cell(entity.fecha_vencimiento),
            entity.estado.to_string(),
        ]
    }

    fn fields(_ctx: &ViewContext) -> Vec<FieldSpec> {
        vec![
            FieldSpec::digits("clienteId", "Id de cliente").max_len(10),
            FieldSpec::digits("contadorId", "Id de contador").max_len(10),
            FieldSpec::text("tipo", "Tipo").required().max_len(50),
            FieldSpec::text("mensaje", "Mensaje").required().max_len(255),
            FieldSpec::date("fechaVencimiento", "Vence"),
            FieldSpec::choice("estado", "Estado", wire_names::<EstadoAlerta>).required(),
        ]
    }

    fn defaults(_ctx: &ViewContext) -> FormValues {
        FormValues::new().with("estado", EstadoAlerta::Activa.to_string())
    }

    fn values(entity: &Alerta) -> FormValues {
        FormValues::new()
            .with("clienteId", ref_id(&entity.cliente, |c| c.id))
            .with("contadorId", ref_id(&entity.contador, |c| c.id))
            .with("tipo", entity.tipo.clone())
            .with("mensaje", entity.mensaje.clone())
            .with(
                "fechaVencimiento",
                entity.fecha_vencimiento.map(format_date).unwrap_or_default(),
            )
            .with("estado", entity.estado.to_string())
    }

    fn draft(values: &FormValues, _ctx: &ViewContext) -> Result<Value, FormError> {
        to_body(&AlertaDraft {
            cliente: values.opt_number("clienteId", "Id de cliente")?.map(IdRef::new),
            contador: values.opt_number("contadorId", "Id de contador")?.map(IdRef::new),
            tipo: values.text("tipo"),
            mensaje: values.text("mensaje"),
            fecha_vencimiento: values.opt_date("fechaVencimiento", "Vence")?,
            estado: values.choice("estado", "Estado")?,
        })
    }

    fn permissions(ctx: &ViewContext) -> Permissions {
        if ctx.rol == Rol::Administrador {
            Permissions::FULL
        } else {
            Permissions::READ_ONLY
        }
    }

    fn filters(search: &str, ctx: &ViewContext) -> Query {
        role_filters(search, ctx)
    }

    fn sort_mode() -> SortMode {
        SortMode::ClientByDate
    }

    fn sort_date(entity: &Alerta) -> Option<chrono::NaiveDate> {
        Some(entity.fecha_creacion)
    }

    fn status(entity: &Alerta) -> Option<&'static str> {
        Some(entity.estado.into())
    }

    fn status_tabs() -> Vec<&'static str> {
        wire_names::<EstadoAlerta>()
    }

    fn status_actions(_ctx: &ViewContext) -> Vec<StatusAction> {
        vec![
            StatusAction {
                key: 'v',
                label: "Marcar vista",
            },
            StatusAction {
                key: 'x',
                label: "Resolver",
            },
        ]
    }

    /// The alert endpoint takes the new state as a bare `text/plain` body.
    fn status_request(
        action: char,
        entity: &Alerta,
        _ctx: &ViewContext,
    ) -> Option<(String, PatchBody)> {
        let target = match action {
            'v' if entity.estado == EstadoAlerta::Activa => EstadoAlerta::Vista,
            'x' if entity.estado != EstadoAlerta::Resuelta => EstadoAlerta::Resuelta,
            _ => return None,
        };
        Some((
            format!("alertas/{}/estado", entity.id),
            PatchBody::Text(target.to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackend;
    use crate::models::RegimenTributario;
    use crate::resources::test_support::{admin, cliente, contador, today};
    use crate::resources::{CrudService, SortOrder};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn obligacion(id: i64, estado: EstadoObligacion, vence: u32) -> Obligacion {
        Obligacion {
            id,
            cliente: None,
            concepto: "IGV".into(),
            periodo: "2024-04".into(),
            fecha_vencimiento: NaiveDate::from_ymd_opt(2024, 5, vence).unwrap(),
            monto: Decimal::from(120),
            estado,
            fecha_pago: None,
        }
    }

    fn alerta(estado: EstadoAlerta) -> Alerta {
        Alerta {
            id: 9,
            cliente: None,
            contador: None,
            tipo: "VENCIMIENTO".into(),
            mensaje: "Vence IGV abril".into(),
            fecha_creacion: today(),
            fecha_vencimiento: None,
            estado,
        }
    }

    #[test]
    fn paying_sends_pagada_with_today() {
        let ctx = cliente(RegimenTributario::Rer);
        let (path, body) =
            Obligaciones::status_request('p', &obligacion(4, EstadoObligacion::Vencida, 2), &ctx)
                .unwrap();
        assert_eq!(path, "obligaciones/4/estado");
        assert_eq!(
            body,
            PatchBody::Json(json!({ "estado": "PAGADA", "fechaPago": "2024-05-20" }))
        );
    }

    #[test]
    fn paid_obligation_cannot_be_paid_again() {
        let ctx = cliente(RegimenTributario::Rer);
        let paid = obligacion(4, EstadoObligacion::PagadaConRetraso, 2);
        assert!(Obligaciones::status_request('p', &paid, &ctx).is_none());
        assert!(Obligaciones::status_actions(&contador()).is_empty());
    }

    #[test]
    fn alert_states_go_as_plain_text() {
        let ctx = admin();
        let (path, body) =
            Alertas::status_request('v', &alerta(EstadoAlerta::Activa), &ctx).unwrap();
        assert_eq!(path, "alertas/9/estado");
        assert_eq!(body, PatchBody::Text("VISTA".to_string()));

        let (_, body) = Alertas::status_request('x', &alerta(EstadoAlerta::Vista), &ctx).unwrap();
        assert_eq!(body, PatchBody::Text("RESUELTA".to_string()));

        assert!(Alertas::status_request('v', &alerta(EstadoAlerta::Resuelta), &ctx).is_none());
        assert!(Alertas::status_request('x', &alerta(EstadoAlerta::Resuelta), &ctx).is_none());
    }

    #[test]
    fn declaring_is_json() {
        let declaracion = Declaracion {
            id: 6,
            cliente: None,
            contador: None,
            anio: 2024,
            mes: 4,
            fecha_limite: today(),
            estado: EstadoDeclaracion::EnProceso,
            monto_declarado: None,
            observaciones: None,
        };
        let (path, body) =
            Declaraciones::status_request('p', &declaracion, &contador()).unwrap();
        assert_eq!(path, "declaraciones/6/estado");
        assert_eq!(body, PatchBody::Json(json!({ "estado": "DECLARADA" })));
    }

    #[test]
    fn filters_follow_role() {
        assert_eq!(
            Alertas::filters("", &cliente(RegimenTributario::Rg)),
            vec![("clienteId".to_string(), "3".to_string())]
        );
        assert_eq!(
            Alertas::filters("", &contador()),
            vec![("contadorId".to_string(), "2".to_string())]
        );
        assert!(Alertas::filters("", &admin()).is_empty());
    }

    #[tokio::test]
    /// No `sortBy` is sent; rows come back ordered by due date, ties in
    /// server order.
    async fn obligations_sorted_locally_by_due_date() {
        let rows = vec![
            obligacion(1, EstadoObligacion::Pendiente, 18),
            obligacion(2, EstadoObligacion::Pendiente, 12),
            obligacion(3, EstadoObligacion::Pagada, 18),
        ];
        let payload = serde_json::to_value(
            rows.iter()
                .map(|o| {
                    json!({
                        "id": o.id,
                        "concepto": o.concepto,
                        "periodo": o.periodo,
                        "fechaVencimiento": o.fecha_vencimiento,
                        "monto": 120.0,
                        "estado": o.estado,
                    })
                })
                .collect::<Vec<_>>(),
        )
        .unwrap();

        let mut backend = MockBackend::new();
        backend
            .expect_get()
            .withf(|path, query| {
                path == "obligaciones/search" && !query.iter().any(|(k, _)| k == "sortBy")
            })
            .returning(move |_, _| Ok(payload.clone()));

        let service = CrudService::<Obligaciones>::new(Arc::new(backend));
        let ctx = cliente(RegimenTributario::Rer);
        let sorted = service.search("", SortOrder::Asc, &ctx).await.unwrap();
        let ids: Vec<i64> = sorted.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn pago_draft_requires_both_parties() {
        let values = PagosContador::defaults(&admin())
            .with("clienteId", "3")
            .with("monto", "350");
        assert_eq!(
            PagosContador::draft(&values, &admin()),
            Err(FormError::Required("Id de contador"))
        );
    }
}
