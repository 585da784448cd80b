use super::{
    ModuleKey, Permissions, Resource, SortMode, ViewContext, date_cell, money, push_param,
    search_query, to_body,
};
use crate::api::Query;
use crate::models::{
    Egreso, EgresoDraft, IdRef, Ingreso, IngresoDraft, Rol, TipoContabilidad, TipoTributario,
    wire_names,
};
use crate::tax::{derive_igv, parse_amount};
use crate::ui::form::{FieldSpec, FormError, FormValues};
use serde_json::Value;

/// IGV of the form's amount and treatment, recomputed on every keystroke.
fn igv_field(values: &FormValues) -> String {
    let base = parse_amount(values.get("monto")).unwrap_or_default();
    let tipo = values.get("tipoTributario").parse::<TipoTributario>().ok();
    derive_igv(base, tipo).to_string()
}

/// Fields shared by incomes and expenses. Flat-tax clients get neither the
/// treatment selector nor the IGV amount.
fn movimiento_fields(ctx: &ViewContext) -> Vec<FieldSpec> {
    let mut fields = vec![
        FieldSpec::date("fecha", "Fecha").required(),
        FieldSpec::text("nroComprobante", "N° comprobante")
            .required()
            .max_len(20),
        FieldSpec::text("descripcion", "Descripción").max_len(200),
        FieldSpec::decimal("monto", "Monto").required(),
    ];
    if !ctx.is_flat_tax() {
        fields.push(
            FieldSpec::choice("tipoTributario", "Tipo tributario", wire_names::<TipoTributario>)
                .required(),
        );
        fields.push(FieldSpec::derived("montoIgv", "IGV", igv_field));
    }
    fields
}

fn movimiento_defaults(ctx: &ViewContext) -> FormValues {
    let values = FormValues::new().with("fecha", ctx.today.format("%Y-%m-%d").to_string());
    if ctx.is_flat_tax() {
        values
    } else {
        values.with("tipoTributario", TipoTributario::Gravada.to_string())
    }
}

fn movimiento_columns(ctx: &ViewContext) -> Vec<&'static str> {
    if ctx.is_flat_tax() {
        vec!["Fecha", "Comprobante", "Descripción", "Monto"]
    } else {
        vec!["Fecha", "Comprobante", "Descripción", "Tipo", "Monto", "IGV"]
    }
}

fn cliente_filters(search: &str, ctx: &ViewContext) -> Query {
    let mut query = search_query(search);
    push_param(&mut query, "clienteId", ctx.cliente_id);
    query
}

/// Amount, treatment and IGV as sent: the treatment is dropped for flat-tax
/// clients and the IGV is always derived here, never typed.
fn tax_parts(
    values: &FormValues,
    ctx: &ViewContext,
) -> Result<(rust_decimal::Decimal, Option<TipoTributario>, rust_decimal::Decimal), FormError> {
    let monto = values.amount("monto", "Monto")?;
    let tipo = if ctx.is_flat_tax() {
        None
    } else {
        Some(values.choice("tipoTributario", "Tipo tributario")?)
    };
    Ok((monto, tipo, derive_igv(monto, tipo)))
}

fn movimiento_permissions(ctx: &ViewContext) -> Permissions {
    if ctx.rol == Rol::Cliente {
        Permissions::FULL
    } else {
        Permissions::READ_ONLY
    }
}

pub struct Ingresos;

impl Resource for Ingresos {
    type Entity = Ingreso;

    const KEY: ModuleKey = ModuleKey::Ingresos;
    const PATH: &'static str = "ingresos";
    const NOUN: &'static str = "ingreso";

    fn id(entity: &Ingreso) -> i64 {
        entity.id
    }

    fn columns(ctx: &ViewContext) -> Vec<&'static str> {
        movimiento_columns(ctx)
    }

    fn row(entity: &Ingreso, ctx: &ViewContext) -> Vec<String> {
        let mut cells = vec![
            date_cell(Some(entity.fecha)),
            entity.nro_comprobante.clone(),
            entity.descripcion.clone(),
        ];
        if ctx.is_flat_tax() {
            cells.push(money(entity.monto));
        } else {
            cells.push(
                entity
                    .tipo_tributario
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            );
            cells.push(money(entity.monto));
            cells.push(money(entity.monto_igv));
        }
        cells
    }

    fn fields(ctx: &ViewContext) -> Vec<FieldSpec> {
        let mut fields = movimiento_fields(ctx);
        fields.push(FieldSpec::file("comprobante", "Comprobante (archivo)"));
        fields
    }

    fn defaults(ctx: &ViewContext) -> FormValues {
        movimiento_defaults(ctx)
    }

    fn values(entity: &Ingreso) -> FormValues {
        let values = FormValues::new()
            .with("fecha", entity.fecha.format("%Y-%m-%d").to_string())
            .with("nroComprobante", entity.nro_comprobante.clone())
            .with("descripcion", entity.descripcion.clone())
            .with("monto", entity.monto.to_string());
        match entity.tipo_tributario {
            Some(tipo) => values.with("tipoTributario", tipo.to_string()),
            None => values,
        }
    }

    fn draft(values: &FormValues, ctx: &ViewContext) -> Result<Value, FormError> {
        let (monto, tipo_tributario, monto_igv) = tax_parts(values, ctx)?;
        to_body(&IngresoDraft {
            cliente: ctx.cliente_id.map(IdRef::new),
            fecha: values.date("fecha", "Fecha")?,
            monto,
            monto_igv,
            descripcion: values.text("descripcion"),
            nro_comprobante: values.text("nroComprobante"),
            tipo_tributario,
        })
    }

    fn permissions(ctx: &ViewContext) -> Permissions {
        movimiento_permissions(ctx)
    }

    fn filters(search: &str, ctx: &ViewContext) -> Query {
        cliente_filters(search, ctx)
    }

    fn sort_mode() -> SortMode {
        SortMode::Server("fecha")
    }

    fn document_url(entity: &Ingreso) -> Option<&str> {
        entity.comprobante_url.as_deref()
    }

    fn accepts_receipt(ctx: &ViewContext) -> bool {
        ctx.rol == Rol::Cliente
    }

    fn metrics_path(_ctx: &ViewContext) -> Option<&'static str> {
        Some("ingresos/metricas")
    }
}

pub struct Egresos;

impl Resource for Egresos {
    type Entity = Egreso;

    const KEY: ModuleKey = ModuleKey::Egresos;
    const PATH: &'static str = "egresos";
    const NOUN: &'static str = "egreso";

    fn id(entity: &Egreso) -> i64 {
        entity.id
    }

    fn columns(ctx: &ViewContext) -> Vec<&'static str> {
        let mut columns = movimiento_columns(ctx);
        columns.insert(3, "Clasificación");
        columns
    }

    fn row(entity: &Egreso, ctx: &ViewContext) -> Vec<String> {
        let mut cells = vec![
            date_cell(Some(entity.fecha)),
            entity.nro_comprobante.clone(),
            entity.descripcion.clone(),
            entity.tipo_contabilidad.to_string(),
        ];
        if ctx.is_flat_tax() {
            cells.push(money(entity.monto));
        } else {
            cells.push(
                entity
                    .tipo_tributario
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            );
            cells.push(money(entity.monto));
            cells.push(money(entity.monto_igv));
        }
        cells
    }

    fn fields(ctx: &ViewContext) -> Vec<FieldSpec> {
        let mut fields = movimiento_fields(ctx);
        fields.push(
            FieldSpec::choice("tipoContabilidad", "Clasificación", wire_names::<TipoContabilidad>)
                .required(),
        );
        fields.push(FieldSpec::file("comprobante", "Comprobante (archivo)"));
        fields
    }

    fn defaults(ctx: &ViewContext) -> FormValues {
        movimiento_defaults(ctx).with("tipoContabilidad", TipoContabilidad::Gasto.to_string())
    }

    fn values(entity: &Egreso) -> FormValues {
        let values = FormValues::new()
            .with("fecha", entity.fecha.format("%Y-%m-%d").to_string())
            .with("nroComprobante", entity.nro_comprobante.clone())
            .with("descripcion", entity.descripcion.clone())
            .with("monto", entity.monto.to_string())
            .with("tipoContabilidad", entity.tipo_contabilidad.to_string());
        match entity.tipo_tributario {
            Some(tipo) => values.with("tipoTributario", tipo.to_string()),
            None => values,
        }
    }

    fn draft(values: &FormValues, ctx: &ViewContext) -> Result<Value, FormError> {
        let (monto, tipo_tributario, monto_igv) = tax_parts(values, ctx)?;
        to_body(&EgresoDraft {
            cliente: ctx.cliente_id.map(IdRef::new),
            fecha: values.date("fecha", "Fecha")?,
            monto,
            monto_igv,
            descripcion: values.text("descripcion"),
            nro_comprobante: values.text("nroComprobante"),
            tipo_tributario,
            tipo_contabilidad: values.choice("tipoContabilidad", "Clasificación")?,
        })
    }

    fn permissions(ctx: &ViewContext) -> Permissions {
        movimiento_permissions(ctx)
    }

    fn filters(search: &str, ctx: &ViewContext) -> Query {
        cliente_filters(search, ctx)
    }

    fn sort_mode() -> SortMode {
        SortMode::Server("fecha")
    }

    fn status(entity: &Egreso) -> Option<&'static str> {
        Some(entity.tipo_contabilidad.into())
    }

    fn status_tabs() -> Vec<&'static str> {
        wire_names::<TipoContabilidad>()
    }

    fn document_url(entity: &Egreso) -> Option<&str> {
        entity.comprobante_url.as_deref()
    }

    fn accepts_receipt(ctx: &ViewContext) -> bool {
        ctx.rol == Rol::Cliente
    }

    fn metrics_path(_ctx: &ViewContext) -> Option<&'static str> {
        Some("egresos/metricas")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegimenTributario;
    use crate::resources::test_support::cliente;
    use crate::ui::form::{DetailModal, FormMode};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn ingreso(tipo: Option<TipoTributario>) -> Ingreso {
        Ingreso {
            id: 11,
            cliente: None,
            fecha: NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(),
            monto: Decimal::from(100),
            monto_igv: Decimal::from(18),
            descripcion: "Venta mostrador".into(),
            nro_comprobante: "B001-000123".into(),
            tipo_tributario: tipo,
            comprobante_url: Some("https://files.example/b001.png".into()),
        }
    }

    #[test]
    fn flat_tax_hides_treatment_and_igv() {
        let ctx = cliente(RegimenTributario::Nrus);
        let columns = Ingresos::columns(&ctx);
        assert!(!columns.contains(&"Tipo"));
        assert!(!columns.contains(&"IGV"));
        assert_eq!(Ingresos::row(&ingreso(None), &ctx).len(), columns.len());

        let keys: Vec<&str> = Egresos::fields(&ctx).iter().map(|f| f.key).collect();
        assert!(!keys.contains(&"tipoTributario"));
        assert!(!keys.contains(&"montoIgv"));
    }

    #[test]
    fn flat_tax_body_omits_treatment() {
        let ctx = cliente(RegimenTributario::Nrus);
        let values = Ingresos::defaults(&ctx)
            .with("nroComprobante", "B001-1")
            .with("monto", "50")
            // stale value from a record created under another regime
            .with("tipoTributario", "GRAVADA");
        let body = Ingresos::draft(&values, &ctx).unwrap();
        assert!(body.get("tipoTributario").is_none());
        assert_eq!(body["montoIgv"], json!(0.0));
        assert_eq!(body["cliente"], json!({ "id": 3 }));
    }

    #[test]
    fn general_regime_shows_igv_columns() {
        let ctx = cliente(RegimenTributario::Rg);
        assert_eq!(Ingresos::columns(&ctx).len(), 6);
        let cells = Ingresos::row(&ingreso(Some(TipoTributario::Gravada)), &ctx);
        assert_eq!(cells[3], "GRAVADA");
        assert_eq!(cells[5], "S/ 18.00");
        assert_eq!(Egresos::columns(&ctx)[3], "Clasificación");
    }

    #[test]
    fn igv_follows_amount_and_treatment_in_form() {
        let ctx = cliente(RegimenTributario::Rer);
        let mut modal = DetailModal::new(
            "Nuevo ingreso",
            FormMode::Create,
            Ingresos::fields(&ctx),
            Ingresos::defaults(&ctx),
        );
        while modal.focused().map(|f| f.key) != Some("monto") {
            modal.next_field();
        }
        for c in "100".chars() {
            modal.input_char(c);
        }
        assert_eq!(modal.value("montoIgv"), "18.00");

        modal.next_field();
        assert_eq!(modal.focused().map(|f| f.key), Some("tipoTributario"));
        modal.cycle_choice(true);
        assert_eq!(modal.value("tipoTributario"), "EXONERADA");
        assert_eq!(modal.value("montoIgv"), "0.00");
    }

    #[test]
    fn igv_is_derived_not_trusted_from_form() {
        let ctx = cliente(RegimenTributario::Rg);
        let values = Egresos::defaults(&ctx)
            .with("nroComprobante", "F001-9")
            .with("monto", "200")
            .with("montoIgv", "999");
        let body = Egresos::draft(&values, &ctx).unwrap();
        assert_eq!(body["montoIgv"], json!(36.0));
        assert_eq!(body["tipoTributario"], "GRAVADA");
        assert_eq!(body["tipoContabilidad"], "GASTO");
    }

    #[test]
    fn receipt_url_is_the_document() {
        assert_eq!(
            Ingresos::document_url(&ingreso(None)),
            Some("https://files.example/b001.png")
        );
    }
}
