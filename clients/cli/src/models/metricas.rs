//! Pre-aggregated figures from the metrics endpoints. Read-only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Monthly totals for incomes or expenses of one client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricasMensuales {
    pub total_mes_actual: Decimal,
    pub total_mes_anterior: Decimal,
    pub igv_mes_actual: Decimal,
    /// Amount per IGV treatment (`GRAVADA`, `EXONERADA`, `INAFECTA`).
    pub por_tipo_tributario: BTreeMap<String, Decimal>,
}

/// Tax summary for one client and period, as shown in the reports module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumenTributario {
    pub anio: i32,
    pub mes: u32,
    pub total_ingresos: Decimal,
    pub total_egresos: Decimal,
    pub igv_ventas: Decimal,
    pub igv_compras: Decimal,
    pub igv_por_pagar: Decimal,
    pub renta_estimada: Decimal,
}
