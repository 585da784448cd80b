//! Filing and payment tracking: declarations, obligations, accountant fees, alerts.

use super::{
    ClienteRef, ContadorRef, EstadoAlerta, EstadoDeclaracion, EstadoObligacion, EstadoPago, IdRef,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A periodic tax filing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaracion {
    pub id: i64,
    #[serde(default)]
    pub cliente: Option<ClienteRef>,
    #[serde(default)]
    pub contador: Option<ContadorRef>,
    pub anio: i32,
    pub mes: u32,
    pub fecha_limite: NaiveDate,
    pub estado: EstadoDeclaracion,
    #[serde(default)]
    pub monto_declarado: Option<Decimal>,
    #[serde(default)]
    pub observaciones: Option<String>,
}

impl Declaracion {
    pub fn periodo(&self) -> String {
        format!("{:04}-{:02}", self.anio, self.mes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaracionDraft {
    pub cliente: IdRef,
    pub contador: Option<IdRef>,
    pub anio: i32,
    pub mes: u32,
    pub fecha_limite: NaiveDate,
    pub estado: EstadoDeclaracion,
    pub monto_declarado: Option<Decimal>,
    pub observaciones: Option<String>,
}

/// A payable deadline tied to a client and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obligacion {
    pub id: i64,
    #[serde(default)]
    pub cliente: Option<ClienteRef>,
    pub concepto: String,
    pub periodo: String,
    pub fecha_vencimiento: NaiveDate,
    pub monto: Decimal,
    pub estado: EstadoObligacion,
    #[serde(default)]
    pub fecha_pago: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObligacionDraft {
    pub cliente: IdRef,
    pub concepto: String,
    pub periodo: String,
    pub fecha_vencimiento: NaiveDate,
    pub monto: Decimal,
    pub estado: EstadoObligacion,
}

/// A client's fee payment to their accountant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagoContador {
    pub id: i64,
    #[serde(default)]
    pub cliente: Option<ClienteRef>,
    #[serde(default)]
    pub contador: Option<ContadorRef>,
    pub periodo: String,
    pub monto: Decimal,
    pub fecha_pago: NaiveDate,
    #[serde(default)]
    pub metodo_pago: Option<String>,
    pub estado: EstadoPago,
    #[serde(default)]
    pub comprobante_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagoContadorDraft {
    pub cliente: IdRef,
    pub contador: IdRef,
    pub periodo: String,
    pub monto: Decimal,
    pub fecha_pago: NaiveDate,
    pub metodo_pago: Option<String>,
    pub estado: EstadoPago,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alerta {
    pub id: i64,
    #[serde(default)]
    pub cliente: Option<ClienteRef>,
    #[serde(default)]
    pub contador: Option<ContadorRef>,
    pub tipo: String,
    pub mensaje: String,
    pub fecha_creacion: NaiveDate,
    #[serde(default)]
    pub fecha_vencimiento: Option<NaiveDate>,
    pub estado: EstadoAlerta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertaDraft {
    pub cliente: Option<IdRef>,
    pub contador: Option<IdRef>,
    pub tipo: String,
    pub mensaje: String,
    pub fecha_vencimiento: Option<NaiveDate>,
    pub estado: EstadoAlerta,
}
