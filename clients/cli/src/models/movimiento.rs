//! Income and expense records kept by taxpayer clients.

use super::{ClienteRef, IdRef, TipoContabilidad, TipoTributario};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingreso {
    pub id: i64,
    #[serde(default)]
    pub cliente: Option<ClienteRef>,
    pub fecha: NaiveDate,
    pub monto: Decimal,
    #[serde(default)]
    pub monto_igv: Decimal,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub nro_comprobante: String,
    #[serde(default)]
    pub tipo_tributario: Option<TipoTributario>,
    #[serde(default)]
    pub comprobante_url: Option<String>,
}

/// Request body for an income. Flat-tax clients never send `tipoTributario`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngresoDraft {
    pub cliente: Option<IdRef>,
    pub fecha: NaiveDate,
    pub monto: Decimal,
    pub monto_igv: Decimal,
    pub descripcion: String,
    pub nro_comprobante: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_tributario: Option<TipoTributario>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Egreso {
    pub id: i64,
    #[serde(default)]
    pub cliente: Option<ClienteRef>,
    pub fecha: NaiveDate,
    pub monto: Decimal,
    #[serde(default)]
    pub monto_igv: Decimal,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub nro_comprobante: String,
    #[serde(default)]
    pub tipo_tributario: Option<TipoTributario>,
    pub tipo_contabilidad: TipoContabilidad,
    #[serde(default)]
    pub comprobante_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EgresoDraft {
    pub cliente: Option<IdRef>,
    pub fecha: NaiveDate,
    pub monto: Decimal,
    pub monto_igv: Decimal,
    pub descripcion: String,
    pub nro_comprobante: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_tributario: Option<TipoTributario>,
    pub tipo_contabilidad: TipoContabilidad,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn ingreso_reads_numeric_amounts() {
        let ingreso: Ingreso = serde_json::from_value(serde_json::json!({
            "id": 11,
            "fecha": "2024-05-14",
            "monto": 100.0,
            "montoIgv": 18.0,
            "descripcion": "Venta mostrador",
            "nroComprobante": "B001-000123",
            "tipoTributario": "GRAVADA",
            "comprobanteUrl": null
        }))
        .unwrap();
        assert_eq!(ingreso.monto, Decimal::from_str("100.00").unwrap());
        assert_eq!(ingreso.monto_igv, Decimal::from(18));
        assert_eq!(ingreso.tipo_tributario, Some(TipoTributario::Gravada));
    }

    #[test]
    fn flat_tax_draft_omits_tipo_tributario() {
        let draft = IngresoDraft {
            cliente: Some(IdRef::new(3)),
            fecha: NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(),
            monto: Decimal::from(50),
            monto_igv: Decimal::ZERO,
            descripcion: "Venta".into(),
            nro_comprobante: "B001-1".into(),
            tipo_tributario: None,
        };
        let value = serde_json::to_value(draft).unwrap();
        assert!(value.get("tipoTributario").is_none());
        assert_eq!(value["fecha"], "2024-05-14");
    }
}
