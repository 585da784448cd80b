//! Closed string sets shared with the backend.
//!
//! All of them travel as SCREAMING_SNAKE_CASE strings; the form layer only ever
//! offers the values listed here.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Who is signed in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Rol {
    Administrador,
    Contador,
    Cliente,
}

/// Tax regime of a taxpayer client. `Nrus` is the flat-tax regime.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RegimenTributario {
    Nrus,
    Rer,
    Rg,
    Rmt,
}

impl RegimenTributario {
    pub fn is_flat_tax(self) -> bool {
        self == RegimenTributario::Nrus
    }
}

/// IGV treatment of an income or expense.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoTributario {
    Gravada,
    Exonerada,
    Inafecta,
}

/// Accounting classification of an expense.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoContabilidad {
    Costo,
    Gasto,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoObligacion {
    Pendiente,
    Pagada,
    PagadaConRetraso,
    Vencida,
    NoDisponible,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoDeclaracion {
    Pendiente,
    EnProceso,
    Declarada,
    Vencida,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoAlerta {
    Activa,
    Vista,
    Resuelta,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoPago {
    Pendiente,
    Pagado,
    Anulado,
}

/// Wire names of every variant, in declaration order. Feeds dropdowns and tabs.
pub fn wire_names<E>() -> Vec<&'static str>
where
    E: IntoEnumIterator + Into<&'static str>,
{
    E::iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_word_states_use_screaming_snake_case() {
        assert_eq!(EstadoObligacion::PagadaConRetraso.to_string(), "PAGADA_CON_RETRASO");
        assert_eq!(
            serde_json::to_value(EstadoObligacion::NoDisponible).unwrap(),
            serde_json::json!("NO_DISPONIBLE")
        );
        assert_eq!(
            "EN_PROCESO".parse::<EstadoDeclaracion>().unwrap(),
            EstadoDeclaracion::EnProceso
        );
    }

    #[test]
    fn wire_names_list_every_regime() {
        assert_eq!(
            wire_names::<RegimenTributario>(),
            vec!["NRUS", "RER", "RG", "RMT"]
        );
    }

    #[test]
    fn only_nrus_is_flat_tax() {
        assert!(RegimenTributario::Nrus.is_flat_tax());
        assert!(!RegimenTributario::Rmt.is_flat_tax());
    }
}
