//! Backend records mirrored as plain JSON.
//!
//! Entity structs always carry the server-assigned `id`; the matching draft
//! types used as request bodies never do. Relations are an embedded ref or
//! `null`, never a bare foreign key.

mod directorio;
mod enums;
mod metricas;
mod movimiento;
mod seguimiento;

pub use directorio::{
    Asignacion, AsignacionDraft, Cliente, ClienteDraft, Contador, ContadorDraft, Usuario,
    UsuarioDraft,
};
pub use enums::{
    EstadoAlerta, EstadoDeclaracion, EstadoObligacion, EstadoPago, RegimenTributario, Rol,
    TipoContabilidad, TipoTributario, wire_names,
};
pub use metricas::{MetricasMensuales, ResumenTributario};
pub use movimiento::{Egreso, EgresoDraft, Ingreso, IngresoDraft};
pub use seguimiento::{
    Alerta, AlertaDraft, Declaracion, DeclaracionDraft, Obligacion, ObligacionDraft,
    PagoContador, PagoContadorDraft,
};

use serde::{Deserialize, Serialize};

/// Reference to an existing record, as sent in request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i64,
}

impl IdRef {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioRef {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub rol: Option<Rol>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClienteRef {
    pub id: i64,
    #[serde(default)]
    pub ruc: Option<String>,
    #[serde(default)]
    pub razon_social: String,
    #[serde(default)]
    pub regimen: Option<RegimenTributario>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContadorRef {
    pub id: i64,
    #[serde(default)]
    pub nombres: String,
    #[serde(default)]
    pub apellidos: String,
}

impl ContadorRef {
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombres, self.apellidos)
            .trim()
            .to_string()
    }
}

/// Who is signed in, as returned by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfile {
    pub usuario_id: i64,
    pub username: String,
    pub rol: Rol,
    #[serde(default)]
    pub cliente: Option<ClienteRef>,
    #[serde(default)]
    pub contador: Option<ContadorRef>,
}

impl SessionProfile {
    /// Regime of the signed-in client, if the user is one.
    pub fn regimen(&self) -> Option<RegimenTributario> {
        self.cliente.as_ref().and_then(|cliente| cliente.regimen)
    }
}

/// Display text for an optional embedded client.
pub(crate) fn cliente_label(cliente: &Option<ClienteRef>) -> String {
    cliente
        .as_ref()
        .map(|c| c.razon_social.clone())
        .unwrap_or_else(|| "-".to_string())
}

/// Display text for an optional embedded accountant.
pub(crate) fn contador_label(contador: &Option<ContadorRef>) -> String {
    contador
        .as_ref()
        .map(ContadorRef::nombre_completo)
        .unwrap_or_else(|| "Sin asignar".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_without_client_has_no_regime() {
        let profile: SessionProfile = serde_json::from_value(serde_json::json!({
            "usuarioId": 1,
            "username": "admin",
            "rol": "ADMINISTRADOR"
        }))
        .unwrap();
        assert_eq!(profile.rol, Rol::Administrador);
        assert_eq!(profile.regimen(), None);
    }

    #[test]
    fn profile_reads_client_regime() {
        let profile: SessionProfile = serde_json::from_value(serde_json::json!({
            "usuarioId": 7,
            "username": "bodega.sol",
            "rol": "CLIENTE",
            "cliente": { "id": 3, "razonSocial": "Bodega Sol", "regimen": "NRUS" }
        }))
        .unwrap();
        assert_eq!(profile.regimen(), Some(RegimenTributario::Nrus));
    }
}
