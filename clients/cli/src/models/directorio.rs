//! People and who-serves-whom: users, clients, accountants, assignments.

use super::{ClienteRef, ContadorRef, IdRef, RegimenTributario, Rol, UsuarioRef};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub rol: Rol,
    #[serde(default = "default_true")]
    pub activo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioDraft {
    pub username: String,
    pub email: Option<String>,
    pub rol: Rol,
    pub activo: bool,
    /// Only sent when set; an edit with a blank password keeps the old one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: i64,
    pub ruc: String,
    pub razon_social: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    pub regimen: RegimenTributario,
    #[serde(default)]
    pub usuario: Option<UsuarioRef>,
    #[serde(default)]
    pub contador: Option<ContadorRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClienteDraft {
    pub ruc: String,
    pub razon_social: String,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub regimen: RegimenTributario,
    pub usuario: Option<IdRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contador {
    pub id: i64,
    pub nombres: String,
    pub apellidos: String,
    pub dni: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub nro_colegiatura: Option<String>,
    #[serde(default)]
    pub usuario: Option<UsuarioRef>,
}

impl Contador {
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombres, self.apellidos)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContadorDraft {
    pub nombres: String,
    pub apellidos: String,
    pub dni: String,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub nro_colegiatura: Option<String>,
    pub usuario: Option<IdRef>,
}

/// An accountant assigned to serve a client. The backend caps how many
/// clients one accountant may hold and rejects the create when exceeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asignacion {
    pub id: i64,
    pub cliente: ClienteRef,
    pub contador: ContadorRef,
    #[serde(default)]
    pub fecha_asignacion: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AsignacionDraft {
    pub cliente: IdRef,
    pub contador: IdRef,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// A client with no account or accountant yet carries nulls, not ids.
    fn cliente_relations_may_be_null() {
        let cliente: Cliente = serde_json::from_value(serde_json::json!({
            "id": 4,
            "ruc": "20123456789",
            "razonSocial": "Ferretería Lima SAC",
            "regimen": "RER",
            "usuario": null,
            "contador": null
        }))
        .unwrap();
        assert!(cliente.usuario.is_none());
        assert!(cliente.contador.is_none());
        assert_eq!(cliente.regimen, RegimenTributario::Rer);
    }

    #[test]
    /// Drafts never serialize an id field.
    fn drafts_have_no_id() {
        let draft = ClienteDraft {
            ruc: "20123456789".into(),
            razon_social: "Ferretería Lima SAC".into(),
            email: None,
            telefono: None,
            direccion: None,
            regimen: RegimenTributario::Rg,
            usuario: Some(IdRef::new(9)),
        };
        let value = serde_json::to_value(draft).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["usuario"]["id"], 9);
        assert_eq!(value["razonSocial"], "Ferretería Lima SAC");
    }

    #[test]
    fn blank_password_is_not_sent() {
        let draft = UsuarioDraft {
            username: "ana".into(),
            email: None,
            rol: Rol::Contador,
            activo: true,
            password: None,
        };
        let value = serde_json::to_value(draft).unwrap();
        assert!(value.get("password").is_none());
    }
}
