use super::{ModuleKey, Resource, SortMode, ViewContext, date_cell, to_body};
use crate::models::{Asignacion, AsignacionDraft, IdRef};
use crate::ui::form::{FieldSpec, FormError, FormValues};
use serde_json::Value;

/// Accountant-to-client assignments. The backend enforces how many clients an
/// accountant may hold; going over it comes back as a plain request error.
pub struct Asignaciones;

impl Resource for Asignaciones {
    type Entity = Asignacion;

    const KEY: ModuleKey = ModuleKey::Asignaciones;
    const PATH: &'static str = "asignaciones";
    const NOUN: &'static str = "asignación";

    fn id(entity: &Asignacion) -> i64 {
        entity.id
    }

    fn columns(_ctx: &ViewContext) -> Vec<&'static str> {
        vec!["Cliente", "RUC", "Contador", "Desde"]
    }

    fn row(entity: &Asignacion, _ctx: &ViewContext) -> Vec<String> {
        vec![
            entity.cliente.razon_social.clone(),
            entity.cliente.ruc.clone().unwrap_or_else(|| "-".to_string()),
            entity.contador.nombre_completo(),
            date_cell(entity.fecha_asignacion),
        ]
    }

    fn fields(_ctx: &ViewContext) -> Vec<FieldSpec> {
        vec![
            FieldSpec::digits("clienteId", "Id de cliente")
                .required()
                .max_len(10),
            FieldSpec::digits("contadorId", "Id de contador")
                .required()
                .max_len(10),
        ]
    }

    fn defaults(_ctx: &ViewContext) -> FormValues {
        FormValues::new()
    }

    fn values(entity: &Asignacion) -> FormValues {
        FormValues::new()
            .with("clienteId", entity.cliente.id.to_string())
            .with("contadorId", entity.contador.id.to_string())
    }

    fn draft(values: &FormValues, _ctx: &ViewContext) -> Result<Value, FormError> {
        to_body(&AsignacionDraft {
            cliente: IdRef::new(values.number("clienteId", "Id de cliente")?),
            contador: IdRef::new(values.number("contadorId", "Id de contador")?),
        })
    }

    fn sort_mode() -> SortMode {
        SortMode::Server("fechaAsignacion")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackend;
    use crate::api::error::ApiError;
    use crate::resources::CrudService;
    use crate::resources::test_support::admin;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn draft_sends_both_refs() {
        let values = FormValues::new()
            .with("clienteId", "3")
            .with("contadorId", "2");
        let body = Asignaciones::draft(&values, &admin()).unwrap();
        assert_eq!(body, json!({ "cliente": { "id": 3 }, "contador": { "id": 2 } }));
    }

    #[tokio::test]
    async fn assignment_cap_rejection_reads_like_any_error() {
        let mut backend = MockBackend::new();
        backend.expect_post().returning(|_, _| {
            Err(ApiError::Http {
                status: 400,
                message: "El contador ya alcanzó el límite de clientes asignados".to_string(),
            })
        });
        let service = CrudService::<Asignaciones>::new(Arc::new(backend));
        let err = service
            .create(json!({ "cliente": { "id": 3 }, "contador": { "id": 2 } }))
            .await
            .unwrap_err();
        assert_eq!(
            err.user_message(),
            "El contador ya alcanzó el límite de clientes asignados"
        );
    }
}
