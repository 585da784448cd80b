use super::{
    ModuleKey, Permissions, Resource, SortMode, ViewContext, push_param, search_query, to_body,
};
use crate::api::Query;
use crate::models::{
    Cliente, ClienteDraft, Contador, ContadorDraft, IdRef, RegimenTributario, Rol, Usuario,
    UsuarioDraft, contador_label, wire_names,
};
use crate::ui::form::{FieldSpec, FormError, FormValues};
use serde_json::Value;

const ACTIVO: &str = "ACTIVO";
const INACTIVO: &str = "INACTIVO";

fn estados_usuario() -> Vec<&'static str> {
    vec![ACTIVO, INACTIVO]
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

pub struct Usuarios;

impl Resource for Usuarios {
    type Entity = Usuario;

    const KEY: ModuleKey = ModuleKey::Usuarios;
    const PATH: &'static str = "usuarios";
    const NOUN: &'static str = "usuario";

    fn id(entity: &Usuario) -> i64 {
        entity.id
    }

    fn columns(_ctx: &ViewContext) -> Vec<&'static str> {
        vec!["Usuario", "Email", "Rol", "Estado"]
    }

    fn row(entity: &Usuario, _ctx: &ViewContext) -> Vec<String> {
        vec![
            entity.username.clone(),
            opt_cell(&entity.email),
            entity.rol.to_string(),
            if entity.activo { ACTIVO } else { INACTIVO }.to_string(),
        ]
    }

    fn fields(_ctx: &ViewContext) -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("username", "Usuario").required().max_len(50),
            FieldSpec::text("email", "Email").max_len(100),
            FieldSpec::choice("rol", "Rol", wire_names::<Rol>).required(),
            FieldSpec::choice("activo", "Estado", estados_usuario).required(),
            FieldSpec::secret("password", "Contraseña")
                .required_on_create()
                .max_len(64),
        ]
    }

    fn defaults(_ctx: &ViewContext) -> FormValues {
        FormValues::new()
            .with("rol", Rol::Cliente.to_string())
            .with("activo", ACTIVO)
    }

    fn values(entity: &Usuario) -> FormValues {
        FormValues::new()
            .with("username", entity.username.clone())
            .with("email", opt(&entity.email))
            .with("rol", entity.rol.to_string())
            .with("activo", if entity.activo { ACTIVO } else { INACTIVO })
    }

    fn draft(values: &FormValues, _ctx: &ViewContext) -> Result<Value, FormError> {
        to_body(&UsuarioDraft {
            username: values.text("username"),
            email: values.opt_text("email"),
            rol: values.choice("rol", "Rol")?,
            activo: values.get("activo") != INACTIVO,
            password: values.opt_text("password"),
        })
    }

    fn sort_mode() -> SortMode {
        SortMode::Server("username")
    }

    fn status(entity: &Usuario) -> Option<&'static str> {
        Some(entity.rol.into())
    }

    fn status_tabs() -> Vec<&'static str> {
        wire_names::<Rol>()
    }
}

fn cliente_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::digits("ruc", "RUC").required().exact_len(11),
        FieldSpec::text("razonSocial", "Razón social")
            .required()
            .max_len(150),
        FieldSpec::choice("regimen", "Régimen", wire_names::<RegimenTributario>).required(),
        FieldSpec::text("email", "Email").max_len(100),
        FieldSpec::digits("telefono", "Teléfono").max_len(9),
        FieldSpec::text("direccion", "Dirección").max_len(200),
        FieldSpec::digits("usuarioId", "Id de usuario").max_len(10),
    ]
}

fn cliente_values(entity: &Cliente) -> FormValues {
    FormValues::new()
        .with("ruc", entity.ruc.clone())
        .with("razonSocial", entity.razon_social.clone())
        .with("regimen", entity.regimen.to_string())
        .with("email", opt(&entity.email))
        .with("telefono", opt(&entity.telefono))
        .with("direccion", opt(&entity.direccion))
        .with(
            "usuarioId",
            entity
                .usuario
                .as_ref()
                .map(|u| u.id.to_string())
                .unwrap_or_default(),
        )
}

fn cliente_draft(values: &FormValues) -> Result<Value, FormError> {
    to_body(&ClienteDraft {
        ruc: values.text("ruc"),
        razon_social: values.text("razonSocial"),
        email: values.opt_text("email"),
        telefono: values.opt_text("telefono"),
        direccion: values.opt_text("direccion"),
        regimen: values.choice("regimen", "Régimen")?,
        usuario: values.opt_number("usuarioId", "Id de usuario")?.map(IdRef::new),
    })
}

/// Every client, managed by administrators.
pub struct Clientes;

impl Resource for Clientes {
    type Entity = Cliente;

    const KEY: ModuleKey = ModuleKey::Clientes;
    const PATH: &'static str = "clientes";
    const NOUN: &'static str = "cliente";

    fn id(entity: &Cliente) -> i64 {
        entity.id
    }

    fn columns(_ctx: &ViewContext) -> Vec<&'static str> {
        vec!["RUC", "Razón social", "Régimen", "Contador", "Email"]
    }

    fn row(entity: &Cliente, _ctx: &ViewContext) -> Vec<String> {
        vec![
            entity.ruc.clone(),
            entity.razon_social.clone(),
            entity.regimen.to_string(),
            contador_label(&entity.contador),
            opt_cell(&entity.email),
        ]
    }

    fn fields(_ctx: &ViewContext) -> Vec<FieldSpec> {
        cliente_fields()
    }

    fn defaults(_ctx: &ViewContext) -> FormValues {
        FormValues::new().with("regimen", RegimenTributario::Rer.to_string())
    }

    fn values(entity: &Cliente) -> FormValues {
        cliente_values(entity)
    }

    fn draft(values: &FormValues, _ctx: &ViewContext) -> Result<Value, FormError> {
        cliente_draft(values)
    }

    fn sort_mode() -> SortMode {
        SortMode::Server("razonSocial")
    }

    fn status(entity: &Cliente) -> Option<&'static str> {
        Some(entity.regimen.into())
    }

    fn status_tabs() -> Vec<&'static str> {
        wire_names::<RegimenTributario>()
    }
}

/// Clients assigned to the signed-in accountant. Read-only for them.
pub struct MisClientes;

impl Resource for MisClientes {
    type Entity = Cliente;

    const KEY: ModuleKey = ModuleKey::MisClientes;
    const PATH: &'static str = "clientes";
    const NOUN: &'static str = "cliente";

    fn id(entity: &Cliente) -> i64 {
        entity.id
    }

    fn columns(_ctx: &ViewContext) -> Vec<&'static str> {
        vec!["RUC", "Razón social", "Régimen", "Teléfono", "Email"]
    }

    fn row(entity: &Cliente, _ctx: &ViewContext) -> Vec<String> {
        vec![
            entity.ruc.clone(),
            entity.razon_social.clone(),
            entity.regimen.to_string(),
            opt_cell(&entity.telefono),
            opt_cell(&entity.email),
        ]
    }

    fn fields(_ctx: &ViewContext) -> Vec<FieldSpec> {
        cliente_fields()
    }

    fn defaults(_ctx: &ViewContext) -> FormValues {
        FormValues::new()
    }

    fn values(entity: &Cliente) -> FormValues {
        cliente_values(entity)
    }

    fn draft(values: &FormValues, _ctx: &ViewContext) -> Result<Value, FormError> {
        cliente_draft(values)
    }

    fn permissions(_ctx: &ViewContext) -> Permissions {
        Permissions::READ_ONLY
    }

    fn filters(search: &str, ctx: &ViewContext) -> Query {
        let mut query = search_query(search);
        push_param(&mut query, "contadorId", ctx.contador_id);
        query
    }

    fn sort_mode() -> SortMode {
        SortMode::Server("razonSocial")
    }

    fn status(entity: &Cliente) -> Option<&'static str> {
        Some(entity.regimen.into())
    }

    fn status_tabs() -> Vec<&'static str> {
        wire_names::<RegimenTributario>()
    }
}

pub struct Contadores;

impl Resource for Contadores {
    type Entity = Contador;

    const KEY: ModuleKey = ModuleKey::Contadores;
    const PATH: &'static str = "contadores";
    const NOUN: &'static str = "contador";

    fn id(entity: &Contador) -> i64 {
        entity.id
    }

    fn columns(_ctx: &ViewContext) -> Vec<&'static str> {
        vec!["Nombre", "DNI", "Colegiatura", "Teléfono", "Email"]
    }

    fn row(entity: &Contador, _ctx: &ViewContext) -> Vec<String> {
        vec![
            entity.nombre_completo(),
            entity.dni.clone(),
            opt_cell(&entity.nro_colegiatura),
            opt_cell(&entity.telefono),
            opt_cell(&entity.email),
        ]
    }

    fn fields(_ctx: &ViewContext) -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("nombres", "Nombres").required().max_len(100),
            FieldSpec::text("apellidos", "Apellidos").required().max_len(100),
            FieldSpec::digits("dni", "DNI").required().exact_len(8),
            FieldSpec::text("email", "Email").max_len(100),
            FieldSpec::digits("telefono", "Teléfono").max_len(9),
            FieldSpec::text("nroColegiatura", "N° colegiatura").max_len(20),
            FieldSpec::digits("usuarioId", "Id de usuario").max_len(10),
        ]
    }

    fn defaults(_ctx: &ViewContext) -> FormValues {
        FormValues::new()
    }

    fn values(entity: &Contador) -> FormValues {
        FormValues::new()
            .with("nombres", entity.nombres.clone())
            .with("apellidos", entity.apellidos.clone())
            .with("dni", entity.dni.clone())
            .with("email", opt(&entity.email))
            .with("telefono", opt(&entity.telefono))
            .with("nroColegiatura", opt(&entity.nro_colegiatura))
            .with(
                "usuarioId",
                entity
                    .usuario
                    .as_ref()
                    .map(|u| u.id.to_string())
                    .unwrap_or_default(),
            )
    }

    fn draft(values: &FormValues, _ctx: &ViewContext) -> Result<Value, FormError> {
        to_body(&ContadorDraft {
            nombres: values.text("nombres"),
            apellidos: values.text("apellidos"),
            dni: values.text("dni"),
            email: values.opt_text("email"),
            telefono: values.opt_text("telefono"),
            nro_colegiatura: values.opt_text("nroColegiatura"),
            usuario: values.opt_number("usuarioId", "Id de usuario")?.map(IdRef::new),
        })
    }

    fn sort_mode() -> SortMode {
        SortMode::Server("apellidos")
    }
}
