//! Sign-in against `/auth`.

use crate::api::Backend;
use crate::api::error::ApiError;
use crate::models::SessionProfile;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Exchanges credentials for a bearer token.
pub async fn login(
    backend: &dyn Backend,
    username: &str,
    password: &str,
) -> Result<String, ApiError> {
    let body = json!({ "username": username, "password": password });
    let value = backend.post("auth/login", body).await?;
    let response: LoginResponse = serde_json::from_value(value)?;
    Ok(response.token)
}

/// Profile of the token's owner. `backend` must already carry the token.
pub async fn me(backend: &dyn Backend) -> Result<SessionProfile, ApiError> {
    let value = backend.get("auth/me", &[]).await?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackend;
    use crate::models::{RegimenTributario, Rol};

    #[tokio::test]
    async fn login_returns_token() {
        let mut backend = MockBackend::new();
        backend
            .expect_post()
            .withf(|path, body| {
                path == "auth/login" && body["username"] == "ana" && body["password"] == "s3cret"
            })
            .times(1)
            .returning(|_, _| Ok(json!({ "token": "jwt-abc" })));

        let token = login(&backend, "ana", "s3cret").await.unwrap();
        assert_eq!(token, "jwt-abc");
    }

    #[tokio::test]
    async fn rejected_credentials_surface_as_http_error() {
        let mut backend = MockBackend::new();
        backend.expect_post().returning(|_, _| {
            Err(ApiError::Http {
                status: 401,
                message: "Credenciales inválidas".to_string(),
            })
        });

        let err = login(&backend, "ana", "bad").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.user_message(), "Credenciales inválidas");
    }

    #[tokio::test]
    async fn me_decodes_profile() {
        let mut backend = MockBackend::new();
        backend
            .expect_get()
            .withf(|path, query| path == "auth/me" && query.is_empty())
            .returning(|_, _| {
                Ok(json!({
                    "usuarioId": 7,
                    "username": "bodega.sol",
                    "rol": "CLIENTE",
                    "cliente": { "id": 3, "razonSocial": "Bodega Sol", "regimen": "RER" }
                }))
            });

        let profile = me(&backend).await.unwrap();
        assert_eq!(profile.rol, Rol::Cliente);
        assert_eq!(profile.regimen(), Some(RegimenTributario::Rer));
    }
}
