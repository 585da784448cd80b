//! Error handling for the api module

use crate::consts::cli_consts::http::MAX_INLINE_MESSAGE_LEN;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Reqwest error, typically related to network issues or request failures.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The body could not be decoded into the expected shape.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    /// No session token is stored.
    #[error("No session token available")]
    MissingToken,
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        ApiError::Http { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text shown inline to the user.
    ///
    /// Server-supplied text wins when it is short and readable (plain text or a
    /// JSON `message`/`error` field); otherwise a generic message per status.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::MissingToken => {
                "Sesión no iniciada. Ejecute `contadesk login`.".to_string()
            }
            ApiError::Reqwest(e) if e.is_timeout() => {
                "El servidor no respondió a tiempo.".to_string()
            }
            ApiError::Reqwest(_) => "No se pudo conectar con el servidor.".to_string(),
            ApiError::Decode(_) => "Respuesta inesperada del servidor.".to_string(),
            ApiError::Http { status, message } => {
                server_message(message).unwrap_or_else(|| generic_message(*status))
            }
        }
    }
}

fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        return ["message", "error", "mensaje"]
            .iter()
            .find_map(|key| json.get(*key).and_then(|v| v.as_str()))
            .map(str::trim)
            .filter(|msg| !msg.is_empty() && msg.len() <= MAX_INLINE_MESSAGE_LEN)
            .map(str::to_string);
    }
    if body.contains("<html") || body.contains("<!DOCTYPE") || body.len() > MAX_INLINE_MESSAGE_LEN
    {
        return None;
    }
    Some(body.to_string())
}

fn generic_message(status: u16) -> String {
    match status {
        400 => "Datos inválidos.".to_string(),
        401 => "Sesión expirada o token inválido. Vuelva a iniciar sesión.".to_string(),
        403 => "No tiene permisos para realizar esta acción.".to_string(),
        404 => "Recurso no encontrado.".to_string(),
        409 => "El registro entra en conflicto con otro existente.".to_string(),
        500..=599 => "Error del servidor. Intente nuevamente más tarde.".to_string(),
        _ => format!("Error al procesar la solicitud (HTTP {}).", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, message: &str) -> ApiError {
        ApiError::Http {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    /// A business-rule rejection reaches the user verbatim.
    fn plain_text_body_is_shown() {
        let err = http(400, "El contador ya tiene el máximo de clientes asignados");
        assert_eq!(
            err.user_message(),
            "El contador ya tiene el máximo de clientes asignados"
        );
    }

    #[test]
    fn json_message_field_is_shown() {
        let err = http(409, r#"{"message":"RUC ya registrado","status":409}"#);
        assert_eq!(err.user_message(), "RUC ya registrado");
    }

    #[test]
    fn html_body_falls_back_to_generic() {
        let err = http(502, "<html><body>Bad Gateway</body></html>");
        assert_eq!(
            err.user_message(),
            "Error del servidor. Intente nuevamente más tarde."
        );
    }

    #[test]
    fn json_without_message_falls_back_to_generic() {
        let err = http(403, r#"{"timestamp":"2024-05-01"}"#);
        assert_eq!(
            err.user_message(),
            "No tiene permisos para realizar esta acción."
        );
    }

    #[test]
    fn empty_body_uses_status() {
        assert_eq!(http(404, "").user_message(), "Recurso no encontrado.");
        assert_eq!(
            http(418, "").user_message(),
            "Error al procesar la solicitud (HTTP 418)."
        );
    }
}
