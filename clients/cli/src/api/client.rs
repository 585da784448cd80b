//! reqwest implementation of [`Backend`].
//!
//! Owns the base URL and the bearer token; no call site builds URLs or reads
//! the token on its own.

use crate::api::error::ApiError;
use crate::api::{Backend, PatchBody};
use crate::consts::cli_consts::http;
use crate::environment::Environment;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde_json::Value;

// Build timestamp in milliseconds since epoch
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP", "Build timestamp not available");

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("contadesk/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    environment: Environment,
    token: Option<String>,
}

impl ApiClient {
    /// Client without credentials, for the login call.
    pub fn new(environment: Environment) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(http::connect_timeout())
            .timeout(http::request_timeout())
            .build()?;
        Ok(Self {
            client,
            environment,
            token: None,
        })
    }

    /// Client that sends `Authorization: Bearer <token>` on every request.
    ///
    /// A blank token (e.g. a hand-edited config file) is refused up front.
    pub fn with_token(environment: Environment, token: String) -> Result<Self, ApiError> {
        if token.trim().is_empty() {
            return Err(ApiError::MissingToken);
        }
        let mut client = Self::new(environment)?;
        client.token = Some(token);
        Ok(client)
    }

    fn build_url(&self, path: &str, query: &[(String, String)]) -> String {
        build_url(&self.environment.base_url(), path, query)
    }

    fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP);
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, bearer(token)),
            None => builder,
        }
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    /// Decodes a JSON body; an empty 2xx body is `Null`.
    async fn decode_json(response: Response) -> Result<Value, ApiError> {
        let response = Self::handle_response_status(response).await?;
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_json(&self, builder: RequestBuilder, body: Value) -> Result<Value, ApiError> {
        let response = self.prepare(builder).json(&body).send().await?;
        Self::decode_json(response).await
    }
}

#[async_trait::async_trait]
impl Backend for ApiClient {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError> {
        let url = self.build_url(path, query);
        log::debug!("GET {}", url);
        let response = self.prepare(self.client.get(&url)).send().await?;
        Self::decode_json(response).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let url = self.build_url(path, &[]);
        log::debug!("POST {}", url);
        self.send_json(self.client.post(&url), body).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let url = self.build_url(path, &[]);
        log::debug!("PUT {}", url);
        self.send_json(self.client.put(&url), body).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.build_url(path, &[]);
        log::debug!("DELETE {}", url);
        let response = self.prepare(self.client.delete(&url)).send().await?;
        Self::handle_response_status(response).await?;
        Ok(())
    }

    async fn patch(&self, path: &str, body: PatchBody) -> Result<(), ApiError> {
        let url = self.build_url(path, &[]);
        log::debug!("PATCH {}", url);
        let builder = self.prepare(self.client.patch(&url));
        let builder = match body {
            PatchBody::Json(value) => builder.json(&value),
            PatchBody::Text(text) => builder.header(CONTENT_TYPE, "text/plain").body(text),
        };
        let response = builder.send().await?;
        Self::handle_response_status(response).await?;
        Ok(())
    }

    async fn upload(
        &self,
        path: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        let url = self.build_url(path, &[]);
        log::debug!("POST (multipart) {} <- {}", url, file_name);
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part(http::UPLOAD_FIELD, part);
        let response = self
            .prepare(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;
        let response = Self::handle_response_status(response).await?;
        Ok(response.text().await?.trim().to_string())
    }

    async fn download(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.build_url(path, query);
        log::debug!("GET (bytes) {}", url);
        let response = self.prepare(self.client.get(&url)).send().await?;
        let response = Self::handle_response_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Joins base and path and appends the percent-encoded query.
fn build_url(base: &str, path: &str, query: &[(String, String)]) -> String {
    let mut url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    if !query.is_empty() {
        let encoded: Vec<String> = query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect();
        url.push('?');
        url.push_str(&encoded.join("&"));
    }
    url
}
