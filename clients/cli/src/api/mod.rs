//! The single authenticated-request abstraction every module talks through.

use crate::api::error::ApiError;
use crate::environment::Environment;
use serde_json::Value;

pub mod auth;
pub(crate) mod client;
pub use client::ApiClient;
pub mod error;

#[cfg(test)]
use mockall::automock;

/// Query-string pairs, in the order they are sent.
pub type Query = Vec<(String, String)>;

/// Body of a status-changing PATCH.
///
/// The backend takes JSON on some endpoints and a bare `text/plain` string on
/// others; both are part of its contract.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchBody {
    Json(Value),
    Text(String),
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    fn environment(&self) -> &Environment;

    /// `GET path?query`, decoded as JSON.
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError>;

    /// `POST path` with a JSON body. Returns the decoded response, `Null` when empty.
    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    /// `PUT path` with a JSON body. Returns the decoded response, `Null` when empty.
    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    async fn delete(&self, path: &str) -> Result<(), ApiError>;

    async fn patch(&self, path: &str, body: PatchBody) -> Result<(), ApiError>;

    /// Multipart upload of a single file; the server answers with the stored URL.
    async fn upload(&self, path: &str, file_name: &str, bytes: Vec<u8>)
    -> Result<String, ApiError>;

    /// Raw bytes of a document (PDF reports).
    async fn download(&self, path: &str, query: &[(String, String)])
    -> Result<Vec<u8>, ApiError>;
}
