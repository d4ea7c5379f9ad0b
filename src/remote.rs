//! Figma Variables REST API client
//!
//! Two calls are used:
//! - `GET {host}/v1/files/{key}/variables/{local|published}`
//! - `POST {host}/v1/files/{key}/variables`
//!
//! Figma reports failures in the JSON body's `status` field, sometimes on a
//! 200 HTTP response, so the body is checked before the transport status.

use crate::models::{VariablesResponse, WritePayload};
use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

/// Header carrying the personal access token.
pub const TOKEN_HEADER: &str = "X-Figma-Token";

/// Error type for remote calls
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Request could not be sent or the body could not be read
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Body is not the expected JSON
    #[error("unexpected response (HTTP {status}): {source}")]
    InvalidResponse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    /// Figma answered with a non-200 status
    #[error("Figma responded with status {status}: {message}")]
    Rejected { status: u16, message: String },
    /// Token belongs to a user without edit rights on the file
    #[error("the personal access token provided does not have a full Figma design seat/license, and is not allowed to write to Figma. Rerun with --skip-write to generate files anyway, but they will be out of sync and should not be used in a production environment")]
    InsufficientPrivilege,
}

impl RemoteError {
    /// Status reported by Figma, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Rejected { status, .. } | RemoteError::InvalidResponse { status, .. } => {
                Some(*status)
            }
            RemoteError::InsufficientPrivilege => Some(403),
            RemoteError::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// A successful fetch: the raw body for snapshots plus its typed form
#[derive(Debug, Clone)]
pub struct FetchedVariables {
    /// Body exactly as received, key order kept
    pub raw: Value,
    pub response: VariablesResponse,
}

impl FetchedVariables {
    /// Parse a response body, e.g. a saved snapshot.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw: Value = serde_json::from_str(text)?;
        Self::from_value(raw)
    }

    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let response = serde_json::from_value(raw.clone())?;
        Ok(Self { raw, response })
    }
}

/// Remote variable store operations
pub trait VariablesApi {
    /// Fetch all variables and collections of a file.
    fn fetch_variables(&self, file_key: &str, published: bool) -> Result<FetchedVariables, RemoteError>;

    /// Apply a payload of variable changes; returns the response body.
    fn write_variables(&self, file_key: &str, payload: &WritePayload) -> Result<Value, RemoteError>;
}

/// URL of the variables endpoint for reading.
pub fn fetch_endpoint(host: &str, file_key: &str, published: bool) -> String {
    let scope = if published { "published" } else { "local" };
    format!("{}/v1/files/{}/variables/{}", host, file_key, scope)
}

/// URL of the variables endpoint for writing.
pub fn write_endpoint(host: &str, file_key: &str) -> String {
    format!("{}/v1/files/{}/variables", host, file_key)
}

/// Decide success from the body's `status`, falling back to the HTTP status.
pub fn check_status(http_status: u16, body: &Value) -> Result<(), RemoteError> {
    let status = body
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(http_status);
    if status == 200 {
        return Ok(());
    }

    let message = body
        .get("message")
        .or_else(|| body.get("err"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string());
    Err(RemoteError::Rejected { status, message })
}

/// Blocking client for the Figma REST API
#[derive(Debug, Clone)]
pub struct FigmaClient {
    host: String,
    token: String,
    http: Client,
}

impl FigmaClient {
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { host: host.into().trim_end_matches('/').to_string(), token: token.into(), http })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn read_body(response: reqwest::blocking::Response) -> Result<(u16, Value), RemoteError> {
        let status = response.status().as_u16();
        let text = response.text()?;
        log::debug!("HTTP {} ({} bytes)", status, text.len());
        let body = serde_json::from_str(&text)
            .map_err(|source| RemoteError::InvalidResponse { status, source })?;
        Ok((status, body))
    }
}

impl VariablesApi for FigmaClient {
    fn fetch_variables(&self, file_key: &str, published: bool) -> Result<FetchedVariables, RemoteError> {
        let endpoint = fetch_endpoint(&self.host, file_key, published);
        log::info!("Fetching from {}", endpoint);

        let response = self.http.get(&endpoint).header(TOKEN_HEADER, &self.token).send()?;
        let (status, body) = Self::read_body(response)?;
        check_status(status, &body)?;

        FetchedVariables::from_value(body).map_err(|source| RemoteError::InvalidResponse { status, source })
    }

    fn write_variables(&self, file_key: &str, payload: &WritePayload) -> Result<Value, RemoteError> {
        let endpoint = write_endpoint(&self.host, file_key);
        log::info!("Attempting to write variables to {}", endpoint);
        log::debug!(
            "Payload: {} variable change(s), {} mode value(s)",
            payload.variables.len(),
            payload.variable_mode_values.len()
        );

        let response = self.http.post(&endpoint).header(TOKEN_HEADER, &self.token).json(payload).send()?;
        let (status, body) = Self::read_body(response)?;
        match check_status(status, &body) {
            Err(RemoteError::Rejected { status: 403, .. }) => Err(RemoteError::InsufficientPrivilege),
            other => other.map(|()| body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoints() {
        assert_eq!(
            fetch_endpoint("https://api.figma.com", "abc", false),
            "https://api.figma.com/v1/files/abc/variables/local"
        );
        assert_eq!(
            fetch_endpoint("https://api.figma.com", "abc", true),
            "https://api.figma.com/v1/files/abc/variables/published"
        );
        assert_eq!(write_endpoint("https://api.figma.com", "abc"), "https://api.figma.com/v1/files/abc/variables");
    }

    #[test]
    fn test_check_status_prefers_body() {
        assert!(check_status(200, &json!({"status": 200, "error": false})).is_ok());

        let err = check_status(200, &json!({"status": 404, "error": true, "message": "Not found"})).unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { status: 404, ref message } if message == "Not found"));
    }

    #[test]
    fn test_check_status_falls_back_to_http() {
        assert!(check_status(200, &json!({"meta": {}})).is_ok());

        let err = check_status(500, &json!({"err": "Internal error"})).unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { status: 500, ref message } if message == "Internal error"));

        let err = check_status(502, &json!(["unexpected"])).unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { ref message, .. } if message == "[\"unexpected\"]"));
    }

    #[test]
    fn test_error_status() {
        assert_eq!(RemoteError::InsufficientPrivilege.status(), Some(403));
        let rejected = RemoteError::Rejected { status: 400, message: "bad".into() };
        assert_eq!(rejected.status(), Some(400));
        assert!(rejected.to_string().contains("400"));
    }

    #[test]
    fn test_fetched_variables_from_json() {
        let fetched = FetchedVariables::from_json(include_str!("../tests/fixtures/variables_response.json"))
            .expect("fixture should parse");
        assert_eq!(fetched.response.status, 200);
        assert_eq!(fetched.response.meta.variables.len(), 9);
        let first_key = fetched.raw["meta"]
            .as_object()
            .and_then(|meta| meta.keys().next().cloned());
        assert_eq!(first_key.as_deref(), Some("variableCollections"));
    }

    #[test]
    fn test_client_trims_host() {
        let client = FigmaClient::new("https://api.figma.com/", "token").expect("client should build");
        assert_eq!(client.host(), "https://api.figma.com");
    }
}
