//! HTTP client for the MIMS REST API.
//!
//! The crate covers credential discovery (`MIMS_API_TOKEN`), base-URL
//! validation (`MIMS_API_BASE`), paginated list queries, and decoding of the
//! server's response envelopes. [`ApiClient`] is the entry point: build one
//! with [`ApiClient::from_env`], then use the typed endpoint helpers, or
//! [`ApiClient::request`] for anything bespoke.
//!
//! # Example
//!
//! ```ignore
//! use mims_api::{ApiClient, ListQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mims_api::ApiError> {
//!     let client = ApiClient::from_env()?;
//!     let page = client.fetch_list("/api/students/", &ListQuery::default()).await?;
//!     println!("{} students", page.count);
//!     Ok(())
//! }
//! ```

mod error;
mod query;

pub use error::ApiError;
pub use query::{DEFAULT_PAGE_SIZE, ListQuery};

use std::env;
use std::time::Duration;

use mims_types::{ActionEnvelope, Branch, DashboardStats, Division, ListPage, SchoolClass};
use reqwest::{Client, RequestBuilder, StatusCode, Url, header};
use serde_json::Value;
use tracing::debug;

/// Environment variable holding the API token.
pub const TOKEN_ENV_VAR: &str = "MIMS_API_TOKEN";
/// Environment variable overriding the API base URL.
pub const BASE_ENV_VAR: &str = "MIMS_API_BASE";
/// Base URL used when `MIMS_API_BASE` is unset.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Hostnames allowed with any scheme for local development.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for MIMS API access.
///
/// The client pre-configures default headers and builds requests against a
/// validated base URL. Authentication is read from the environment.
pub struct ApiClient {
    pub base_url: String,
    http: Client,
    user_agent: String,
}

impl ApiClient {
    /// Construct an [`ApiClient`] from environment variables.
    ///
    /// The token is taken from `MIMS_API_TOKEN` and sent as
    /// `Authorization: Token <key>` on every request when present. The base
    /// URL comes from `MIMS_API_BASE` or falls back to the local dev server.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::with_base(None)
    }

    /// Construct an [`ApiClient`] with an explicit base URL override.
    ///
    /// The override takes precedence over `MIMS_API_BASE`. Non-localhost
    /// hosts must use HTTPS.
    pub fn with_base(base_override: Option<&str>) -> Result<Self, ApiError> {
        let api_token = env::var(TOKEN_ENV_VAR).ok();

        let mut default_headers = header::HeaderMap::new();
        if let Some(api_token) = api_token {
            let authorization_header_value = format!("Token {}", api_token);
            let value = header::HeaderValue::from_str(&authorization_header_value)
                .map_err(|_| ApiError::config("MIMS_API_TOKEN contains invalid header characters"))?;
            default_headers.insert(header::AUTHORIZATION, value);
        }
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ApiError::Transport)?;

        let base_url = match base_override {
            Some(base) => base.to_string(),
            None => env::var(BASE_ENV_VAR).unwrap_or_else(|_| DEFAULT_API_BASE.into()),
        };
        let base_url = base_url.trim_end_matches('/').to_string();

        validate_base_url(&base_url)?;
        Ok(Self {
            base_url,
            http,
            user_agent: format!("mims-tui/0.1; {}", env::consts::OS),
        })
    }

    /// Start a request for an API-relative path, with the client's
    /// User-Agent and default headers already attached.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    /// Fetch one page of a list endpoint.
    ///
    /// Rows are accepted under `results` or `data`; a missing `count`
    /// defaults to 0.
    pub async fn fetch_list(&self, path: &str, query: &ListQuery) -> Result<ListPage, ApiError> {
        let body = self.get_json_with_params(path, &query.to_params()).await?;
        Ok(ListPage::from_value(&body))
    }

    /// POST an action endpoint and decode its `{success, message}` envelope.
    pub async fn submit_action(&self, path: &str, body: Option<&Value>) -> Result<ActionEnvelope, ApiError> {
        let mut builder = self.request(reqwest::Method::POST, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        let value = decode_json(response).await?;
        serde_json::from_value(value).map_err(|e| ApiError::malformed(e.to_string()))
    }

    /// Fetch the dashboard statistics block.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let body = self.get_json("/api/dashboard/stats/").await?;
        let data = body.get("data").unwrap_or(&body);
        serde_json::from_value(data.clone()).map_err(|e| ApiError::malformed(e.to_string()))
    }

    /// Fetch the branch lookup list.
    pub async fn branches(&self) -> Result<Vec<Branch>, ApiError> {
        self.fetch_lookup("/api/utilities/branches/").await
    }

    /// Fetch the class lookup list.
    pub async fn classes(&self) -> Result<Vec<SchoolClass>, ApiError> {
        self.fetch_lookup("/api/utilities/classes/").await
    }

    /// Fetch the division lookup list.
    pub async fn divisions(&self) -> Result<Vec<Division>, ApiError> {
        self.fetch_lookup("/api/utilities/divisions/").await
    }

    /// Fetch a utility lookup endpoint.
    ///
    /// Lookup endpoints answer with either the `{success, data}` envelope or
    /// a bare `results` list, so rows go through the same tolerant page
    /// extraction as the tables.
    async fn fetch_lookup<T>(&self, path: &str) -> Result<Vec<T>, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let body = self.get_json(path).await?;
        let page = ListPage::from_value(&body);
        page.rows
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| ApiError::malformed(e.to_string())))
            .collect()
    }

    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let response = self.request(reqwest::Method::GET, path).send().await?;
        decode_json(response).await
    }

    async fn get_json_with_params(&self, path: &str, params: &[(String, String)]) -> Result<Value, ApiError> {
        let response = self
            .request(reqwest::Method::GET, path)
            .query(params)
            .send()
            .await?;
        decode_json(response).await
    }
}

/// Turn a response into decoded JSON, mapping error statuses to [`ApiError::Status`].
///
/// For error statuses the body is parsed as a `{success, message, errors}`
/// envelope when possible; otherwise the message falls back to the status
/// line.
async fn decode_json(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::status(status.as_u16(), status_message(status, &body)));
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::malformed(e.to_string()))
}

/// Extract the server's message from an error body.
fn status_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ActionEnvelope>(body) {
        if let Some(message) = envelope.message.filter(|m| !m.is_empty()) {
            return message;
        }
        if let Some(detail) = envelope.errors.as_ref().and_then(first_error_text) {
            return detail;
        }
    }
    status.canonical_reason().unwrap_or("request failed").to_string()
}

/// Pull the first human-readable string out of a field-error value.
///
/// Accepts a string, a list of strings, or a map of field name to list of
/// strings.
fn first_error_text(errors: &Value) -> Option<String> {
    match errors {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_error_text),
        Value::Object(map) => map
            .iter()
            .find_map(|(field, value)| first_error_text(value).map(|text| format!("{field}: {text}"))),
        _ => None,
    }
}

/// Check a base URL before the client will use it: it must parse, carry a
/// host, and use HTTPS unless the host is a local development address.
fn validate_base_url(base: &str) -> Result<(), ApiError> {
    let parsed =
        Url::parse(base).map_err(|e| ApiError::config(format!("Invalid MIMS_API_BASE URL '{}': {}", base, e)))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| ApiError::config("MIMS_API_BASE must include a host"))?;

    let is_local = LOCALHOST_DOMAINS.iter().any(|&dev| host.eq_ignore_ascii_case(dev));
    if !is_local && parsed.scheme() != "https" {
        return Err(ApiError::config(format!(
            "MIMS_API_BASE must use https for non-localhost hosts; got '{}://'",
            parsed.scheme()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn localhost_base_allows_plain_http() {
        assert!(validate_base_url("http://localhost:8000").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8000").is_ok());
    }

    #[test]
    fn remote_base_requires_https() {
        assert!(validate_base_url("https://mims.example.org").is_ok());
        assert!(validate_base_url("http://mims.example.org").is_err());
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(validate_base_url("not a url").is_err());
        assert!(validate_base_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn client_reads_base_from_environment() {
        temp_env::with_vars(
            [(BASE_ENV_VAR, Some("http://localhost:9001/")), (TOKEN_ENV_VAR, Some("abc123"))],
            || {
                let client = ApiClient::from_env().expect("client builds");
                assert_eq!(client.base_url, "http://localhost:9001");
            },
        );
    }

    #[test]
    fn client_defaults_base_when_unset() {
        temp_env::with_vars([(BASE_ENV_VAR, None::<&str>), (TOKEN_ENV_VAR, None::<&str>)], || {
            let client = ApiClient::from_env().expect("client builds");
            assert_eq!(client.base_url, DEFAULT_API_BASE);
        });
    }

    #[test]
    fn explicit_base_override_wins() {
        temp_env::with_var(BASE_ENV_VAR, Some("http://localhost:9001"), || {
            let client = ApiClient::with_base(Some("https://mims.example.org")).expect("client builds");
            assert_eq!(client.base_url, "https://mims.example.org");
        });
    }

    #[test]
    fn insecure_remote_base_fails_construction() {
        temp_env::with_var(BASE_ENV_VAR, Some("http://mims.example.org"), || {
            assert!(ApiClient::from_env().is_err());
        });
    }

    #[test]
    fn status_message_prefers_envelope_message() {
        let body = json!({"success": false, "message": "Student not found"}).to_string();
        assert_eq!(status_message(StatusCode::NOT_FOUND, &body), "Student not found");
    }

    #[test]
    fn status_message_reads_field_errors() {
        let body = json!({"success": false, "errors": {"reason": ["This field is required."]}}).to_string();
        assert_eq!(
            status_message(StatusCode::BAD_REQUEST, &body),
            "reason: This field is required."
        );
    }

    #[test]
    fn status_message_falls_back_to_status_line() {
        assert_eq!(
            status_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>"),
            "Internal Server Error"
        );
    }
}
