//! HTTP transport for the Artifacts API.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::error::ApiError;

/// Default base URL for the Artifacts API
pub const DEFAULT_BASE_URL: &str = "https://api.artifactsmmo.com";

/// Default timeout for API requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A single request against the API, relative to the configured host
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// Raw status and decoded JSON body of a response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Server-provided error message, if any
    pub fn message(&self) -> String {
        self.body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

/// Boundary the agent uses to talk to the game service.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send;
}

/// reqwest-backed transport with bearer authentication
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    /// Create a new transport for the given host
    pub fn new(base_url: &str, token: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("artifacts-agent/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url(&request.path);
        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        let mut builder = builder
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!(status, method = ?request.method, path = %request.path, "API response");

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|source| ApiError::InvalidResponse {
                path: request.path.clone(),
                source,
            })?
        };

        Ok(ApiResponse { status, body })
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_builders() {
        let req = ApiRequest::get("/monsters")
            .with_query("page", 2)
            .with_query("size", 100);
        assert_eq!(req.method, Method::Get);
        assert_eq!(
            req.query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("size".to_string(), "100".to_string())
            ]
        );

        let req = ApiRequest::post("/my/hero/action/fight", None);
        assert_eq!(req.method, Method::Post);
        assert!(req.body.is_none());
    }

    #[test]
    fn test_response_message() {
        let response = ApiResponse {
            status: 499,
            body: json!({"error": {"code": 499, "message": "Character in cooldown"}}),
        };
        assert!(!response.is_success());
        assert_eq!(response.message(), "Character in cooldown");

        let response = ApiResponse {
            status: 200,
            body: Value::Null,
        };
        assert!(response.is_success());
        assert_eq!(response.message(), "");
    }

    #[test]
    fn test_base_url_trimmed() {
        let transport = HttpTransport::new("https://example.test/", "token", 5).unwrap();
        assert_eq!(transport.url("/maps"), "https://example.test/maps");
    }
}
