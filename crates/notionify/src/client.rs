//! Notion API Authenticated HTTP Client
//!
//! Injects the integration token and `Notion-Version` header into every
//! request and turns Notion's error envelope into [`NotionError::Api`].
//! No retrying happens here; see [`crate::retry`].

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::NotionConfig;
use crate::error::{NotionError, Result};

/// Notion API HTTP client with bearer token injection
pub struct NotionClient {
    client: Client,
    token: String,
    api_base: String,
    notion_version: String,
}

impl NotionClient {
    pub fn new(config: &NotionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            token: config.token.clone(),
            api_base: config.api_base.clone(),
            notion_version: config.notion_version.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.notion_version)
    }

    /// Make an authenticated GET request
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let builder = self.authorize(self.client.get(self.url(path)).query(query));
        self.execute_request(builder).await
    }

    /// Make an authenticated POST request with JSON body
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let builder = self.authorize(self.client.post(self.url(path)).json(body));
        self.execute_request(builder).await
    }

    /// Make an authenticated PATCH request with JSON body
    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value> {
        let builder = self.authorize(self.client.patch(self.url(path)).json(body));
        self.execute_request(builder).await
    }

    /// Make an authenticated DELETE request
    pub async fn delete(&self, path: &str) -> Result<Value> {
        let builder = self.authorize(self.client.delete(self.url(path)));
        self.execute_request(builder).await
    }

    async fn execute_request(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder.send().await?;

        let status = response.status();
        debug!(%status, url = %response.url(), "Notion API response");

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limited by Notion API");
        }

        let body = response.text().await?;

        if status.is_success() && body.is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        let parsed: Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(e) if status.is_success() => {
                return Err(NotionError::Decode(format!("{} (body: {})", e, body)));
            }
            // Error responses from proxies are often HTML; keep the status.
            Err(_) => Value::Null,
        };

        if !status.is_success() {
            let err = api_error(&parsed, status);
            error!("Notion API error: {}", err);
            return Err(err);
        }

        Ok(parsed)
    }
}

/// Build an API error from Notion's error envelope:
///
/// ```json
/// { "object": "error", "status": 400, "code": "validation_error", "message": "..." }
/// ```
fn api_error(response: &Value, status: StatusCode) -> NotionError {
    let code = response
        .get("code")
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown"))
        .to_string();

    let message = response
        .get("message")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {} error", status));

    NotionError::Api {
        status: status.as_u16(),
        code,
        message,
    }
}
