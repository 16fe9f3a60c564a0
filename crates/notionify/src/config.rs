//! Configuration
//!
//! Reads the integration token and root page reference from the process
//! environment (after loading `.env`, if one exists).

use std::time::Duration;

use tracing::debug;

use crate::error::{NotionError, Result};
use crate::page_id::extract_page_id;
use crate::retry::RetryPolicy;

pub const TOKEN_VAR: &str = "NOTION_TOKEN";
pub const PAGE_VAR: &str = "NOTION_PAGE";
pub const API_BASE_VAR: &str = "NOTION_API_BASE";
pub const VERSION_VAR: &str = "NOTION_VERSION";

pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

#[derive(Clone)]
pub struct NotionConfig {
    pub token: String,
    /// Canonical dashed ID of the root page
    pub page_id: String,
    pub api_base: String,
    pub notion_version: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub retry: RetryPolicy,
}

// Keep the token out of logs.
impl std::fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionConfig")
            .field("token", &"<redacted>")
            .field("page_id", &self.page_id)
            .field("api_base", &self.api_base)
            .field("notion_version", &self.notion_version)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl NotionConfig {
    /// Build a config from a token and a page URL or ID.
    ///
    /// Fails if the token is blank or contains whitespace, or if no page ID
    /// can be found in `page`.
    pub fn new(token: impl Into<String>, page: &str) -> Result<Self> {
        let token = token.into();
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(NotionError::config(format!("{} is empty", TOKEN_VAR)));
        }
        if token.chars().any(char::is_whitespace) {
            return Err(NotionError::config(format!(
                "{} must not contain whitespace",
                TOKEN_VAR
            )));
        }

        let page_id = extract_page_id(page)?;

        Ok(Self {
            token,
            page_id,
            api_base: DEFAULT_API_BASE.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        })
    }

    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded .env from {}", path.display()),
            Err(e) => debug!("No .env loaded: {}", e),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .ok_or_else(|| NotionError::config(format!("{} is not set", TOKEN_VAR)))?;
        let page = lookup(PAGE_VAR)
            .ok_or_else(|| NotionError::config(format!("{} is not set", PAGE_VAR)))?;

        let mut config = Self::new(token, &page)?;

        if let Some(base) = lookup(API_BASE_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.with_api_base(base);
        }
        if let Some(version) = lookup(VERSION_VAR).filter(|v| !v.trim().is_empty()) {
            config.notion_version = version.trim().to_string();
        }

        Ok(config)
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
