//! Notion helper
//!
//! Retrying wrappers over page, block and database calls:
//! - Clear / list / append / delete blocks
//! - Create and update pages (plain and "book" variants)
//! - Single-page and exhaustive database queries
//!
//! Every network call site goes through the configured [`RetryPolicy`], so a
//! paginated operation retries each page request on its own.

use std::collections::HashMap;

use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::client::NotionClient;
use crate::config::NotionConfig;
use crate::error::{NotionError, Result};
use crate::retry::RetryPolicy;
use crate::types::{PaginatedList, Parent, QueryOptions, MAX_PAGE_SIZE};

pub struct NotionHelper {
    client: NotionClient,
    retry: RetryPolicy,
    page_id: String,
    database_ids: HashMap<String, String>,
    heatmap_block_id: Option<String>,
}

impl NotionHelper {
    /// Build a helper from `NOTION_TOKEN` / `NOTION_PAGE` (and `.env`).
    pub fn from_env() -> Result<Self> {
        Self::new(NotionConfig::from_env()?)
    }

    pub fn new(config: NotionConfig) -> Result<Self> {
        let client = NotionClient::new(&config)?;
        info!(page_id = %config.page_id, "Notion helper ready");

        Ok(Self {
            client,
            retry: config.retry,
            page_id: config.page_id,
            database_ids: HashMap::new(),
            heatmap_block_id: None,
        })
    }

    /// Canonical ID of the root page
    pub fn root_page_id(&self) -> &str {
        &self.page_id
    }

    // List responses are decoded inside the retried call, so a malformed
    // body is retried like any other failure.
    async fn get_list(&self, path: &str, query: &[(&str, String)]) -> Result<PaginatedList> {
        PaginatedList::from_value(self.client.get(path, query).await?)
    }

    async fn post_list(&self, path: &str, body: &Value) -> Result<PaginatedList> {
        PaginatedList::from_value(self.client.post(path, body).await?)
    }

    // ---------- database registry ----------

    pub fn register_database(&mut self, name: impl Into<String>, id: impl Into<String>) {
        self.database_ids.insert(name.into(), id.into());
    }

    pub fn database_id(&self, name: &str) -> Option<&str> {
        self.database_ids.get(name).map(String::as_str)
    }

    pub fn database_ids(&self) -> &HashMap<String, String> {
        &self.database_ids
    }

    pub fn set_heatmap_block_id(&mut self, id: impl Into<String>) {
        self.heatmap_block_id = Some(id.into());
    }

    pub fn heatmap_block_id(&self) -> Option<&str> {
        self.heatmap_block_id.as_deref()
    }

    // ---------- blocks ----------

    /// Delete every immediate child block of `page_id`.
    ///
    /// Not atomic: if a delete fails for good, the children already removed
    /// stay removed and the rest are left alone.
    pub async fn clear_page_content(&self, page_id: &str) -> Result<()> {
        info!("Clearing content of page: {}", page_id);

        let blocks = self.get_block_children(page_id).await?;
        for block in &blocks {
            let Some(block_id) = block.get("id").and_then(|v| v.as_str()) else {
                debug!("Skipping child block without id");
                continue;
            };
            self.delete_block(block_id).await?;
        }

        debug!("Deleted {} blocks", blocks.len());
        Ok(())
    }

    /// Immediate children of a block or page (first page of results)
    pub async fn get_block_children(&self, block_id: &str) -> Result<Vec<Value>> {
        let path = format!("blocks/{}/children", block_id);
        let page = self
            .retry
            .run("get_block_children", || self.get_list(&path, &[]))
            .await?;

        Ok(page.results)
    }

    /// All immediate children of a block, following cursors.
    pub async fn list_all_block_children(&self, block_id: &str) -> Result<Vec<Value>> {
        let path = format!("blocks/{}/children", block_id);
        let mut results = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = vec![("page_size", MAX_PAGE_SIZE.to_string())];
            if let Some(ref c) = cursor {
                query.push(("start_cursor", c.clone()));
            }

            let page = self
                .retry
                .run("list_all_block_children", || self.get_list(&path, &query))
                .await?;
            results.extend(page.results);

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        debug!("Retrieved {} child blocks of {}", results.len(), block_id);
        Ok(results)
    }

    pub async fn append_blocks(&self, block_id: &str, children: Vec<Value>) -> Result<Value> {
        let path = format!("blocks/{}/children", block_id);
        let body = json!({ "children": children });

        self.retry
            .run("append_blocks", || self.client.patch(&path, &body))
            .await
    }

    /// Append `children` directly after the sibling block `after`
    pub async fn append_blocks_after(
        &self,
        block_id: &str,
        children: Vec<Value>,
        after: &str,
    ) -> Result<Value> {
        let path = format!("blocks/{}/children", block_id);
        let body = json!({ "children": children, "after": after });

        self.retry
            .run("append_blocks_after", || self.client.patch(&path, &body))
            .await
    }

    pub async fn delete_block(&self, block_id: &str) -> Result<Value> {
        let path = format!("blocks/{}", block_id);

        self.retry
            .run("delete_block", || self.client.delete(&path))
            .await
    }

    // ---------- pages ----------

    pub async fn update_book_page(&self, page_id: &str, properties: Value) -> Result<Value> {
        self.update_page(page_id, properties, None).await
    }

    /// Merge-update page properties, and the cover when one is given
    pub async fn update_page(
        &self,
        page_id: &str,
        properties: Value,
        cover: Option<Value>,
    ) -> Result<Value> {
        info!("Updating page: {}", page_id);

        let path = format!("pages/{}", page_id);
        let mut body = Map::new();
        body.insert("properties".to_string(), properties);
        if let Some(cover) = cover {
            body.insert("cover".to_string(), cover);
        }
        let body = Value::Object(body);

        self.retry
            .run("update_page", || self.client.patch(&path, &body))
            .await
    }

    pub async fn create_page(
        &self,
        parent: &Parent,
        properties: Value,
        icon: Value,
    ) -> Result<Value> {
        let body = json!({
            "parent": parent,
            "properties": properties,
            "icon": icon,
        });
        self.create(body).await
    }

    /// Like [`create_page`](Self::create_page), with the icon image reused as cover
    pub async fn create_book_page(
        &self,
        parent: &Parent,
        properties: Value,
        icon: Value,
    ) -> Result<Value> {
        let body = json!({
            "parent": parent,
            "properties": properties,
            "icon": icon,
            "cover": icon,
        });
        self.create(body).await
    }

    async fn create(&self, body: Value) -> Result<Value> {
        info!("Creating page under {}", body["parent"]);

        self.retry
            .run("create_page", || self.client.post("pages", &body))
            .await
    }

    // ---------- databases ----------

    /// One page of results from a database query.
    ///
    /// `database_id` must be non-empty; this is checked before any request is
    /// made. Empty option values are not sent.
    pub async fn query(
        &self,
        database_id: &str,
        options: &QueryOptions,
    ) -> Result<PaginatedList> {
        let database_id = require_database_id(database_id)?;
        let path = format!("databases/{}/query", database_id);
        let body = options.to_body()?;

        self.retry
            .run("query", || self.post_list(&path, &body))
            .await
    }

    /// Every row of a database, in the order the API returns them.
    pub async fn query_all(&self, database_id: &str) -> Result<Vec<Value>> {
        let database_id = require_database_id(database_id)?;
        info!("Querying all rows of database: {}", database_id);

        let path = format!("databases/{}/query", database_id);
        let mut results = Vec::new();
        let mut cursor: Option<String> = None;
        let mut requests = 0usize;

        loop {
            let mut options = QueryOptions::new().page_size(MAX_PAGE_SIZE);
            options.start_cursor = cursor.take();
            let body = options.to_body()?;

            let page = self
                .retry
                .run("query_all", || self.post_list(&path, &body))
                .await?;
            requests += 1;

            results.extend(page.results);

            if !page.has_more {
                break;
            }
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    return Err(NotionError::Decode(
                        "has_more is true but next_cursor is missing".to_string(),
                    ))
                }
            }
        }

        debug!("Retrieved {} rows in {} requests", results.len(), requests);
        Ok(results)
    }

    /// Walk the root page and register every inline database by title.
    ///
    /// Descends into layout blocks (columns, toggles) but not into child
    /// pages, so databases on nested pages are not registered.
    ///
    /// Returns how many databases were registered.
    pub async fn index_child_databases(&mut self) -> Result<usize> {
        let mut pending = vec![self.page_id.clone()];
        let mut found = Vec::new();

        while let Some(block_id) = pending.pop() {
            for block in self.list_all_block_children(&block_id).await? {
                let Some(id) = block.get("id").and_then(|v| v.as_str()) else {
                    continue;
                };

                match block.get("type").and_then(|v| v.as_str()) {
                    Some("child_database") => {
                        let title = block["child_database"]["title"]
                            .as_str()
                            .unwrap_or_default()
                            .to_string();
                        found.push((title, id.to_string()));
                    }
                    // nested pages are separate documents
                    Some("child_page") => {}
                    _ if block.get("has_children").and_then(|v| v.as_bool()) == Some(true) => {
                        pending.push(id.to_string());
                    }
                    _ => {}
                }
            }
        }

        let count = found.len();
        for (title, id) in found {
            debug!("Found database '{}' ({})", title, id);
            self.register_database(title, id);
        }

        info!("Indexed {} databases under root page", count);
        Ok(count)
    }
}

fn require_database_id(database_id: &str) -> Result<&str> {
    let trimmed = database_id.trim();
    if trimmed.is_empty() {
        return Err(NotionError::invalid_argument("database_id is required"));
    }
    Ok(trimmed)
}
