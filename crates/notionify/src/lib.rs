//! Retrying Notion API helper
//!
//! Authenticates once from `NOTION_TOKEN` / `NOTION_PAGE`, then wraps page,
//! block and database calls with a fixed-delay retry policy.

pub mod client;
pub mod config;
pub mod error;
pub mod helper;
pub mod page_id;
pub mod retry;
pub mod types;

pub use client::NotionClient;
pub use config::NotionConfig;
pub use error::{NotionError, Result};
pub use helper::NotionHelper;
pub use page_id::extract_page_id;
pub use retry::RetryPolicy;
pub use types::{PaginatedList, Parent, QueryOptions};
