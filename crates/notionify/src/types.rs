//! Request and response shapes
//!
//! Properties, icons, covers and block bodies stay as raw JSON; their schema
//! belongs to the Notion API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Largest page size the Notion API accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Where a new page lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parent {
    Database { database_id: String },
    Page { page_id: String },
    Block { block_id: String },
}

impl Parent {
    pub fn database(id: impl Into<String>) -> Self {
        Self::Database {
            database_id: id.into(),
        }
    }

    pub fn page(id: impl Into<String>) -> Self {
        Self::Page { page_id: id.into() }
    }

    pub fn block(id: impl Into<String>) -> Self {
        Self::Block {
            block_id: id.into(),
        }
    }
}

/// One page of a cursor-paginated list (`blocks.children.list`, `databases.query`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginatedList {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl PaginatedList {
    pub fn from_value(value: Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Options for a single database query.
///
/// Anything not modelled here can go in `extra`. Empty values are dropped
/// before the request is sent, see [`QueryOptions::to_body`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_properties: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sorts(mut self, sorts: Vec<Value>) -> Self {
        self.sorts = Some(sorts);
        self
    }

    pub fn start_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.start_cursor = Some(cursor.into());
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn filter_properties(mut self, ids: Vec<String>) -> Self {
        self.filter_properties = Some(ids);
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Request body with every empty top-level value removed.
    pub fn to_body(&self) -> crate::Result<Value> {
        let mut body = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        body.retain(|_, v| !is_empty_value(v));
        Ok(Value::Object(body))
    }
}

/// `null`, `false`, `0`, `""`, `[]` and `{}` count as empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parent_wire_shape() {
        assert_eq!(
            serde_json::to_value(Parent::database("db1")).unwrap(),
            json!({"database_id": "db1"})
        );
        assert_eq!(
            serde_json::to_value(Parent::page("p1")).unwrap(),
            json!({"page_id": "p1"})
        );

        let parsed: Parent = serde_json::from_value(json!({"block_id": "b1"})).unwrap();
        assert_eq!(parsed, Parent::block("b1"));
    }

    #[test]
    fn test_paginated_list_defaults() {
        let list = PaginatedList::from_value(json!({"object": "list"})).unwrap();
        assert!(list.results.is_empty());
        assert!(!list.has_more);
        assert_eq!(list.next_cursor, None);
    }

    #[test]
    fn test_to_body_drops_empty_values() {
        let options = QueryOptions::new()
            .filter(json!({}))
            .sorts(vec![])
            .page_size(0)
            .option("archived", json!(false))
            .option("note", json!(""));

        assert_eq!(options.to_body().unwrap(), json!({}));
    }

    #[test]
    fn test_to_body_keeps_values() {
        let filter = json!({"property": "Status", "status": {"equals": "Done"}});
        let options = QueryOptions::new()
            .filter(filter.clone())
            .sorts(vec![json!({"property": "Date", "direction": "descending"})])
            .page_size(50)
            .start_cursor("cur-1")
            .filter_properties(vec!["title".to_string()]);

        let body = options.to_body().unwrap();
        assert_eq!(body["filter"], filter);
        assert_eq!(body["sorts"][0]["direction"], "descending");
        assert_eq!(body["page_size"], 50);
        assert_eq!(body["start_cursor"], "cur-1");
        assert_eq!(body["filter_properties"], json!(["title"]));
    }

    #[test]
    fn test_empty_value_rules() {
        assert!(is_empty_value(&json!(0.0)));
        assert!(!is_empty_value(&json!(1)));
        assert!(!is_empty_value(&json!(true)));
        assert!(!is_empty_value(&json!([null])));
    }
}
